//! Record sources that execute the acquisition query.
//!
//! The store behind a source is opaque to the pipeline: credentials, hosts and
//! dialect quirks belong to the implementor. [`SqliteSource`] is the bundled
//! adapter; other engines plug in by implementing [`RecordSource`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::*;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::polars_utils::format_numeric;

/// A store that can answer the acquisition query with a wide table.
pub trait RecordSource {
    /// Execute `query` and return every row.
    fn fetch(&self, query: &str) -> Result<DataFrame>;

    /// Short human-readable location for logs.
    fn describe(&self) -> String;
}

/// Reads from a SQLite database file opened read-only.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
}

impl SqliteSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for SqliteSource {
    fn fetch(&self, query: &str) -> Result<DataFrame> {
        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .with_context(|| format!("open sqlite store: {}", self.path.display()))?;
        let mut stmt = conn
            .prepare(query)
            .with_context(|| format!("prepare query against {}", self.path.display()))?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(ToString::to_string)
            .collect();

        let mut columns: Vec<ColumnCells> = names.iter().map(|_| ColumnCells::default()).collect();
        let mut rows = stmt.query([]).context("execute query")?;
        let mut row_count = 0usize;
        while let Some(row) = rows.next().context("read result row")? {
            for (idx, cells) in columns.iter_mut().enumerate() {
                let value = row
                    .get_ref(idx)
                    .with_context(|| format!("read column {}", names[idx]))?;
                cells.push(value);
            }
            row_count += 1;
        }
        debug!(
            store = %self.path.display(),
            row_count,
            column_count = names.len(),
            "query complete"
        );

        let frame_columns: Vec<Column> = names
            .iter()
            .zip(columns)
            .map(|(name, cells)| cells.into_column(name))
            .collect();
        DataFrame::new(frame_columns).context("assemble query result")
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Null,
    Number(f64),
    Text(String),
}

/// Cells of one result column, typed once the whole column has been seen.
#[derive(Debug, Default)]
struct ColumnCells {
    cells: Vec<Cell>,
    has_text: bool,
}

impl ColumnCells {
    fn push(&mut self, value: ValueRef<'_>) {
        let cell = match value {
            ValueRef::Null => Cell::Null,
            ValueRef::Integer(v) => Cell::Number(v as f64),
            ValueRef::Real(v) => Cell::Number(v),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                self.has_text = true;
                Cell::Text(String::from_utf8_lossy(bytes).into_owned())
            }
        };
        self.cells.push(cell);
    }

    /// Numeric-only columns become `Float64`; anything holding text becomes `String`.
    fn into_column(self, name: &str) -> Column {
        if self.has_text {
            let values: Vec<Option<String>> = self
                .cells
                .into_iter()
                .map(|cell| match cell {
                    Cell::Null => None,
                    Cell::Number(v) => Some(format_numeric(v)),
                    Cell::Text(s) => Some(s),
                })
                .collect();
            Series::new(name.into(), values).into_column()
        } else {
            let values: Vec<Option<f64>> = self
                .cells
                .into_iter()
                .map(|cell| match cell {
                    Cell::Number(v) => Some(v),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values).into_column()
        }
    }
}
