//! Missing-value diagnostics. Nothing here mutates the table.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use serde::Serialize;

use crate::frame::non_null_counts;

/// Missing-value count for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing_rows: usize,
    /// `missing_rows / row_count`.
    pub fraction_missing: f64,
}

/// How many rows are missing exactly `missing_columns` cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowMissing {
    pub missing_columns: usize,
    pub row_count: usize,
    /// `missing_columns / column_count`.
    pub fraction_missing: f64,
}

/// Both diagnostics for one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingnessReport {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnMissing>,
    pub rows: Vec<RowMissing>,
}

pub fn audit(df: &DataFrame) -> MissingnessReport {
    MissingnessReport {
        row_count: df.height(),
        column_count: df.width(),
        columns: nulls_by_column(df),
        rows: nulls_by_row(df),
    }
}

/// Per-column missing counts in frame column order.
pub fn nulls_by_column(df: &DataFrame) -> Vec<ColumnMissing> {
    let rows = df.height();
    if rows == 0 {
        return Vec::new();
    }
    df.get_columns()
        .iter()
        .map(|column| {
            let missing_rows = column.null_count();
            ColumnMissing {
                column: column.name().to_string(),
                missing_rows,
                fraction_missing: missing_rows as f64 / rows as f64,
            }
        })
        .collect()
}

/// Histogram of missing cells per row, ascending by missing count.
pub fn nulls_by_row(df: &DataFrame) -> Vec<RowMissing> {
    let width = df.width();
    if width == 0 || df.height() == 0 {
        return Vec::new();
    }
    let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();
    for present in non_null_counts(df) {
        *histogram.entry(width - present).or_insert(0) += 1;
    }
    histogram
        .into_iter()
        .map(|(missing_columns, row_count)| RowMissing {
            missing_columns,
            row_count,
            fraction_missing: missing_columns as f64 / width as f64,
        })
        .collect()
}
