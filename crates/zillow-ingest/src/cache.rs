//! Cache-or-query loading of the raw wide table.

use std::fs::{self, File};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::{info, info_span};

use crate::query::ZILLOW_QUERY;
use crate::source::RecordSource;

/// Returns the cached table when `cache_path` exists; otherwise runs the
/// acquisition query against `source`, writes the cache and returns the result.
///
/// Store failures propagate unchanged apart from added context; nothing is retried.
pub fn load_zillow_data(cache_path: &Path, source: &dyn RecordSource) -> Result<DataFrame> {
    let span = info_span!("acquire", cache = %cache_path.display());
    let _guard = span.enter();
    let start = Instant::now();

    if cache_path.is_file() {
        let df = read_cached_frame(cache_path)?;
        info!(
            row_count = df.height(),
            column_count = df.width(),
            duration_ms = start.elapsed().as_millis(),
            "loaded cached table"
        );
        return Ok(df);
    }

    let mut df = source
        .fetch(ZILLOW_QUERY)
        .with_context(|| format!("query {}", source.describe()))?;
    write_cached_frame(cache_path, &mut df)?;
    info!(
        source = %source.describe(),
        row_count = df.height(),
        column_count = df.width(),
        duration_ms = start.elapsed().as_millis(),
        "queried store and wrote cache"
    );
    Ok(df)
}

/// Reads a cached CSV, inferring column types from the whole file.
pub fn read_cached_frame(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("open cache: {}", path.display()))?
        .finish()
        .with_context(|| format!("read cache: {}", path.display()))
}

/// Writes `df` as CSV with a header row, creating parent directories.
pub fn write_cached_frame(path: &Path, df: &mut DataFrame) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create cache directory: {}", parent.display()))?;
    }
    let mut file =
        File::create(path).with_context(|| format!("create cache: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("write cache: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct CountingSource {
        calls: Cell<usize>,
    }

    impl RecordSource for CountingSource {
        fn fetch(&self, _query: &str) -> Result<DataFrame> {
            self.calls.set(self.calls.get() + 1);
            Ok(DataFrame::new(vec![
                Series::new("parcelid".into(), vec![Some(1.0), Some(2.0)]).into_column(),
                Series::new("logerror".into(), vec![Some(0.025), Some(-0.01)]).into_column(),
            ])?)
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    struct FailingSource;

    impl RecordSource for FailingSource {
        fn fetch(&self, _query: &str) -> Result<DataFrame> {
            anyhow::bail!("connection refused")
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    #[test]
    fn second_load_is_served_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("nested").join("zillow_db.csv");
        let source = CountingSource {
            calls: Cell::new(0),
        };

        let first = load_zillow_data(&cache, &source).unwrap();
        assert!(cache.is_file());
        let second = load_zillow_data(&cache, &source).unwrap();

        assert_eq!(source.calls.get(), 1);
        assert_eq!(first.shape(), second.shape());
        assert_eq!(
            second.column("logerror").unwrap().f64().unwrap().get(0),
            Some(0.025)
        );
    }

    #[test]
    fn store_failure_propagates_without_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("zillow_db.csv");
        let err = load_zillow_data(&cache, &FailingSource).unwrap_err();
        assert!(format!("{err:#}").contains("connection refused"));
        assert!(!cache.exists());
    }
}
