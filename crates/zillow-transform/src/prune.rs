//! Threshold-based removal of sparse columns, then sparse rows.

use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::debug;
use zillow_model::PruneThresholds;

use crate::error::Result;
use crate::frame::{non_null_counts, retain_rows};

/// What a prune pass removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PruneOutcome {
    pub dropped_columns: Vec<String>,
    pub dropped_rows: usize,
    /// Minimum non-null cells a column needed.
    pub column_threshold: usize,
    /// Minimum non-null cells a row needed, against the post-column-drop width.
    pub row_threshold: usize,
}

/// `round(fraction * count)` with ties to even.
pub fn fill_threshold(fraction: f64, count: usize) -> usize {
    (fraction * count as f64).round_ties_even() as usize
}

/// Drops columns, then rows, whose non-null count falls below the thresholds.
///
/// The row threshold is computed from the width left after the column pass,
/// so the two passes cannot be reordered.
pub fn prune_missing(df: &mut DataFrame, thresholds: PruneThresholds) -> Result<PruneOutcome> {
    thresholds.validate()?;

    let column_threshold = fill_threshold(thresholds.min_column_fill, df.height());
    let height = df.height();
    let dropped_columns: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|column| height - column.null_count() < column_threshold)
        .map(|column| column.name().to_string())
        .collect();
    for name in &dropped_columns {
        df.drop_in_place(name)?;
    }

    let row_threshold = fill_threshold(thresholds.min_row_fill, df.width());
    let keep: Vec<bool> = non_null_counts(df)
        .into_iter()
        .map(|present| present >= row_threshold)
        .collect();
    let dropped_rows = retain_rows(df, &keep)?;

    debug!(
        column_threshold,
        row_threshold,
        dropped_columns = dropped_columns.len(),
        dropped_rows,
        "pruned sparse data"
    );
    Ok(PruneOutcome {
        dropped_columns,
        dropped_rows,
        column_threshold,
        row_threshold,
    })
}
