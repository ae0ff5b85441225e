//! DataFrame helpers shared by the wrangle steps.
//!
//! Every accessor here treats a missing column as fatal: the loader hands over
//! a fixed schema and a step that cannot find one of its inputs must stop the run.

use polars::prelude::*;

use crate::error::{Result, WrangleError};

/// Looks up a column, mapping absence to [`WrangleError::MissingColumn`].
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| WrangleError::MissingColumn {
        column: name.to_string(),
    })
}

/// Reads a column as optional floats. Unparseable text reads as missing.
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = require_column(df, name)?;
    let floats = column.cast(&DataType::Float64)?;
    Ok(floats.f64()?.into_iter().collect())
}

/// Reads a column as optional strings.
pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = require_column(df, name)?;
    let text = column.cast(&DataType::String)?;
    Ok(text
        .str()?
        .into_iter()
        .map(|value| value.map(ToString::to_string))
        .collect())
}

/// Adds or replaces a `Float64` column.
pub fn set_f64_column(df: &mut DataFrame, name: &str, values: Vec<Option<f64>>) -> Result<()> {
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

/// Adds or replaces a `String` column.
pub fn set_string_column(
    df: &mut DataFrame,
    name: &str,
    values: Vec<Option<String>>,
) -> Result<()> {
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

/// Keeps rows whose mask entry is true; returns how many rows were removed.
pub fn retain_rows(df: &mut DataFrame, keep: &[bool]) -> Result<usize> {
    let before = df.height();
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    *df = df.filter(&mask)?;
    Ok(before - df.height())
}

/// Drops every named column; all of them must exist.
pub fn drop_columns(df: &mut DataFrame, names: &[&str]) -> Result<()> {
    for name in names {
        require_column(df, name)?;
    }
    for name in names {
        df.drop_in_place(name)?;
    }
    Ok(())
}

/// Per-row count of non-null cells across all columns.
pub fn non_null_counts(df: &DataFrame) -> Vec<usize> {
    let mut counts = vec![0usize; df.height()];
    for column in df.get_columns() {
        for (idx, is_null) in column.is_null().into_iter().enumerate() {
            if !is_null.unwrap_or(false) {
                counts[idx] += 1;
            }
        }
    }
    counts
}

/// `numerator / denominator`, missing when either side is missing or the
/// denominator is zero.
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(ToString::to_string)
        .collect()
}
