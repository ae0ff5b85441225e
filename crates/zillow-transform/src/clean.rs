//! Row filters, imputation and the readable renames shared by both profiles.

use polars::prelude::*;
use zillow_model::columns::{
    BATHROOM_COUNT, BEDROOM_COUNT, BUILDING_QUALITY_TYPE_ID, COUNTY, FINISHED_SQUARE_FEET, FIPS,
    HEATING_SYSTEM_DESC, LAND_USE_TYPE_ID, LOT_SIZE_SQUARE_FEET, READABLE_RENAMES,
    REDUNDANT_COLUMNS, TAX_VALUE_DOLLARS, UNIT_COUNT, YEAR_BUILT,
};
use zillow_model::{ImputationDefaults, OutlierBounds};

use crate::error::{Result, WrangleError};
use crate::frame::{
    drop_columns, numeric_values, require_column, retain_rows, set_f64_column, set_string_column,
    string_values,
};

pub const LOS_ANGELES_FIPS: i64 = 6037;
pub const ORANGE_FIPS: i64 = 6059;

/// County name for a FIPS code. Anything that is not Los Angeles or Orange is Ventura.
pub fn county_for_fips(fips: i64) -> &'static str {
    match fips {
        LOS_ANGELES_FIPS => "Los_Angeles",
        ORANGE_FIPS => "Orange",
        _ => "Ventura",
    }
}

/// Replaces the FIPS column with an `Int64` column. A missing or fractional code is fatal.
pub fn cast_fips(df: &mut DataFrame) -> Result<()> {
    let values = numeric_values(df, FIPS)?;
    let mut codes = Vec::with_capacity(values.len());
    for (row, value) in values.into_iter().enumerate() {
        match value {
            Some(v) if v.fract() == 0.0 => codes.push(v as i64),
            Some(v) => {
                return Err(WrangleError::InvalidValue {
                    column: FIPS.to_string(),
                    row,
                    message: format!("{v} is not an integer code"),
                });
            }
            None => {
                return Err(WrangleError::InvalidValue {
                    column: FIPS.to_string(),
                    row,
                    message: "missing code cannot be cast to integer".to_string(),
                });
            }
        }
    }
    df.with_column(Series::new(FIPS.into(), codes))?;
    Ok(())
}

/// Keeps rows whose land-use code is one of `codes`.
pub fn filter_single_unit(df: &mut DataFrame, codes: &[i64]) -> Result<usize> {
    let keep: Vec<bool> = numeric_values(df, LAND_USE_TYPE_ID)?
        .into_iter()
        .map(|value| {
            value.is_some_and(|v| v.fract() == 0.0 && codes.contains(&(v as i64)))
        })
        .collect();
    retain_rows(df, &keep)
}

/// Keeps rows with at least one bedroom and bathroom, at most one unit, and
/// at least `min_square_feet` of finished area. Missing counts or area fail.
pub fn filter_livable(df: &mut DataFrame, min_square_feet: f64) -> Result<usize> {
    let bedrooms = numeric_values(df, BEDROOM_COUNT)?;
    let bathrooms = numeric_values(df, BATHROOM_COUNT)?;
    let units = numeric_values(df, UNIT_COUNT)?;
    let area = numeric_values(df, FINISHED_SQUARE_FEET)?;

    let keep: Vec<bool> = (0..df.height())
        .map(|idx| {
            bedrooms[idx].is_some_and(|v| v > 0.0)
                && bathrooms[idx].is_some_and(|v| v > 0.0)
                && units[idx].is_none_or(|v| v <= 1.0)
                && area[idx].is_some_and(|v| v >= min_square_feet)
        })
        .collect();
    retain_rows(df, &keep)
}

pub fn add_county(df: &mut DataFrame) -> Result<()> {
    let counties: Vec<Option<String>> = numeric_values(df, FIPS)?
        .into_iter()
        .map(|code| code.map(|c| county_for_fips(c as i64).to_string()))
        .collect();
    set_string_column(df, COUNTY, counties)
}

pub fn drop_redundant(df: &mut DataFrame) -> Result<()> {
    drop_columns(df, REDUNDANT_COLUMNS)
}

/// Fills nulls whose meaning is known: one unit, no heating, median lot size
/// and median building quality.
pub fn impute_defaults(df: &mut DataFrame, defaults: &ImputationDefaults) -> Result<()> {
    fill_numeric(df, UNIT_COUNT, defaults.unit_count)?;
    fill_numeric(df, LOT_SIZE_SQUARE_FEET, defaults.lot_size)?;
    fill_numeric(df, BUILDING_QUALITY_TYPE_ID, defaults.building_quality)?;

    let heating: Vec<Option<String>> = string_values(df, HEATING_SYSTEM_DESC)?
        .into_iter()
        .map(|value| Some(value.unwrap_or_else(|| defaults.heating_system.clone())))
        .collect();
    set_string_column(df, HEATING_SYSTEM_DESC, heating)
}

fn fill_numeric(df: &mut DataFrame, column: &str, fill: f64) -> Result<()> {
    let filled: Vec<Option<f64>> = numeric_values(df, column)?
        .into_iter()
        .map(|value| Some(value.unwrap_or(fill)))
        .collect();
    set_f64_column(df, column, filled)
}

/// Drops rows at or above the value ceiling, and the area ceiling when enforced.
pub fn filter_value_outliers(df: &mut DataFrame, bounds: &OutlierBounds) -> Result<usize> {
    let values = numeric_values(df, TAX_VALUE_DOLLARS)?;
    let area = if bounds.enforce_square_feet {
        Some(numeric_values(df, FINISHED_SQUARE_FEET)?)
    } else {
        None
    };
    let keep: Vec<bool> = (0..df.height())
        .map(|idx| {
            let value_ok = values[idx].is_some_and(|v| v < bounds.max_tax_value);
            let area_ok = area
                .as_ref()
                .is_none_or(|area| area[idx].is_some_and(|v| v < bounds.max_square_feet));
            value_ok && area_ok
        })
        .collect();
    retain_rows(df, &keep)
}

/// Drops every row holding a null in any column.
pub fn drop_incomplete_rows(df: &mut DataFrame) -> Result<usize> {
    let mut keep = vec![true; df.height()];
    for column in df.get_columns() {
        for (idx, is_null) in column.is_null().into_iter().enumerate() {
            if is_null.unwrap_or(false) {
                keep[idx] = false;
            }
        }
    }
    retain_rows(df, &keep)
}

/// Rewrites `yearbuilt` in place as years elapsed since construction.
pub fn derive_age(df: &mut DataFrame, reference_year: f64) -> Result<()> {
    let ages: Vec<Option<f64>> = numeric_values(df, YEAR_BUILT)?
        .into_iter()
        .map(|year| year.map(|y| reference_year - y))
        .collect();
    set_f64_column(df, YEAR_BUILT, ages)
}

pub fn rename_readable(df: &mut DataFrame) -> Result<()> {
    for (from, _) in READABLE_RENAMES {
        require_column(df, from)?;
    }
    for (from, to) in READABLE_RENAMES {
        df.rename(from, (*to).into())?;
    }
    Ok(())
}
