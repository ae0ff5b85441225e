//! Engineered columns and the closing bound filter of the extended profile.
//!
//! Everything here runs after the readable renames, so inputs are addressed by
//! their readable names where one exists.

use polars::prelude::DataFrame;
use zillow_model::FinalBounds;
use zillow_model::columns::{
    ACRES, BATH_BED_RATIO, BATHROOMS, BEDROOMS, COLA, LAND_DOLLAR_PER_SQFT,
    LAND_TAX_VALUE_DOLLARS, LOT_SIZE, REGION_ID_CITY, SQUARE_FEET, STRUCTURE_DOLLAR_PER_SQFT,
    STRUCTURE_TAX_VALUE_DOLLARS, TAX_AMOUNT, TAX_RATE, TAX_VALUE,
};

use crate::bins::{
    ACRES_BINS, AGE_BINS, BinSpec, LAND_TAX_VALUE_BINS, LOT_DOLLAR_SQFT_BINS, SQFT_BINS,
    STRUCTURE_DOLLAR_SQFT_BINS, TAX_VALUE_BINS,
};
use crate::error::Result;
use crate::frame::{numeric_values, ratio, retain_rows, set_f64_column};

pub const SQUARE_FEET_PER_ACRE: f64 = 43_560.0;

/// Appends the extended feature columns in their documented order.
pub fn derive_extended_features(df: &mut DataFrame, city_flag_region: f64) -> Result<()> {
    add_bins(df, &AGE_BINS)?;

    let tax_amount = numeric_values(df, TAX_AMOUNT)?;
    let tax_value = numeric_values(df, TAX_VALUE)?;
    let tax_rate = tax_amount
        .iter()
        .zip(&tax_value)
        .map(|(amount, value)| ratio(*amount, *value).map(|r| r * 100.0))
        .collect();
    set_f64_column(df, TAX_RATE, tax_rate)?;

    let acres = numeric_values(df, LOT_SIZE)?
        .into_iter()
        .map(|lot| lot.map(|sqft| sqft / SQUARE_FEET_PER_ACRE))
        .collect();
    set_f64_column(df, ACRES, acres)?;
    add_bins(df, &ACRES_BINS)?;

    add_bins(df, &TAX_VALUE_BINS)?;
    add_bins(df, &LAND_TAX_VALUE_BINS)?;
    add_bins(df, &SQFT_BINS)?;

    add_ratio(df, STRUCTURE_DOLLAR_PER_SQFT, STRUCTURE_TAX_VALUE_DOLLARS, SQUARE_FEET)?;
    add_bins(df, &STRUCTURE_DOLLAR_SQFT_BINS)?;
    add_ratio(df, LAND_DOLLAR_PER_SQFT, LAND_TAX_VALUE_DOLLARS, LOT_SIZE)?;
    add_bins(df, &LOT_DOLLAR_SQFT_BINS)?;

    add_ratio(df, BATH_BED_RATIO, BATHROOMS, BEDROOMS)?;

    let cola = numeric_values(df, REGION_ID_CITY)?
        .into_iter()
        .map(|city| Some(if city == Some(city_flag_region) { 1.0 } else { 0.0 }))
        .collect();
    set_f64_column(df, COLA, cola)
}

fn add_bins(df: &mut DataFrame, spec: &BinSpec) -> Result<()> {
    let source = numeric_values(df, spec.source)?;
    set_f64_column(df, spec.column, spec.assign_all(&source))
}

fn add_ratio(df: &mut DataFrame, name: &str, numerator: &str, denominator: &str) -> Result<()> {
    let top = numeric_values(df, numerator)?;
    let bottom = numeric_values(df, denominator)?;
    let values = top
        .into_iter()
        .zip(bottom)
        .map(|(n, d)| ratio(n, d))
        .collect();
    set_f64_column(df, name, values)
}

/// Keeps rows inside every inclusive bound. A missing value fails its bound.
pub fn apply_final_bounds(df: &mut DataFrame, bounds: &FinalBounds) -> Result<usize> {
    let bathrooms = numeric_values(df, BATHROOMS)?;
    let bedrooms = numeric_values(df, BEDROOMS)?;
    let acres = numeric_values(df, ACRES)?;
    let square_feet = numeric_values(df, SQUARE_FEET)?;
    let tax_rate = numeric_values(df, TAX_RATE)?;

    let within = |value: Option<f64>, min: f64, max: f64| {
        value.is_some_and(|v| v >= min && v <= max)
    };
    let keep: Vec<bool> = (0..df.height())
        .map(|idx| {
            within(bathrooms[idx], bounds.min_bathrooms, bounds.max_bathrooms)
                && within(bedrooms[idx], bounds.min_bedrooms, bounds.max_bedrooms)
                && acres[idx].is_some_and(|v| v <= bounds.max_acres)
                && square_feet[idx].is_some_and(|v| v <= bounds.max_square_feet)
                && tax_rate[idx].is_some_and(|v| v <= bounds.max_tax_rate)
        })
        .collect();
    retain_rows(df, &keep)
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;
    use zillow_model::columns::{AGE, AGE_BIN, EXTENDED_COLUMNS};

    use super::*;
    use crate::frame::column_names;

    fn renamed_frame() -> DataFrame {
        df!(
            TAX_VALUE => [400_000.0, 250_000.0],
            BEDROOMS => [3.0, 0.0],
            BATHROOMS => [2.0, 1.0],
            SQUARE_FEET => [1200.0, 900.0],
            LOT_SIZE => [8000.0, 0.0],
            AGE => [27.0, 150.0],
            TAX_AMOUNT => [5000.0, 3000.0],
            STRUCTURE_TAX_VALUE_DOLLARS => [150_000.0, 90_000.0],
            LAND_TAX_VALUE_DOLLARS => [250_000.0, 160_000.0],
            REGION_ID_CITY => [Some(12447.0), None],
        )
        .unwrap()
    }

    #[test]
    fn extended_columns_are_appended_in_order() {
        let mut df = renamed_frame();
        let before = df.width();
        derive_extended_features(&mut df, 12447.0).unwrap();
        let names = column_names(&df);
        assert_eq!(&names[before..], EXTENDED_COLUMNS);
    }

    #[test]
    fn derived_values_for_a_typical_home() {
        let mut df = renamed_frame();
        derive_extended_features(&mut df, 12447.0).unwrap();
        let rate = numeric_values(&df, TAX_RATE).unwrap()[0].unwrap();
        assert!((rate - 1.25).abs() < 1e-9);
        let acres = numeric_values(&df, ACRES).unwrap()[0].unwrap();
        assert!((acres - 0.18365).abs() < 1e-4);
        assert_eq!(numeric_values(&df, AGE_BIN).unwrap()[0], Some(0.2));
        assert_eq!(numeric_values(&df, COLA).unwrap(), vec![Some(1.0), Some(0.0)]);
        assert_eq!(numeric_values(&df, STRUCTURE_DOLLAR_PER_SQFT).unwrap()[0], Some(125.0));
    }

    #[test]
    fn zero_denominators_and_out_of_range_bins_become_null() {
        let mut df = renamed_frame();
        derive_extended_features(&mut df, 12447.0).unwrap();
        assert_eq!(numeric_values(&df, BATH_BED_RATIO).unwrap()[1], None);
        assert_eq!(numeric_values(&df, LAND_DOLLAR_PER_SQFT).unwrap()[1], None);
        assert_eq!(numeric_values(&df, AGE_BIN).unwrap()[1], None);
    }

    #[test]
    fn final_bounds_are_inclusive() {
        let mut df = df!(
            BATHROOMS => [1.0, 7.0, 7.5, 2.0],
            BEDROOMS => [1.0, 7.0, 3.0, 3.0],
            ACRES => [0.2, 20.0, 0.2, 0.2],
            SQUARE_FEET => [900.0, 9000.0, 900.0, 900.0],
            TAX_RATE => [Some(1.0), Some(10.0), Some(1.0), None],
        )
        .unwrap();
        let removed = apply_final_bounds(&mut df, &FinalBounds::default()).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(df.height(), 2);
    }
}
