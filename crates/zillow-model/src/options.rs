//! Configuration options for wrangling and splitting.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Which variant of the domain filter and feature deriver to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Cleaning, imputation, age and renames only.
    #[default]
    Minimal,
    /// Minimal plus engineered buckets, ratios and the final bound filter.
    Extended,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Extended => "extended",
        }
    }
}

/// Non-null fractions a column (then a row) must reach to survive pruning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneThresholds {
    /// Fraction of rows that must be non-null for a column to be kept.
    pub min_column_fill: f64,
    /// Fraction of the remaining columns that must be non-null for a row to be kept.
    pub min_row_fill: f64,
}

impl Default for PruneThresholds {
    fn default() -> Self {
        Self {
            min_column_fill: 0.5,
            min_row_fill: 0.70,
        }
    }
}

impl PruneThresholds {
    pub fn new(min_column_fill: f64, min_row_fill: f64) -> Self {
        Self {
            min_column_fill,
            min_row_fill,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_fraction("min_column_fill", self.min_column_fill)?;
        check_fraction("min_row_fill", self.min_row_fill)
    }
}

/// Fill values for columns whose nulls carry a known meaning.
///
/// Lot size and building quality are medians computed once from the full
/// dataset and pinned here so repeated runs impute identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImputationDefaults {
    pub unit_count: f64,
    pub heating_system: String,
    pub lot_size: f64,
    pub building_quality: f64,
}

impl Default for ImputationDefaults {
    fn default() -> Self {
        Self {
            unit_count: 1.0,
            heating_system: "None".to_string(),
            lot_size: 7313.0,
            building_quality: 6.0,
        }
    }
}

/// Upper bounds applied before the null purge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierBounds {
    /// Rows with an assessed value at or above this are dropped.
    pub max_tax_value: f64,
    /// Rows with finished area at or above this are dropped when `enforce_square_feet` is set.
    pub max_square_feet: f64,
    pub enforce_square_feet: bool,
}

impl Default for OutlierBounds {
    fn default() -> Self {
        Self {
            max_tax_value: 5_000_000.0,
            max_square_feet: 8000.0,
            enforce_square_feet: true,
        }
    }
}

/// Inclusive ranges for the extended profile's last filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalBounds {
    pub min_bathrooms: f64,
    pub max_bathrooms: f64,
    pub min_bedrooms: f64,
    pub max_bedrooms: f64,
    pub max_acres: f64,
    pub max_square_feet: f64,
    pub max_tax_rate: f64,
}

impl Default for FinalBounds {
    fn default() -> Self {
        Self {
            min_bathrooms: 1.0,
            max_bathrooms: 7.0,
            min_bedrooms: 1.0,
            max_bedrooms: 7.0,
            max_acres: 20.0,
            max_square_feet: 9000.0,
            max_tax_rate: 10.0,
        }
    }
}

/// Options for the domain filter and feature deriver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrangleOptions {
    pub profile: Profile,
    pub prune: PruneThresholds,
    /// Land-use codes treated as single-unit residential.
    pub single_unit_land_use: Vec<i64>,
    pub min_square_feet: f64,
    pub imputation: ImputationDefaults,
    pub outliers: OutlierBounds,
    /// Year used to turn `yearbuilt` into an age.
    pub reference_year: f64,
    /// `regionidcity` value flagged by the `cola` feature.
    pub city_flag_region: f64,
    pub final_bounds: FinalBounds,
}

impl Default for WrangleOptions {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            prune: PruneThresholds::default(),
            single_unit_land_use: vec![261, 262, 263, 264, 266, 268, 273, 276, 279],
            min_square_feet: 500.0,
            imputation: ImputationDefaults::default(),
            outliers: OutlierBounds::default(),
            reference_year: 2017.0,
            city_flag_region: 12447.0,
            final_bounds: FinalBounds::default(),
        }
    }
}

impl WrangleOptions {
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.prune.validate()?;
        check_positive("outliers.max_tax_value", self.outliers.max_tax_value)?;
        check_positive("outliers.max_square_feet", self.outliers.max_square_feet)?;
        if self.single_unit_land_use.is_empty() {
            return Err(ConfigError::Message(
                "single_unit_land_use must list at least one code".to_string(),
            ));
        }
        Ok(())
    }
}

/// Options for the train/validate/test split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitOptions {
    /// Column separated out as the target series.
    pub target: String,
    /// Share of all rows held out as test.
    pub test_fraction: f64,
    /// Share of the train+validate pool held out as validate.
    pub validate_fraction: f64,
    pub seed: u64,
    /// Column whose values each hold-out must represent proportionally.
    pub stratify_by: Option<String>,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            target: "logerror".to_string(),
            test_fraction: 0.2,
            validate_fraction: 0.3,
            seed: 123,
            stratify_by: None,
        }
    }
}

impl SplitOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_stratify_by(mut self, column: Option<String>) -> Self {
        self.stratify_by = column;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_fraction("split.test_fraction", self.test_fraction)?;
        check_fraction("split.validate_fraction", self.validate_fraction)?;
        if self.target.trim().is_empty() {
            return Err(ConfigError::Message(
                "split.target must name a column".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_fraction(field: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::FractionOutOfRange { field, value })
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
