//! Min-max scaling fitted on the training partition only.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, WrangleError};
use crate::frame::{numeric_values, require_column};

/// Observed range of one training feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    pub name: String,
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    /// `max - min`, or `1.0` when the feature never varied.
    pub fn scale(&self) -> f64 {
        let range = self.max - self.min;
        if range > 0.0 { range } else { 1.0 }
    }

    pub fn apply(&self, value: f64) -> f64 {
        (value - self.min) / self.scale()
    }
}

/// Per-feature ranges in training column order. Immutable once fitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    features: Vec<FeatureRange>,
}

impl MinMaxScaler {
    pub fn fit(features: &DataFrame) -> Result<Self> {
        if features.height() == 0 {
            return Err(WrangleError::EmptyTable {
                operation: "fit a scaler on",
            });
        }
        let mut ranges = Vec::with_capacity(features.width());
        for column in features.get_columns() {
            let name = column.name().to_string();
            if !is_numeric(column.dtype()) {
                return Err(WrangleError::NonNumericFeature {
                    column: name,
                    dtype: column.dtype().to_string(),
                });
            }
            let observed: Vec<f64> = numeric_values(features, &name)?
                .into_iter()
                .flatten()
                .collect();
            if observed.is_empty() {
                return Err(WrangleError::InvalidValue {
                    column: name,
                    row: 0,
                    message: "no observed values to fit".to_string(),
                });
            }
            let min = observed.iter().copied().fold(f64::INFINITY, f64::min);
            let max = observed.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if min == max {
                warn!(feature = %name, value = min, "constant feature uses a unit range");
            }
            ranges.push(FeatureRange { name, min, max });
        }
        debug!(features = ranges.len(), rows = features.height(), "scaler fitted");
        Ok(Self { features: ranges })
    }

    pub fn features(&self) -> &[FeatureRange] {
        &self.features
    }

    /// Scales every fitted feature; extra columns in `df` are ignored.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.features.len());
        for range in &self.features {
            require_column(df, &range.name)?;
            let scaled: Vec<Option<f64>> = numeric_values(df, &range.name)?
                .into_iter()
                .map(|value| value.map(|v| range.apply(v)))
                .collect();
            columns.push(Series::new(range.name.as_str().into(), scaled).into_column());
        }
        Ok(DataFrame::new(columns)?)
    }

    pub fn fit_transform(features: &DataFrame) -> Result<(Self, DataFrame)> {
        let scaler = Self::fit(features)?;
        let scaled = scaler.transform(features)?;
        Ok((scaler, scaled))
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Scaled feature tables for all three partitions plus the fitted state.
#[derive(Debug, Clone)]
pub struct ScaledPartitions {
    pub scaler: MinMaxScaler,
    pub train: DataFrame,
    pub validate: DataFrame,
    pub test: DataFrame,
}

/// Fits on `train` and applies the same ranges to `validate` and `test`.
pub fn scale_partitions(
    train: &DataFrame,
    validate: &DataFrame,
    test: &DataFrame,
) -> Result<ScaledPartitions> {
    let (scaler, train) = MinMaxScaler::fit_transform(train)?;
    Ok(ScaledPartitions {
        validate: scaler.transform(validate)?,
        test: scaler.transform(test)?,
        train,
        scaler,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::column_names;

    fn values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        numeric_values(df, name).unwrap()
    }

    #[test]
    fn train_maps_onto_unit_interval() {
        let train = df!(
            "bedrooms" => [1.0, 3.0, 5.0],
            "bathrooms" => [2.0, 2.0, 2.0],
        )
        .unwrap();
        let (scaler, scaled) = MinMaxScaler::fit_transform(&train).unwrap();
        assert_eq!(values(&scaled, "bedrooms"), vec![Some(0.0), Some(0.5), Some(1.0)]);
        // constant feature: unit scale, so every value becomes zero
        assert_eq!(values(&scaled, "bathrooms"), vec![Some(0.0), Some(0.0), Some(0.0)]);
        assert_eq!(scaler.features()[0].min, 1.0);
        assert_eq!(scaler.features()[0].max, 5.0);
    }

    #[test]
    fn other_partitions_reuse_train_ranges() {
        let train = df!("x" => [10.0, 20.0]).unwrap();
        let validate = df!("x" => [5.0, 30.0]).unwrap();
        let test = df!("x" => [15.0]).unwrap();
        let scaled = scale_partitions(&train, &validate, &test).unwrap();
        assert_eq!(values(&scaled.validate, "x"), vec![Some(-0.5), Some(2.0)]);
        assert_eq!(values(&scaled.test, "x"), vec![Some(0.5)]);
    }

    #[test]
    fn output_keeps_fitted_order() {
        let train = df!("b" => [1.0, 2.0], "a" => [3.0, 4.0]).unwrap();
        let scaler = MinMaxScaler::fit(&train).unwrap();
        let shuffled = df!("a" => [3.0], "extra" => [0.0], "b" => [2.0]).unwrap();
        let scaled = scaler.transform(&shuffled).unwrap();
        assert_eq!(column_names(&scaled), vec!["b", "a"]);
    }

    #[test]
    fn missing_feature_at_transform_fails() {
        let scaler = MinMaxScaler::fit(&df!("a" => [1.0, 2.0]).unwrap()).unwrap();
        let err = scaler.transform(&df!("b" => [1.0]).unwrap()).unwrap_err();
        assert!(matches!(err, WrangleError::MissingColumn { .. }));
    }

    #[test]
    fn text_features_cannot_be_fitted() {
        let err = MinMaxScaler::fit(&df!("county" => ["Orange"]).unwrap()).unwrap_err();
        assert!(matches!(err, WrangleError::NonNumericFeature { .. }));
    }

    #[test]
    fn state_round_trips_through_json() {
        let scaler = MinMaxScaler::fit(&df!("a" => [1.0, 4.0]).unwrap()).unwrap();
        let json = serde_json::to_string(&scaler).unwrap();
        assert_eq!(json, r#"{"features":[{"name":"a","min":1.0,"max":4.0}]}"#);
        let restored: MinMaxScaler = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, scaler);
    }
}
