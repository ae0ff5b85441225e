use polars::prelude::PolarsError;
use thiserror::Error;
use zillow_model::ConfigError;

#[derive(Debug, Error)]
pub enum WrangleError {
    #[error("missing expected column: {column}")]
    MissingColumn { column: String },
    #[error("invalid value in {column} at row {row}: {message}")]
    InvalidValue {
        column: String,
        row: usize,
        message: String,
    },
    #[error("feature column {column} is not numeric ({dtype})")]
    NonNumericFeature { column: String, dtype: String },
    #[error("cannot {operation} an empty table")]
    EmptyTable { operation: &'static str },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, WrangleError>;
