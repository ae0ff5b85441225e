//! Cleaning, feature derivation, splitting and scaling of the Zillow table.
//!
//! Stages run in a fixed order: audit (diagnostic only), wrangle (which prunes
//! sparse data as one of its steps), tidy, split, scale.

pub mod audit;
pub mod bins;
pub mod clean;
pub mod error;
pub mod features;
pub mod frame;
pub mod pipeline;
pub mod prune;
pub mod scale;
pub mod split;
pub mod tidy;

pub use audit::{ColumnMissing, MissingnessReport, RowMissing, audit, nulls_by_column, nulls_by_row};
pub use bins::BinSpec;
pub use error::{Result, WrangleError};
pub use pipeline::{
    StepReport, WrangleContext, WrangleOutcome, WranglePipeline, WrangleState, WrangleStep,
    build_default_pipeline, run_wrangle, wrangle_zillow,
};
pub use prune::{PruneOutcome, prune_missing};
pub use scale::{FeatureRange, MinMaxScaler, ScaledPartitions, scale_partitions};
pub use split::{DataSplit, Partition, split_data, split_with_strata, stratum_keys};
pub use tidy::tidy;
