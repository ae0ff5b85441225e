//! Shared vocabulary for the Zillow wrangling workspace.

pub mod columns;
pub mod config;
pub mod error;
pub mod options;

pub use config::{DEFAULT_CACHE_PATH, PipelineConfig};
pub use error::{ConfigError, Result};
pub use options::{
    FinalBounds, ImputationDefaults, OutlierBounds, Profile, PruneThresholds, SplitOptions,
    WrangleOptions,
};
