//! Top-level pipeline configuration, loadable from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::columns::DEFAULT_TIDY_DROP;
use crate::error::{ConfigError, Result};
use crate::options::{SplitOptions, WrangleOptions};

/// Default location of the CSV cache written on first load.
pub const DEFAULT_CACHE_PATH: &str = "zillow_db.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub cache_path: PathBuf,
    pub wrangle: WrangleOptions,
    pub split: SplitOptions,
    /// Columns removed by the tidy projection before splitting.
    pub tidy_drop: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            wrangle: WrangleOptions::default(),
            split: SplitOptions::default(),
            tidy_drop: DEFAULT_TIDY_DROP.iter().map(ToString::to_string).collect(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        self.wrangle.validate()?;
        self.split.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Profile;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = PipelineConfig::from_toml_str("").expect("parse empty");
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.cache_path, PathBuf::from("zillow_db.csv"));
    }

    #[test]
    fn partial_toml_overrides_nested_fields() {
        let raw = r#"
cache_path = "data/cache.csv"

[wrangle]
profile = "extended"

[wrangle.prune]
min_row_fill = 0.8

[wrangle.outliers]
max_tax_value = 2000000.0

[split]
seed = 7
stratify_by = "county"
"#;
        let config = PipelineConfig::from_toml_str(raw).expect("parse config");
        assert_eq!(config.cache_path, PathBuf::from("data/cache.csv"));
        assert_eq!(config.wrangle.profile, Profile::Extended);
        assert!((config.wrangle.prune.min_row_fill - 0.8).abs() < f64::EPSILON);
        assert!((config.wrangle.prune.min_column_fill - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.wrangle.outliers.max_tax_value, 2_000_000.0);
        assert_eq!(config.wrangle.outliers.max_square_feet, 8000.0);
        assert!(config.wrangle.outliers.enforce_square_feet);
        assert_eq!(config.split.seed, 7);
        assert_eq!(config.split.stratify_by.as_deref(), Some("county"));
    }

    #[test]
    fn invalid_fraction_is_rejected() {
        let raw = "[split]\ntest_fraction = 1.2\n";
        let err = PipelineConfig::from_toml_str(raw).unwrap_err();
        assert!(err.to_string().contains("split.test_fraction"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = PipelineConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn config_serializes_to_json() {
        let json = serde_json::to_string(&PipelineConfig::default()).expect("serialize");
        let round: PipelineConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(round.split.target, "logerror");
    }
}
