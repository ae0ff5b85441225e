use std::path::PathBuf;

use zillow_transform::{MissingnessReport, WrangleOutcome};

#[derive(Debug)]
pub struct AcquireResult {
    pub cache_path: PathBuf,
    pub from_cache: bool,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug)]
pub struct AuditResult {
    pub acquire: AcquireResult,
    pub report: MissingnessReport,
    pub json_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionSizes {
    pub train: usize,
    pub validate: usize,
    pub test: usize,
}

#[derive(Debug)]
pub struct PrepareResult {
    pub acquire: AcquireResult,
    pub wrangle: WrangleOutcome,
    pub tidy_removed: Vec<String>,
    pub features: Vec<String>,
    pub target: String,
    pub partitions: PartitionSizes,
    pub output_dir: PathBuf,
    /// Files written, empty on a dry run.
    pub outputs: Vec<PathBuf>,
}
