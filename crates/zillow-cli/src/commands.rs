use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};
use zillow_cli::pipeline::{acquire, audit_source, prepare};
use zillow_cli::types::{AcquireResult, AuditResult, PrepareResult};
use zillow_ingest::SqliteSource;
use zillow_model::{DEFAULT_CACHE_PATH, PipelineConfig};

use crate::cli::{AuditArgs, PrepareArgs, SourceArgs};

fn cache_path(args: &SourceArgs) -> PathBuf {
    args.cache
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_PATH))
}

pub fn run_acquire(args: &SourceArgs) -> Result<AcquireResult> {
    let source = SqliteSource::new(&args.db);
    let (_, result) = acquire(&cache_path(args), &source)?;
    Ok(result)
}

pub fn run_audit(args: &AuditArgs) -> Result<AuditResult> {
    let source = SqliteSource::new(&args.source.db);
    audit_source(&cache_path(&args.source), &source, args.json.as_deref())
}

pub fn run_prepare(args: &PrepareArgs) -> Result<PrepareResult> {
    let config = resolve_config(args)?;
    let span = info_span!(
        "prepare",
        profile = config.wrangle.profile.as_str(),
        output_dir = %args.output_dir.display()
    );
    let _guard = span.enter();
    let start = Instant::now();

    let source = SqliteSource::new(&args.source.db);
    let result = prepare(&source, &config, &args.output_dir, args.dry_run)?;
    info!(
        train = result.partitions.train,
        validate = result.partitions.validate,
        test = result.partitions.test,
        duration_ms = start.elapsed().as_millis(),
        "prepare complete"
    );
    Ok(result)
}

/// Config file (or defaults) with command-line overrides applied.
fn resolve_config(args: &PrepareArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("load config: {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(cache) = &args.source.cache {
        config.cache_path = cache.clone();
    }
    if let Some(profile) = args.profile {
        config.wrangle.profile = profile.into();
    }
    if let Some(seed) = args.seed {
        config.split.seed = seed;
    }
    if let Some(column) = &args.stratify_by {
        config.split.stratify_by = Some(column.clone());
    }
    config.validate().context("invalid pipeline configuration")?;
    Ok(config)
}
