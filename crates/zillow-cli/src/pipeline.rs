//! Stage orchestration shared by the subcommands.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::{info, info_span, warn};
use zillow_ingest::{RecordSource, load_zillow_data};
use zillow_model::PipelineConfig;
use zillow_transform::{
    DataSplit, ScaledPartitions, audit, run_wrangle, scale_partitions, split_with_strata,
    stratum_keys, tidy,
};

use crate::types::{AcquireResult, AuditResult, PartitionSizes, PrepareResult};

pub const SCALER_FILE: &str = "scaler.json";

/// Loads the raw table, noting whether the cache answered.
pub fn acquire(
    cache_path: &Path,
    source: &dyn RecordSource,
) -> Result<(DataFrame, AcquireResult)> {
    let from_cache = cache_path.is_file();
    let df = load_zillow_data(cache_path, source)?;
    let result = AcquireResult {
        cache_path: cache_path.to_path_buf(),
        from_cache,
        rows: df.height(),
        columns: df.width(),
    };
    Ok((df, result))
}

/// Loads the raw table and reports its missingness, optionally as JSON.
pub fn audit_source(
    cache_path: &Path,
    source: &dyn RecordSource,
    json_path: Option<&Path>,
) -> Result<AuditResult> {
    let (df, acquire) = acquire(cache_path, source)?;
    let report = info_span!("audit").in_scope(|| audit(&df));
    if let Some(path) = json_path {
        let body = serde_json::to_string_pretty(&report).context("serialize audit report")?;
        write_text(path, &body)?;
    }
    Ok(AuditResult {
        acquire,
        report,
        json_path: json_path.map(Path::to_path_buf),
    })
}

/// Runs load, wrangle, tidy, split and scale; writes partitions unless `dry_run`.
pub fn prepare(
    source: &dyn RecordSource,
    config: &PipelineConfig,
    output_dir: &Path,
    dry_run: bool,
) -> Result<PrepareResult> {
    config.validate().context("invalid pipeline configuration")?;

    // =========================================================================
    // Stage 1: Acquire
    // =========================================================================
    let (mut df, acquire) = acquire(&config.cache_path, source)?;

    // =========================================================================
    // Stage 2: Wrangle (includes pruning)
    // =========================================================================
    let wrangle = run_wrangle(&mut df, &config.wrangle).context("wrangle raw table")?;

    // =========================================================================
    // Stage 3: Tidy
    // =========================================================================
    // Stratum keys are read first so a dropped column can still stratify.
    let strata = match &config.split.stratify_by {
        Some(column) => Some(
            stratum_keys(&df, column)
                .with_context(|| format!("read stratification column {column}"))?,
        ),
        None => None,
    };
    let tidy_removed = tidy(&mut df, config.tidy_drop.as_slice()).context("tidy wrangled table")?;

    // =========================================================================
    // Stage 4: Split
    // =========================================================================
    let split_span = info_span!("split", target = %config.split.target);
    let split = split_span
        .in_scope(|| split_with_strata(&df, &config.split, strata.as_deref()))
        .context("split wrangled table")?;
    let partitions = PartitionSizes {
        train: split.train.len(),
        validate: split.validate.len(),
        test: split.test.len(),
    };
    if split.train.is_empty() || split.validate.is_empty() || split.test.is_empty() {
        warn!(
            train = partitions.train,
            validate = partitions.validate,
            test = partitions.test,
            "a partition is empty"
        );
    }

    // =========================================================================
    // Stage 5: Scale
    // =========================================================================
    let scale_start = Instant::now();
    let scaled = info_span!("scale")
        .in_scope(|| {
            scale_partitions(
                &split.train.features,
                &split.validate.features,
                &split.test.features,
            )
        })
        .context("scale partitions")?;
    info!(
        features = scaled.scaler.features().len(),
        duration_ms = scale_start.elapsed().as_millis(),
        "scale complete"
    );

    let outputs = if dry_run {
        info!(output_dir = %output_dir.display(), "dry run, nothing written");
        Vec::new()
    } else {
        write_outputs(output_dir, &split, &scaled)?
    };

    Ok(PrepareResult {
        acquire,
        wrangle,
        tidy_removed,
        features: scaled
            .scaler
            .features()
            .iter()
            .map(|range| range.name.clone())
            .collect(),
        target: config.split.target.clone(),
        partitions,
        output_dir: output_dir.to_path_buf(),
        outputs,
    })
}

/// Writes `X_<partition>.csv`, `y_<partition>.csv` and the fitted scaler.
pub fn write_outputs(
    output_dir: &Path,
    split: &DataSplit,
    scaled: &ScaledPartitions,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("create output directory: {}", output_dir.display()))?;

    let mut written = Vec::new();
    let partitions = [
        ("train", &scaled.train, &split.train.target),
        ("validate", &scaled.validate, &split.validate.target),
        ("test", &scaled.test, &split.test.target),
    ];
    for (name, features, target) in partitions {
        let features_path = output_dir.join(format!("X_{name}.csv"));
        write_csv(&features_path, &mut features.clone())?;
        written.push(features_path);

        let target_path = output_dir.join(format!("y_{name}.csv"));
        let mut target_frame = DataFrame::new(vec![target.clone().into_column()])
            .context("build target frame")?;
        write_csv(&target_path, &mut target_frame)?;
        written.push(target_path);
    }

    let scaler_path = output_dir.join(SCALER_FILE);
    let body = serde_json::to_string_pretty(&scaled.scaler).context("serialize scaler")?;
    write_text(&scaler_path, &body)?;
    written.push(scaler_path);

    info!(
        output_dir = %output_dir.display(),
        file_count = written.len(),
        "outputs written"
    );
    Ok(written)
}

fn write_csv(path: &Path, df: &mut DataFrame) -> Result<()> {
    let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("write {}", path.display()))
}

fn write_text(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory: {}", parent.display()))?;
    }
    fs::write(path, body).with_context(|| format!("write {}", path.display()))
}
