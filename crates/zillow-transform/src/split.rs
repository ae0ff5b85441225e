//! Seeded train/validate/test partitioning.
//!
//! The split runs in two stages that each draw a fresh generator from the same
//! seed: the test hold-out first, then the validate hold-out from what remains.
//! Same input, same row order and same seed always give the same partitions.

use std::collections::BTreeMap;

use polars::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::info;
use zillow_model::SplitOptions;

use crate::error::{Result, WrangleError};
use crate::frame::{require_column, string_values};

const NULL_STRATUM: &str = "<null>";

/// One partition: the feature columns and the separated target.
#[derive(Debug, Clone)]
pub struct Partition {
    pub features: DataFrame,
    pub target: Series,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.features.height()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct DataSplit {
    pub train: Partition,
    pub validate: Partition,
    pub test: Partition,
}

/// Hold-out size for `count` rows.
pub fn holdout_size(fraction: f64, count: usize) -> usize {
    ((fraction * count as f64).round() as usize).min(count)
}

/// Splits `df`, reading stratum keys from `options.stratify_by` when it is set.
pub fn split_data(df: &DataFrame, options: &SplitOptions) -> Result<DataSplit> {
    let strata = match &options.stratify_by {
        Some(column) => Some(stratum_keys(df, column)?),
        None => None,
    };
    split_with_strata(df, options, strata.as_deref())
}

/// Splits `df` with stratum keys captured earlier, one per row.
///
/// Lets a column removed by the tidy projection still drive stratification:
/// read its keys with [`stratum_keys`] before tidying, then split the tidy table.
pub fn split_with_strata(
    df: &DataFrame,
    options: &SplitOptions,
    strata: Option<&[String]>,
) -> Result<DataSplit> {
    options.validate()?;
    require_column(df, &options.target)?;
    if df.height() == 0 {
        return Err(WrangleError::EmptyTable { operation: "split" });
    }
    if let Some(keys) = strata
        && keys.len() != df.height()
    {
        return Err(WrangleError::InvalidValue {
            column: options
                .stratify_by
                .clone()
                .unwrap_or_else(|| "strata".to_string()),
            row: keys.len(),
            message: format!("{} stratum keys for {} rows", keys.len(), df.height()),
        });
    }

    let rows: Vec<usize> = (0..df.height()).collect();
    let (pool, test) = hold_out(&rows, options.test_fraction, strata, options.seed);
    let (train, validate) = hold_out(&pool, options.validate_fraction, strata, options.seed);

    info!(
        rows = df.height(),
        train = train.len(),
        validate = validate.len(),
        test = test.len(),
        seed = options.seed,
        stratified = strata.is_some(),
        "split complete"
    );
    Ok(DataSplit {
        train: partition(df, &train, &options.target)?,
        validate: partition(df, &validate, &options.target)?,
        test: partition(df, &test, &options.target)?,
    })
}

/// One stratum key per row; missing values share a single stratum.
pub fn stratum_keys(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    Ok(string_values(df, column)?
        .into_iter()
        .map(|value| value.unwrap_or_else(|| NULL_STRATUM.to_string()))
        .collect())
}

/// Shuffles `rows` and returns `(kept, held)`, both in shuffled order.
///
/// With strata, the hold-out quota is shared across strata by largest
/// remainder so each one is represented in proportion to its size.
fn hold_out(
    rows: &[usize],
    fraction: f64,
    strata: Option<&[String]>,
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    let mut shuffled = rows.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);
    let quota = holdout_size(fraction, shuffled.len());

    let held_flags: Vec<bool> = match strata {
        None => (0..shuffled.len()).map(|pos| pos < quota).collect(),
        Some(keys) => stratified_flags(&shuffled, keys, quota),
    };

    let mut kept = Vec::with_capacity(shuffled.len() - quota);
    let mut held = Vec::with_capacity(quota);
    for (row, is_held) in shuffled.into_iter().zip(held_flags) {
        if is_held {
            held.push(row);
        } else {
            kept.push(row);
        }
    }
    (kept, held)
}

fn stratified_flags(shuffled: &[usize], keys: &[String], quota: usize) -> Vec<bool> {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (pos, row) in shuffled.iter().enumerate() {
        groups.entry(keys[*row].as_str()).or_default().push(pos);
    }

    let total = shuffled.len() as f64;
    let mut allocations: Vec<(usize, f64, &Vec<usize>)> = groups
        .values()
        .map(|positions| {
            let exact = quota as f64 * positions.len() as f64 / total;
            (exact.floor() as usize, exact - exact.floor(), positions)
        })
        .collect();

    let assigned: usize = allocations.iter().map(|(n, _, _)| n).sum();
    let mut order: Vec<usize> = (0..allocations.len()).collect();
    order.sort_by(|a, b| allocations[*b].1.total_cmp(&allocations[*a].1));
    for idx in order.into_iter().take(quota.saturating_sub(assigned)) {
        allocations[idx].0 += 1;
    }

    let mut flags = vec![false; shuffled.len()];
    for (count, _, positions) in allocations {
        for pos in positions.iter().take(count) {
            flags[*pos] = true;
        }
    }
    flags
}

fn partition(df: &DataFrame, rows: &[usize], target: &str) -> Result<Partition> {
    let idx: Vec<IdxSize> = rows.iter().map(|row| *row as IdxSize).collect();
    let taken = df.take(&IdxCa::from_vec("idx".into(), idx))?;
    let target_series = taken.column(target)?.as_materialized_series().clone();
    let features = taken.drop(target)?;
    Ok(Partition {
        features,
        target: target_series,
    })
}
