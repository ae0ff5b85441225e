//! Fixed-edge bucketing for the extended feature set.
//!
//! Every bucket is the left-closed interval `[edges[i], edges[i + 1])` labelled
//! `labels[i]`. Values below the first edge, at or above the last edge, or
//! missing have no bucket.

use zillow_model::columns::{
    ACRES, ACRES_BIN, AGE, AGE_BIN, LAND_DOLLAR_PER_SQFT, LAND_TAX_VALUE_BIN,
    LAND_TAX_VALUE_DOLLARS, LOT_DOLLAR_SQFT_BIN, SQFT_BIN, SQUARE_FEET,
    STRUCTURE_DOLLAR_PER_SQFT, STRUCTURE_DOLLAR_SQFT_BIN, TAX_VALUE, TAX_VALUE_BIN,
};

/// Labels shared by every ten-bucket column.
pub const DECILE_LABELS: &[f64] = &[0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];

pub const AGE_LABELS: &[f64] = &[
    0.0, 0.066, 0.133, 0.20, 0.266, 0.333, 0.40, 0.466, 0.533, 0.60, 0.666, 0.733, 0.8, 0.866,
    0.933,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinSpec {
    /// Column holding the bucket label.
    pub column: &'static str,
    /// Continuous column being bucketed.
    pub source: &'static str,
    pub edges: &'static [f64],
    pub labels: &'static [f64],
}

impl BinSpec {
    /// Label for `value`, or `None` when it falls outside every bucket.
    pub fn assign(&self, value: Option<f64>) -> Option<f64> {
        let value = value?;
        let first = *self.edges.first()?;
        let last = *self.edges.last()?;
        if value.is_nan() || value < first || value >= last {
            return None;
        }
        let upper = self.edges.partition_point(|edge| *edge <= value);
        self.labels.get(upper - 1).copied()
    }

    pub fn assign_all(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        values.iter().map(|value| self.assign(*value)).collect()
    }

    pub fn bucket_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }
}

pub const AGE_BINS: BinSpec = BinSpec {
    column: AGE_BIN,
    source: AGE,
    edges: &[
        0.0, 5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0, 110.0, 120.0,
        130.0, 140.0,
    ],
    labels: AGE_LABELS,
};

pub const ACRES_BINS: BinSpec = BinSpec {
    column: ACRES_BIN,
    source: ACRES,
    edges: &[0.0, 0.10, 0.15, 0.25, 0.5, 1.0, 5.0, 10.0, 20.0, 50.0, 200.0],
    labels: DECILE_LABELS,
};

pub const TAX_VALUE_BINS: BinSpec = BinSpec {
    column: TAX_VALUE_BIN,
    source: TAX_VALUE,
    edges: &[
        0.0, 80_000.0, 150_000.0, 225_000.0, 300_000.0, 350_000.0, 450_000.0, 550_000.0,
        650_000.0, 900_000.0, 5_000_000.0,
    ],
    labels: DECILE_LABELS,
};

pub const LAND_TAX_VALUE_BINS: BinSpec = BinSpec {
    column: LAND_TAX_VALUE_BIN,
    source: LAND_TAX_VALUE_DOLLARS,
    edges: &[
        0.0, 50_000.0, 100_000.0, 150_000.0, 200_000.0, 250_000.0, 350_000.0, 450_000.0,
        650_000.0, 800_000.0, 1_000_000.0,
    ],
    labels: DECILE_LABELS,
};

pub const SQFT_BINS: BinSpec = BinSpec {
    column: SQFT_BIN,
    source: SQUARE_FEET,
    edges: &[
        0.0, 800.0, 1000.0, 1250.0, 1500.0, 2000.0, 2500.0, 3000.0, 4000.0, 7000.0, 12_000.0,
    ],
    labels: DECILE_LABELS,
};

pub const STRUCTURE_DOLLAR_SQFT_BINS: BinSpec = BinSpec {
    column: STRUCTURE_DOLLAR_SQFT_BIN,
    source: STRUCTURE_DOLLAR_PER_SQFT,
    edges: &[
        0.0, 25.0, 50.0, 75.0, 100.0, 150.0, 200.0, 300.0, 500.0, 1000.0, 1500.0,
    ],
    labels: DECILE_LABELS,
};

pub const LOT_DOLLAR_SQFT_BINS: BinSpec = BinSpec {
    column: LOT_DOLLAR_SQFT_BIN,
    source: LAND_DOLLAR_PER_SQFT,
    edges: &[
        0.0, 1.0, 5.0, 20.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 1500.0, 2000.0,
    ],
    labels: DECILE_LABELS,
};
