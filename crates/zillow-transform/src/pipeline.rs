//! Ordered wrangle steps for both profiles.
//!
//! The default pipeline lists every step once; steps that belong to the
//! extended profile skip themselves when the minimal profile is selected.
//!
//! # Step order
//!
//! 1. `cast_fips`
//! 2. `filter_single_unit`
//! 3. `filter_livable`
//! 4. `prune_missing`
//! 5. `add_county`
//! 6. `drop_redundant`
//! 7. `impute_defaults` (covers fill steps 7 and 8)
//! 8. `filter_value_outliers`
//! 9. `drop_incomplete_rows`
//! 10. `derive_age`
//! 11. `rename_readable`
//! 12. `derive_extended_features` (extended only)
//! 13. `purge_derived_nulls` (extended only)
//! 14. `apply_final_bounds` (extended only)

use std::time::Instant;

use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{debug, info, info_span};
use zillow_model::{Profile, WrangleOptions};

use crate::clean;
use crate::error::{Result, WrangleError};
use crate::features;
use crate::prune::{PruneOutcome, prune_missing};

/// Options visible to every step.
pub struct WrangleContext<'a> {
    pub options: &'a WrangleOptions,
}

impl<'a> WrangleContext<'a> {
    pub fn new(options: &'a WrangleOptions) -> Self {
        Self { options }
    }

    pub fn is_extended(&self) -> bool {
        self.options.profile == Profile::Extended
    }
}

/// Row and column counts around one executed step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub step: String,
    pub rows_in: usize,
    pub rows_out: usize,
    pub columns_in: usize,
    pub columns_out: usize,
    pub duration_ms: u128,
}

/// Mutable state shared across steps.
#[derive(Debug, Default)]
pub struct WrangleState {
    pub prune: Option<PruneOutcome>,
    pub reports: Vec<StepReport>,
    pub skipped_steps: Vec<String>,
}

pub trait WrangleStep: Send + Sync {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &WrangleContext<'_>,
        state: &mut WrangleState,
    ) -> Result<()>;

    fn step_name(&self) -> &str;

    /// Default implementation always runs the step.
    fn should_skip(&self, _ctx: &WrangleContext<'_>) -> bool {
        false
    }
}

pub struct WranglePipeline {
    steps: Vec<Box<dyn WrangleStep>>,
}

impl Default for WranglePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl WranglePipeline {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn add_step(mut self, step: Box<dyn WrangleStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.step_name()).collect()
    }

    pub fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &WrangleContext<'_>,
        state: &mut WrangleState,
    ) -> Result<()> {
        for step in &self.steps {
            let name = step.step_name();
            if step.should_skip(ctx) {
                debug!(step = name, "step skipped");
                state.skipped_steps.push(name.to_string());
                continue;
            }
            let span = info_span!("wrangle_step", step = name);
            let _guard = span.enter();
            let (rows_in, columns_in) = df.shape();
            let start = Instant::now();
            step.execute(df, ctx, state)?;
            let report = StepReport {
                step: name.to_string(),
                rows_in,
                rows_out: df.height(),
                columns_in,
                columns_out: df.width(),
                duration_ms: start.elapsed().as_millis(),
            };
            debug!(
                rows_in,
                rows_out = report.rows_out,
                columns_in,
                columns_out = report.columns_out,
                duration_ms = report.duration_ms,
                "step complete"
            );
            state.reports.push(report);
        }
        Ok(())
    }
}

/// Every step of both profiles in execution order.
pub fn build_default_pipeline() -> WranglePipeline {
    WranglePipeline::new()
        .add_step(Box::new(CastFipsStep))
        .add_step(Box::new(FilterSingleUnitStep))
        .add_step(Box::new(FilterLivableStep))
        .add_step(Box::new(PruneMissingStep))
        .add_step(Box::new(AddCountyStep))
        .add_step(Box::new(DropRedundantStep))
        .add_step(Box::new(ImputeDefaultsStep))
        .add_step(Box::new(FilterValueOutliersStep))
        .add_step(Box::new(DropIncompleteRowsStep))
        .add_step(Box::new(DeriveAgeStep))
        .add_step(Box::new(RenameReadableStep))
        .add_step(Box::new(DeriveExtendedFeaturesStep))
        .add_step(Box::new(PurgeDerivedNullsStep))
        .add_step(Box::new(ApplyFinalBoundsStep))
}

/// Summary of a full wrangle run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrangleOutcome {
    pub profile: Profile,
    pub prune: Option<PruneOutcome>,
    pub steps: Vec<StepReport>,
    pub skipped_steps: Vec<String>,
}

/// Runs the default pipeline in place and reports what each step did.
pub fn run_wrangle(df: &mut DataFrame, options: &WrangleOptions) -> Result<WrangleOutcome> {
    options.validate()?;
    if df.height() == 0 {
        return Err(WrangleError::EmptyTable { operation: "wrangle" });
    }
    let span = info_span!("wrangle", profile = options.profile.as_str());
    let _guard = span.enter();
    let start = Instant::now();
    let (rows_in, columns_in) = df.shape();

    let ctx = WrangleContext::new(options);
    let mut state = WrangleState::default();
    build_default_pipeline().execute(df, &ctx, &mut state)?;

    info!(
        rows_in,
        rows_out = df.height(),
        columns_in,
        columns_out = df.width(),
        duration_ms = start.elapsed().as_millis(),
        "wrangle complete"
    );
    Ok(WrangleOutcome {
        profile: options.profile,
        prune: state.prune,
        steps: state.reports,
        skipped_steps: state.skipped_steps,
    })
}

/// Cleans a raw frame and returns the wrangled one.
pub fn wrangle_zillow(mut df: DataFrame, options: &WrangleOptions) -> Result<DataFrame> {
    run_wrangle(&mut df, options)?;
    Ok(df)
}

// ============================================================================
// Steps
// ============================================================================

pub struct CastFipsStep;

impl WrangleStep for CastFipsStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        _ctx: &WrangleContext<'_>,
        _state: &mut WrangleState,
    ) -> Result<()> {
        clean::cast_fips(df)
    }

    fn step_name(&self) -> &str {
        "cast_fips"
    }
}

pub struct FilterSingleUnitStep;

impl WrangleStep for FilterSingleUnitStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &WrangleContext<'_>,
        _state: &mut WrangleState,
    ) -> Result<()> {
        clean::filter_single_unit(df, &ctx.options.single_unit_land_use)?;
        Ok(())
    }

    fn step_name(&self) -> &str {
        "filter_single_unit"
    }
}

pub struct FilterLivableStep;

impl WrangleStep for FilterLivableStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &WrangleContext<'_>,
        _state: &mut WrangleState,
    ) -> Result<()> {
        clean::filter_livable(df, ctx.options.min_square_feet)?;
        Ok(())
    }

    fn step_name(&self) -> &str {
        "filter_livable"
    }
}

pub struct PruneMissingStep;

impl WrangleStep for PruneMissingStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &WrangleContext<'_>,
        state: &mut WrangleState,
    ) -> Result<()> {
        state.prune = Some(prune_missing(df, ctx.options.prune)?);
        Ok(())
    }

    fn step_name(&self) -> &str {
        "prune_missing"
    }
}

pub struct AddCountyStep;

impl WrangleStep for AddCountyStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        _ctx: &WrangleContext<'_>,
        _state: &mut WrangleState,
    ) -> Result<()> {
        clean::add_county(df)
    }

    fn step_name(&self) -> &str {
        "add_county"
    }
}

pub struct DropRedundantStep;

impl WrangleStep for DropRedundantStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        _ctx: &WrangleContext<'_>,
        _state: &mut WrangleState,
    ) -> Result<()> {
        clean::drop_redundant(df)
    }

    fn step_name(&self) -> &str {
        "drop_redundant"
    }
}

pub struct ImputeDefaultsStep;

impl WrangleStep for ImputeDefaultsStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &WrangleContext<'_>,
        _state: &mut WrangleState,
    ) -> Result<()> {
        clean::impute_defaults(df, &ctx.options.imputation)
    }

    fn step_name(&self) -> &str {
        "impute_defaults"
    }
}

pub struct FilterValueOutliersStep;

impl WrangleStep for FilterValueOutliersStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &WrangleContext<'_>,
        _state: &mut WrangleState,
    ) -> Result<()> {
        clean::filter_value_outliers(df, &ctx.options.outliers)?;
        Ok(())
    }

    fn step_name(&self) -> &str {
        "filter_value_outliers"
    }
}

pub struct DropIncompleteRowsStep;

impl WrangleStep for DropIncompleteRowsStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        _ctx: &WrangleContext<'_>,
        _state: &mut WrangleState,
    ) -> Result<()> {
        clean::drop_incomplete_rows(df)?;
        Ok(())
    }

    fn step_name(&self) -> &str {
        "drop_incomplete_rows"
    }
}

pub struct DeriveAgeStep;

impl WrangleStep for DeriveAgeStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &WrangleContext<'_>,
        _state: &mut WrangleState,
    ) -> Result<()> {
        clean::derive_age(df, ctx.options.reference_year)
    }

    fn step_name(&self) -> &str {
        "derive_age"
    }
}

pub struct RenameReadableStep;

impl WrangleStep for RenameReadableStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        _ctx: &WrangleContext<'_>,
        _state: &mut WrangleState,
    ) -> Result<()> {
        clean::rename_readable(df)
    }

    fn step_name(&self) -> &str {
        "rename_readable"
    }
}

pub struct DeriveExtendedFeaturesStep;

impl WrangleStep for DeriveExtendedFeaturesStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &WrangleContext<'_>,
        _state: &mut WrangleState,
    ) -> Result<()> {
        features::derive_extended_features(df, ctx.options.city_flag_region)
    }

    fn step_name(&self) -> &str {
        "derive_extended_features"
    }

    fn should_skip(&self, ctx: &WrangleContext<'_>) -> bool {
        !ctx.is_extended()
    }
}

/// Removes rows whose ratios divided by zero or whose values fell outside a bucket.
pub struct PurgeDerivedNullsStep;

impl WrangleStep for PurgeDerivedNullsStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        _ctx: &WrangleContext<'_>,
        _state: &mut WrangleState,
    ) -> Result<()> {
        clean::drop_incomplete_rows(df)?;
        Ok(())
    }

    fn step_name(&self) -> &str {
        "purge_derived_nulls"
    }

    fn should_skip(&self, ctx: &WrangleContext<'_>) -> bool {
        !ctx.is_extended()
    }
}

pub struct ApplyFinalBoundsStep;

impl WrangleStep for ApplyFinalBoundsStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &WrangleContext<'_>,
        _state: &mut WrangleState,
    ) -> Result<()> {
        features::apply_final_bounds(df, &ctx.options.final_bounds)?;
        Ok(())
    }

    fn step_name(&self) -> &str {
        "apply_final_bounds"
    }

    fn should_skip(&self, ctx: &WrangleContext<'_>) -> bool {
        !ctx.is_extended()
    }
}
