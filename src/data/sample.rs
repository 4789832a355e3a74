//! Synthetic transaction generation.

use chrono::Duration;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Uniform;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::debug;

use crate::domain::{GeneratorConfig, MAX_ROW_COUNT, Table, Transaction};
use crate::error::PipelineError;

/// Lower bound of the multiplicative price perturbation.
const PRICE_FACTOR_MIN: f64 = 0.8;
/// Upper bound (exclusive) of the multiplicative price perturbation.
const PRICE_FACTOR_MAX: f64 = 1.2;

const QUANTITY_MIN: u32 = 1;
const QUANTITY_MAX: u32 = 9;

/// Generate a synthetic transaction table.
///
/// Rows are sampled from a `StdRng` seeded with `config.seed` only, so the same
/// config always yields the same table, row for row. The date window is
/// `[as_of - window_days, as_of]`, inclusive on both ends.
pub fn generate(config: &GeneratorConfig) -> Result<Table, PipelineError> {
    validate(config)?;

    let window_start = config
        .as_of
        .checked_sub_signed(Duration::days(i64::from(config.window_days)))
        .ok_or_else(|| {
            PipelineError::invalid_config(
                "window_days",
                format!("{} days before {} is out of range", config.window_days, config.as_of),
            )
        })?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let day_dist = Uniform::new_inclusive(0_i64, i64::from(config.window_days));
    let product_dist = Uniform::new(0, config.catalog.len());
    let region_dist = Uniform::new(0, config.regions.len());
    let quantity_dist = Uniform::new_inclusive(QUANTITY_MIN, QUANTITY_MAX);
    let factor_dist = Uniform::new(PRICE_FACTOR_MIN, PRICE_FACTOR_MAX);

    let mut rows = Vec::with_capacity(config.row_count);
    for _ in 0..config.row_count {
        let date = window_start + Duration::days(day_dist.sample(&mut rng));
        let entry = &config.catalog[product_dist.sample(&mut rng)];
        let region = config.regions[region_dist.sample(&mut rng)];
        let quantity = quantity_dist.sample(&mut rng);
        let factor = factor_dist.sample(&mut rng);

        let price = perturbed_price(entry.base_price, factor)?;
        rows.push(Transaction::new(date, entry.product, region, quantity, price));
    }

    debug!(
        seed = config.seed,
        rows = rows.len(),
        %window_start,
        window_end = %config.as_of,
        "generated sample table"
    );

    Ok(Table::new(rows))
}

fn validate(config: &GeneratorConfig) -> Result<(), PipelineError> {
    if config.row_count == 0 {
        return Err(PipelineError::invalid_config("row_count", "must be > 0"));
    }
    if config.row_count > MAX_ROW_COUNT {
        return Err(PipelineError::invalid_config(
            "row_count",
            format!("must be at most {MAX_ROW_COUNT} (got {})", config.row_count),
        ));
    }
    if config.catalog.is_empty() {
        return Err(PipelineError::invalid_config("catalog", "must contain at least one product"));
    }
    if config.regions.is_empty() {
        return Err(PipelineError::invalid_config("regions", "must contain at least one region"));
    }
    if let Some(entry) = config.catalog.iter().find(|e| e.base_price <= Decimal::ZERO) {
        return Err(PipelineError::invalid_config(
            "catalog",
            format!("base price for {} must be > 0 (got {})", entry.product, entry.base_price),
        ));
    }
    Ok(())
}

fn perturbed_price(base: Decimal, factor: f64) -> Result<Decimal, PipelineError> {
    let factor = Decimal::from_f64(factor)
        .ok_or_else(|| PipelineError::invalid_config("price_factor", format!("{factor} is not representable")))?;
    Ok((base * factor).round_dp(2))
}
