//! Descriptive statistics for the summary panel.

use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::domain::Table;

/// Count, moments and quartiles of one numeric column, rounded to 2dp.
///
/// Everything but `count` is `None` for an empty column; `std` is also `None`
/// for a single value (sample standard deviation needs two).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

pub fn revenue_summary(table: &Table) -> SummaryStats {
    let values: Vec<f64> = table.iter().filter_map(|r| r.revenue.to_f64()).collect();
    describe(&values)
}

pub fn quantity_summary(table: &Table) -> SummaryStats {
    let values: Vec<f64> = table.iter().map(|r| f64::from(r.quantity)).collect();
    describe(&values)
}

pub fn describe(values: &[f64]) -> SummaryStats {
    let count = values.len();
    if count == 0 {
        return SummaryStats::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = (count > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
        (ss / (n - 1.0)).sqrt()
    });

    SummaryStats {
        count,
        mean: Some(round2(mean)),
        std: std.map(round2),
        min: Some(round2(sorted[0])),
        p25: Some(round2(quantile(&sorted, 0.25))),
        p50: Some(round2(quantile(&sorted, 0.50))),
        p75: Some(round2(quantile(&sorted, 0.75))),
        max: Some(round2(sorted[count - 1])),
    }
}

/// Linear-interpolated quantile of a sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() as f64 - 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
