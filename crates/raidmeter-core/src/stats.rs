//! Descriptive statistics over damage samples.
//!
//! Everything here is pure: no I/O, no clock, no allocation beyond the sort
//! scratch buffer in [`median`]. Empty input always yields zero rather than
//! NaN so results can be rendered without special cases.

use serde::{Deserialize, Serialize};

///
/// Metrics
/// Per-submission summary shown to the submitter. Never persisted.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total: f64,
    pub average: f64,
    pub median: f64,
    pub standard_deviation: f64,

    /// Share of the population strictly below `total`, 0..=100.
    pub percentile: u32,
}

/// Arithmetic sum; zero for an empty sample.
#[must_use]
pub fn sum(sample: &[f64]) -> f64 {
    sample.iter().sum()
}

/// Arithmetic mean; zero for an empty sample.
#[must_use]
pub fn average(sample: &[f64]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }

    sum(sample) / sample.len() as f64
}

/// Median of the sample; even lengths average the two middle values.
#[must_use]
pub fn median(sample: &[f64]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }

    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Population standard deviation (divides by `n`, not `n - 1`).
#[must_use]
pub fn standard_deviation(sample: &[f64]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }

    let mean = average(sample);
    let variance = sample.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / sample.len() as f64;

    variance.sqrt()
}

/// Percentage of `population` strictly below `value`, rounded to an integer.
///
/// Ties are not counted, so a value equal to the population maximum does
/// not necessarily rank at 100.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percentile(value: f64, population: &[f64]) -> u32 {
    if population.is_empty() {
        return 0;
    }

    let rank = population.iter().filter(|&&total| total < value).count();

    // rank <= len, so the result is always within 0..=100
    ((rank as f64 / population.len() as f64) * 100.0).round() as u32
}

/// Compute every metric for one sample against a population of totals.
#[must_use]
pub fn all_metrics(sample: &[f64], population: &[f64]) -> Metrics {
    let total = sum(sample);

    Metrics {
        total,
        average: average(sample),
        median: median(sample),
        standard_deviation: standard_deviation(sample),
        percentile: percentile(total, population),
    }
}

///
/// PopulationSummary
/// Read-only aggregates over every stored total.
///

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PopulationSummary {
    pub count: usize,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl PopulationSummary {
    #[must_use]
    pub fn from_totals(totals: &[f64]) -> Self {
        if totals.is_empty() {
            return Self::default();
        }

        Self {
            count: totals.len(),
            max: totals.iter().copied().max_by(f64::total_cmp),
            mean: Some(average(totals)),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

///
/// TESTS
///
