use crate::{
    stats::Metrics,
    view::{format_decimal, format_whole},
};
use derive_more::Display;

///
/// Tier
/// Standing band used to colour the percentile.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Tier {
    #[display("high")]
    High,
    #[display("mid")]
    Mid,
    #[display("low")]
    Low,
}

impl Tier {
    #[must_use]
    pub const fn from_percentile(percentile: u32) -> Self {
        if percentile >= 90 {
            Self::High
        } else if percentile >= 70 {
            Self::Mid
        } else {
            Self::Low
        }
    }
}

///
/// MetricsCard
/// Display-ready metrics of the most recent submission.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MetricsCard {
    pub total: String,
    pub average: String,
    pub median: String,
    pub standard_deviation: String,
    pub percentile: u32,
    pub tier: Tier,
}

impl MetricsCard {
    #[must_use]
    pub fn from_metrics(metrics: &Metrics) -> Self {
        Self {
            total: format_whole(metrics.total),
            average: format_whole(metrics.average),
            median: format_whole(metrics.median),
            standard_deviation: format_decimal(metrics.standard_deviation),
            percentile: metrics.percentile,
            tier: Tier::from_percentile(metrics.percentile),
        }
    }

    /// The "top N%" figure: share of the population at or above this one.
    #[must_use]
    pub const fn top_percent(&self) -> u32 {
        100_u32.saturating_sub(self.percentile)
    }
}

impl From<&Metrics> for MetricsCard {
    fn from(metrics: &Metrics) -> Self {
        Self::from_metrics(metrics)
    }
}

///
/// TESTS
///
