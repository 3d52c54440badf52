use crate::{
    stats::PopulationSummary,
    view::{PLACEHOLDER, format_whole},
};

///
/// PopulationView
/// Aggregates over every stored entry, formatted for display.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PopulationView {
    pub count: usize,
    pub max: String,
    pub mean: String,
}

impl PopulationView {
    #[must_use]
    pub fn from_summary(summary: &PopulationSummary) -> Self {
        let show = |value: Option<f64>| value.map_or_else(|| PLACEHOLDER.to_string(), format_whole);

        Self {
            count: summary.count,
            max: show(summary.max),
            mean: show(summary.mean),
        }
    }

    #[must_use]
    pub fn from_totals(totals: &[f64]) -> Self {
        Self::from_summary(&PopulationSummary::from_totals(totals))
    }
}

///
/// TESTS
///
