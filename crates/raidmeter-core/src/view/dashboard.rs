use crate::{
    Error, SAMPLE_LEN,
    store::EntryStore,
    submit::{SubmissionFlow, user_message},
    types::PlayerName,
    view::{DamageForm, MetricsCard, PopulationView},
};

/// Usage notes shown beside the form.
pub const INSTRUCTIONS: [&str; 4] = [
    "Enter the boss damage for all 9 rounds.",
    "Submit to calculate your statistics.",
    "Compare against every recorded entry to see your top %.",
    "Entries are kept in the shared damage store.",
];

///
/// Dashboard
///
/// Everything the main screen shows, composed from the session's flow and
/// its form. The metrics card appears only once something was submitted.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dashboard {
    pub player: PlayerName,
    pub fields: [String; SAMPLE_LEN],
    pub form_error: Option<String>,
    pub can_submit: bool,
    pub notice: Option<String>,
    pub error: Option<String>,
    pub metrics: Option<MetricsCard>,
    pub instructions: &'static [&'static str],
    pub population: PopulationView,
}

impl Dashboard {
    #[must_use]
    pub fn compose<S: EntryStore + ?Sized>(flow: &SubmissionFlow<S>, form: &DamageForm) -> Self {
        Self {
            player: flow.owner_name().clone(),
            fields: form.fields().clone(),
            form_error: form.error().map(str::to_string),
            can_submit: form.can_submit() && !flow.is_busy(),
            notice: flow.last_success().map(str::to_string),
            error: flow.last_error().map(error_text),
            metrics: flow.last_metrics().map(MetricsCard::from_metrics),
            instructions: &INSTRUCTIONS,
            population: PopulationView::from_summary(&flow.population_summary()),
        }
    }
}

/// Validation errors carry their own reason; everything else gets guidance.
fn error_text(err: &Error) -> String {
    if err.is_validation() {
        err.message.clone()
    } else {
        user_message(err).to_string()
    }
}

///
/// TESTS
///
