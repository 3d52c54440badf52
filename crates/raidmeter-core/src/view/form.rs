use crate::{SAMPLE_LEN, validate::{self, SampleError}};
use thiserror::Error as ThisError;

///
/// FormError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum FormError {
    #[error("round {round} does not exist (rounds are 1 to {SAMPLE_LEN})")]
    NoSuchRound { round: usize },

    #[error("'{text}' is not a whole number; only digits are accepted")]
    NotDigits { text: String },
}

///
/// DamageForm
///
/// Nine raw text fields, one per round. Fields hold either nothing or
/// ASCII digits; any other edit is refused and leaves the field as it was.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DamageForm {
    fields: [String; SAMPLE_LEN],
    error: Option<String>,
}

impl DamageForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text of the 0-based field `index`.
    pub fn set(&mut self, index: usize, text: &str) -> Result<(), FormError> {
        if !text.chars().all(|c| c.is_ascii_digit()) {
            return Err(FormError::NotDigits {
                text: text.to_string(),
            });
        }

        let field = self
            .fields
            .get_mut(index)
            .ok_or(FormError::NoSuchRound { round: index + 1 })?;
        *field = text.to_string();
        self.error = None;

        Ok(())
    }

    #[must_use]
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    #[must_use]
    pub const fn fields(&self) -> &[String; SAMPLE_LEN] {
        &self.fields
    }

    /// True only when every field has been filled in.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.fields.iter().all(|f| !f.is_empty())
    }

    /// Numeric values, with blank fields read as zero.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.fields
            .iter()
            .map(|f| f.parse::<f64>().unwrap_or_default())
            .collect()
    }

    /// Values ready for submission; a failed check is kept as the form error.
    pub fn checked_values(&mut self) -> Result<Vec<f64>, SampleError> {
        let values = self.values();
        if let Err(err) = validate::validate(&values) {
            self.error = Some(err.to_string());
            return Err(err);
        }

        Ok(values)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Discard every field and the error.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

///
/// TESTS
///
