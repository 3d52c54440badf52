use crate::{SAMPLE_LEN, stats};
use thiserror::Error as ThisError;

///
/// SampleError
/// Reason a raw damage sample was rejected. Each variant carries its own
/// user-facing message.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum SampleError {
    #[error("exactly {SAMPLE_LEN} damage values are required (got {len})")]
    InvalidLength { len: usize },

    #[error("damage values cannot be negative (round {round})")]
    NegativeValue { round: usize },

    #[error("please enter a valid number (round {round})")]
    NotANumber { round: usize },

    #[error("damage values are too large to total")]
    TooLarge,
}

///
/// validate
/// Check a raw sample before any metrics or store work.
///
/// Checks run in a fixed order: length, then sign, then numeric validity,
/// then whether the total and spread stay finite.
/// `NaN < 0.0` is false, so a NaN is reported as `NotANumber` even when the
/// sign check runs first. Infinite values are reported as `NotANumber` too.
/// Rounds are 1-based in messages.
///
pub fn validate(sample: &[f64]) -> Result<(), SampleError> {
    if sample.len() != SAMPLE_LEN {
        return Err(SampleError::InvalidLength { len: sample.len() });
    }

    if let Some(index) = sample.iter().position(|&d| d < 0.0) {
        return Err(SampleError::NegativeValue { round: index + 1 });
    }

    if let Some(index) = sample.iter().position(|d| !d.is_finite()) {
        return Err(SampleError::NotANumber { round: index + 1 });
    }

    if !stats::sum(sample).is_finite() || !stats::standard_deviation(sample).is_finite() {
        return Err(SampleError::TooLarge);
    }

    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nine_non_negative_values() {
        assert!(validate(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).is_ok());
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            validate(&[1.0; 8]),
            Err(SampleError::InvalidLength { len: 8 })
        );
        assert_eq!(
            validate(&[1.0; 10]),
            Err(SampleError::InvalidLength { len: 10 })
        );
        assert_eq!(validate(&[]), Err(SampleError::InvalidLength { len: 0 }));
    }

    #[test]
    fn rejects_negative_values() {
        let mut sample = [1.0; 9];
        sample[4] = -0.5;

        assert_eq!(
            validate(&sample),
            Err(SampleError::NegativeValue { round: 5 })
        );
    }

    #[test]
    fn rejects_nan_and_infinity() {
        let mut sample = [1.0; 9];
        sample[0] = f64::NAN;
        assert_eq!(validate(&sample), Err(SampleError::NotANumber { round: 1 }));

        sample[0] = f64::INFINITY;
        assert_eq!(validate(&sample), Err(SampleError::NotANumber { round: 1 }));
    }

    #[test]
    fn rejects_samples_whose_total_overflows() {
        assert_eq!(validate(&[1e308; 9]), Err(SampleError::TooLarge));
        assert!(validate(&[1e300; 9]).is_ok());

        let mut spread = [0.0; 9];
        spread[0] = f64::MAX;
        assert_eq!(validate(&spread), Err(SampleError::TooLarge));
    }

    #[test]
    fn length_is_checked_before_content() {
        assert_eq!(
            validate(&[-1.0, f64::NAN]),
            Err(SampleError::InvalidLength { len: 2 })
        );
    }

    #[test]
    fn each_reason_has_a_distinct_message() {
        let messages = [
            SampleError::InvalidLength { len: 1 }.to_string(),
            SampleError::NegativeValue { round: 1 }.to_string(),
            SampleError::NotANumber { round: 1 }.to_string(),
            SampleError::TooLarge.to_string(),
        ];

        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
