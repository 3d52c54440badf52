use crate::{
    SAMPLE_LEN, stats,
    validate::{SampleError, validate},
};
use derive_more::Deref;
use serde::{Deserialize, Serialize};

///
/// Sample
/// Exactly nine non-negative, finite damage values in round order.
/// Only constructible through validation.
///

#[derive(Clone, Copy, Debug, Deref, Deserialize, PartialEq, Serialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Sample([f64; SAMPLE_LEN]);

impl Sample {
    /// Validate a raw slice into a sample.
    pub fn new(values: &[f64]) -> Result<Self, SampleError> {
        validate(values)?;

        let mut rounds = [0.0; SAMPLE_LEN];
        rounds.copy_from_slice(values);

        Ok(Self(rounds))
    }

    #[must_use]
    pub const fn as_array(&self) -> &[f64; SAMPLE_LEN] {
        &self.0
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        stats::sum(&self.0)
    }
}

impl TryFrom<Vec<f64>> for Sample {
    type Error = SampleError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(&values)
    }
}

impl TryFrom<&[f64]> for Sample {
    type Error = SampleError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<Sample> for Vec<f64> {
    fn from(sample: Sample) -> Self {
        sample.0.to_vec()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_every_round() {
        let sample = Sample::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]).unwrap();

        assert_eq!(sample.total(), 45.0);
        assert_eq!(sample.len(), SAMPLE_LEN);
    }

    #[test]
    fn construction_goes_through_validation() {
        assert_eq!(
            Sample::try_from(vec![1.0; 3]),
            Err(SampleError::InvalidLength { len: 3 })
        );
    }

    #[test]
    fn serializes_as_plain_array() {
        let sample = Sample::new(&[0.0; SAMPLE_LEN]).unwrap();
        let json = serde_json::to_string(&sample).unwrap();

        assert_eq!(json, "[0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0]");
        assert!(serde_json::from_str::<Sample>("[1,2,3]").is_err());
        assert!(serde_json::from_str::<Sample>("[1,2,3,4,5,6,7,8,-9]").is_err());
    }
}
