//! Confidence attached to each prediction.
//!
//! This is a placeholder, not a model-derived uncertainty: every response
//! gets an independent draw from Normal(85, 5) clipped to [70, 99]. It
//! carries no information about the prediction it accompanies.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use thiserror::Error;

pub const CONFIDENCE_MEAN: f64 = 85.0;
pub const CONFIDENCE_STD_DEV: f64 = 5.0;
pub const CONFIDENCE_MIN: f64 = 70.0;
pub const CONFIDENCE_MAX: f64 = 99.0;

/// Rejected sampler parameters
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfidenceError {
    #[error("Mean must be finite, got {0}")]
    InvalidMean(f64),

    #[error("Standard deviation must be finite and non-negative, got {0}")]
    InvalidStdDev(f64),

    #[error("Bounds must be finite with min <= max, got [{min}, {max}]")]
    InvalidBounds { min: f64, max: f64 },
}

#[derive(Debug, Clone, Copy)]
pub struct ConfidenceSampler {
    normal: Normal<f64>,
    min: f64,
    max: f64,
}

impl ConfidenceSampler {
    pub fn new(mean: f64, std_dev: f64, min: f64, max: f64) -> Result<Self, ConfidenceError> {
        if !mean.is_finite() {
            return Err(ConfidenceError::InvalidMean(mean));
        }
        if !(std_dev.is_finite() && std_dev >= 0.0) {
            return Err(ConfidenceError::InvalidStdDev(std_dev));
        }
        if !(min.is_finite() && max.is_finite() && min <= max) {
            return Err(ConfidenceError::InvalidBounds { min, max });
        }
        let normal =
            Normal::new(mean, std_dev).map_err(|_| ConfidenceError::InvalidStdDev(std_dev))?;
        Ok(Self { normal, min, max })
    }

    /// Draw using the thread-local generator
    pub fn sample(&self) -> f64 {
        self.sample_with(&mut rand::rng())
    }

    /// Draw, clip to the bounds and round to two decimals
    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let raw: f64 = self.normal.sample(rng);
        round2(raw.clamp(self.min, self.max))
    }
}

impl Default for ConfidenceSampler {
    fn default() -> Self {
        Self {
            normal: Normal::new(CONFIDENCE_MEAN, CONFIDENCE_STD_DEV)
                .unwrap_or_else(|_| unreachable!("constant parameters are valid")),
            min: CONFIDENCE_MIN,
            max: CONFIDENCE_MAX,
        }
    }
}

/// Round half to even at two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_confidence_always_in_bounds() {
        let sampler = ConfidenceSampler::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let c = sampler.sample_with(&mut rng);
            assert!((CONFIDENCE_MIN..=CONFIDENCE_MAX).contains(&c), "{c} out of range");
        }
    }

    #[test]
    fn test_wide_distribution_is_clipped() {
        let sampler = ConfidenceSampler::new(85.0, 1_000.0, 70.0, 99.0).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let draws: Vec<f64> = (0..1_000).map(|_| sampler.sample_with(&mut rng)).collect();
        assert!(draws.contains(&70.0));
        assert!(draws.contains(&99.0));
        assert!(draws.iter().all(|c| (70.0..=99.0).contains(c)));
    }

    #[test]
    fn test_thread_rng_sample() {
        let c = ConfidenceSampler::default().sample();
        assert!((70.0..=99.0).contains(&c));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(84.567), 84.57);
        assert_eq!(round2(70.0), 70.0);
        assert_eq!(round2(12.344), 12.34);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert_eq!(
            ConfidenceSampler::new(85.0, -1.0, 70.0, 99.0).unwrap_err(),
            ConfidenceError::InvalidStdDev(-1.0)
        );
        assert!(matches!(
            ConfidenceSampler::new(85.0, f64::NAN, 70.0, 99.0),
            Err(ConfidenceError::InvalidStdDev(_))
        ));
        assert_eq!(
            ConfidenceSampler::new(85.0, 5.0, 99.0, 70.0).unwrap_err(),
            ConfidenceError::InvalidBounds { min: 99.0, max: 70.0 }
        );
        assert!(matches!(
            ConfidenceSampler::new(f64::INFINITY, 5.0, 70.0, 99.0),
            Err(ConfidenceError::InvalidMean(_))
        ));
    }

    #[test]
    fn test_zero_std_dev_is_constant() {
        let sampler = ConfidenceSampler::new(80.0, 0.0, 70.0, 99.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sampler.sample_with(&mut rng), 80.0);
    }
}
