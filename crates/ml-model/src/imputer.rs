//! Missing-value imputation with statistics fitted at training time.

use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};

/// Strategies the training side may have used to fit the statistics.
///
/// Only the fitted statistics matter at inference time; the strategy is
/// informational and shows up in the load log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputeStrategy {
    Mean,
    Median,
    MostFrequent,
    Constant,
}

/// Replaces NaN entries with the per-column fill value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Imputer {
    pub strategy: ImputeStrategy,
    pub statistics: Vec<f64>,
}

impl Imputer {
    pub fn new(strategy: ImputeStrategy, statistics: Vec<f64>) -> Self {
        Self {
            strategy,
            statistics,
        }
    }

    pub fn len(&self) -> usize {
        self.statistics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statistics.is_empty()
    }

    /// Fill NaN entries in place
    pub fn transform(&self, row: &mut [f64]) -> Result<()> {
        if row.len() != self.statistics.len() {
            return Err(ModelError::ShapeMismatch {
                expected: self.statistics.len(),
                found: row.len(),
            });
        }
        for (value, fill) in row.iter_mut().zip(&self.statistics) {
            if value.is_nan() {
                *value = *fill;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_only_nan() {
        let imputer = Imputer::new(ImputeStrategy::Mean, vec![10.0, 20.0, 30.0]);
        let mut row = vec![1.0, f64::NAN, 0.0];
        imputer.transform(&mut row).unwrap();
        assert_eq!(row, vec![1.0, 20.0, 0.0]);
    }

    #[test]
    fn test_shape_mismatch() {
        let imputer = Imputer::new(ImputeStrategy::Median, vec![1.0]);
        let err = imputer.transform(&mut [1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch { expected: 1, found: 2 }));
    }

    #[test]
    fn test_deserialize_strategy() {
        let imputer: Imputer =
            serde_json::from_str(r#"{"strategy": "most_frequent", "statistics": [1.5]}"#).unwrap();
        assert_eq!(imputer.strategy, ImputeStrategy::MostFrequent);
        assert_eq!(imputer.statistics, vec![1.5]);
    }
}
