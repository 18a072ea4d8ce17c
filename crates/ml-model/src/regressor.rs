//! The regression model behind the predictor.
//!
//! `Regressor` is the seam between feature assembly and whatever produced
//! the trained trees. The production implementation wraps a `gbdt` model,
//! either trained natively or converted from an xgboost dump.

use crate::error::{ModelError, Result};
use gbdt::decision_tree::{Data, PredVec, ValueType};
use gbdt::gradient_boost::GBDT;
use std::path::Path;
use tracing::info;

/// A fitted regression function over a fixed-width feature vector.
///
/// ## Design Note
/// - `Send + Sync` so one instance can serve every request thread
/// - The output is on whatever scale the model was trained on; the
///   predictor owns the inverse transform
pub trait Regressor: Send + Sync {
    /// Returns the name of this model (for logging/debugging)
    fn name(&self) -> &str;

    /// Predict a single row
    fn predict(&self, features: &[f64]) -> Result<f64>;
}

/// Gradient-boosted trees loaded through the `gbdt` crate.
pub struct GbdtRegressor {
    model: GBDT,
    feature_count: usize,
    name: String,
}

impl GbdtRegressor {
    /// Wrap a model that expects `feature_count` inputs
    pub fn new(model: GBDT, feature_count: usize) -> Self {
        Self {
            model,
            feature_count,
            name: "gbdt".to_string(),
        }
    }

    /// Load an xgboost model converted with gbdt's `convert_xgboost.py`
    pub fn from_xgboost_dump(path: &Path, objective: &str, feature_count: usize) -> Result<Self> {
        let path_str = path_to_str(path)?;
        info!("Loading xgboost model from {:?} (objective {})", path, objective);
        let model = GBDT::from_xgboost_dump(path_str, objective).map_err(|e| ModelError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            model,
            feature_count,
            name: format!("xgboost:{}", objective),
        })
    }

    /// Load a model saved by `GBDT::save_model`
    pub fn load_native(path: &Path, feature_count: usize) -> Result<Self> {
        let path_str = path_to_str(path)?;
        info!("Loading gbdt model from {:?}", path);
        let model = GBDT::load_model(path_str).map_err(|e| ModelError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(model, feature_count))
    }
}

impl Regressor for GbdtRegressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.feature_count {
            return Err(ModelError::ShapeMismatch {
                expected: self.feature_count,
                found: features.len(),
            });
        }
        let row: Vec<ValueType> = features.iter().map(|&v| v as ValueType).collect();
        let predicted: PredVec = self.model.predict(&vec![Data::new_test_data(row, None)]);
        predicted
            .first()
            .map(|&p| f64::from(p))
            .ok_or_else(|| ModelError::InferenceError("model returned no prediction".to_string()))
    }
}

fn path_to_str(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| ModelError::LoadError {
        path: path.display().to_string(),
        reason: "path is not valid UTF-8".to_string(),
    })
}
