//! The trained model bundle: expected features, imputer and regressor.
//!
//! On disk the bundle is a JSON manifest pointing at the model file:
//!
//! ```json
//! {
//!   "features": ["release_month", "director_encoded", "..."],
//!   "imputer": { "strategy": "mean", "statistics": [6.1, 812.0, "..."] },
//!   "model_path": "xgboost_movie_model.model",
//!   "model_format": "xgboost",
//!   "objective": "reg:linear"
//! }
//! ```
//!
//! `model_path` is resolved relative to the manifest's directory.

use crate::error::{ModelError, Result};
use crate::imputer::Imputer;
use crate::regressor::{GbdtRegressor, Regressor};
use crate::schema::FeatureSchema;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// How the model file was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// xgboost dump converted for the `gbdt` crate
    #[default]
    Xgboost,
    /// Saved by `gbdt` itself
    Gbdt,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelManifest {
    pub features: Vec<String>,
    pub imputer: Imputer,
    pub model_path: PathBuf,
    #[serde(default)]
    pub model_format: ModelFormat,
    #[serde(default = "default_objective")]
    pub objective: String,
}

fn default_objective() -> String {
    "reg:linear".to_string()
}

/// Everything needed to turn named feature values into a log-scale score.
pub struct ModelBundle {
    schema: FeatureSchema,
    imputer: Imputer,
    regressor: Box<dyn Regressor>,
}

impl ModelBundle {
    /// Assemble a bundle, checking the imputer covers every feature
    pub fn new(
        features: Vec<String>,
        imputer: Imputer,
        regressor: Box<dyn Regressor>,
    ) -> Result<Self> {
        let schema = FeatureSchema::new(features)?;
        if imputer.len() != schema.len() {
            return Err(ModelError::ShapeMismatch {
                expected: schema.len(),
                found: imputer.len(),
            });
        }
        Ok(Self {
            schema,
            imputer,
            regressor,
        })
    }

    /// Load the manifest and the model file it references
    pub fn load_from_file(manifest_path: &Path) -> Result<Self> {
        info!("Loading model manifest from {:?}", manifest_path);
        let raw = fs::read_to_string(manifest_path).map_err(|_| ModelError::FileNotFound {
            path: manifest_path.display().to_string(),
        })?;
        let manifest: ModelManifest = serde_json::from_str(&raw)?;

        let model_path = manifest_path
            .parent()
            .map(|dir| dir.join(&manifest.model_path))
            .unwrap_or_else(|| manifest.model_path.clone());
        let feature_count = manifest.features.len();

        let regressor: Box<dyn Regressor> = match manifest.model_format {
            ModelFormat::Xgboost => Box::new(GbdtRegressor::from_xgboost_dump(
                &model_path,
                &manifest.objective,
                feature_count,
            )?),
            ModelFormat::Gbdt => Box::new(GbdtRegressor::load_native(&model_path, feature_count)?),
        };

        let bundle = Self::new(manifest.features, manifest.imputer, regressor)?;
        info!(
            "Loaded model '{}' over {} features ({:?} imputation)",
            bundle.regressor.name(),
            bundle.schema.len(),
            bundle.imputer.strategy
        );
        Ok(bundle)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn features(&self) -> &[String] {
        self.schema.names()
    }

    pub fn model_name(&self) -> &str {
        self.regressor.name()
    }

    /// Align named values to the schema, then impute missing entries
    pub fn prepare<'a>(&self, values: impl IntoIterator<Item = (&'a str, f64)>) -> Result<Vec<f64>> {
        let mut row = self.schema.align(values);
        self.imputer.transform(&mut row)?;
        Ok(row)
    }

    /// Run the regressor on a prepared row; the result is log-scale
    pub fn predict_log(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.schema.len() {
            return Err(ModelError::ShapeMismatch {
                expected: self.schema.len(),
                found: row.len(),
            });
        }
        let prediction = self.regressor.predict(row)?;
        if !prediction.is_finite() {
            return Err(ModelError::InferenceError(format!(
                "non-finite prediction {}",
                prediction
            )));
        }
        Ok(prediction)
    }
}

impl std::fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBundle")
            .field("model", &self.regressor.name())
            .field("features", &self.schema.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imputer::ImputeStrategy;
    use crate::regressor::tests::train_tiny_model;

    /// Sums its inputs
    struct SumRegressor;

    impl Regressor for SumRegressor {
        fn name(&self) -> &str {
            "sum"
        }

        fn predict(&self, features: &[f64]) -> Result<f64> {
            Ok(features.iter().sum())
        }
    }

    fn features(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prepare_aligns_then_imputes() {
        let bundle = ModelBundle::new(
            features(&["a", "b", "c"]),
            Imputer::new(ImputeStrategy::Mean, vec![1.0, 2.0, 3.0]),
            Box::new(SumRegressor),
        )
        .unwrap();

        let row = bundle.prepare(vec![("c", 7.0), ("a", f64::NAN)]).unwrap();
        // a imputed, b zero-filled by alignment, c passed through
        assert_eq!(row, vec![1.0, 0.0, 7.0]);
        assert_eq!(bundle.predict_log(&row).unwrap(), 8.0);
    }

    #[test]
    fn test_imputer_must_cover_schema() {
        let result = ModelBundle::new(
            features(&["a", "b"]),
            Imputer::new(ImputeStrategy::Mean, vec![1.0]),
            Box::new(SumRegressor),
        );
        assert!(matches!(result, Err(ModelError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_non_finite_prediction_is_an_error() {
        let bundle = ModelBundle::new(
            features(&["a"]),
            Imputer::new(ImputeStrategy::Mean, vec![f64::INFINITY]),
            Box::new(SumRegressor),
        )
        .unwrap();
        let row = bundle.prepare(vec![("a", f64::NAN)]).unwrap();
        assert!(matches!(
            bundle.predict_log(&row),
            Err(ModelError::InferenceError(_))
        ));
    }

    #[test]
    fn test_load_from_manifest() {
        let dir = tempfile::tempdir().unwrap();
        train_tiny_model()
            .save_model(dir.path().join("tiny.model").to_str().unwrap())
            .unwrap();
        let manifest = r#"{
            "features": ["x0", "x1"],
            "imputer": {"strategy": "mean", "statistics": [4.5, 1.0]},
            "model_path": "tiny.model",
            "model_format": "gbdt"
        }"#;
        let manifest_path = dir.path().join("model.json");
        fs::write(&manifest_path, manifest).unwrap();

        let bundle = ModelBundle::load_from_file(&manifest_path).unwrap();
        assert_eq!(bundle.features(), &["x0".to_string(), "x1".to_string()]);
        assert_eq!(bundle.model_name(), "gbdt");

        let row = bundle.prepare(vec![("x0", 6.0)]).unwrap();
        assert!(bundle.predict_log(&row).unwrap().is_finite());
    }

    #[test]
    fn test_manifest_defaults() {
        let manifest: ModelManifest = serde_json::from_str(
            r#"{"features": ["a"], "imputer": {"strategy": "median", "statistics": [0.0]}, "model_path": "m"}"#,
        )
        .unwrap();
        assert_eq!(manifest.model_format, ModelFormat::Xgboost);
        assert_eq!(manifest.objective, "reg:linear");
    }

    #[test]
    fn test_missing_manifest() {
        let result = ModelBundle::load_from_file(Path::new("/nonexistent/model.json"));
        assert!(matches!(result, Err(ModelError::FileNotFound { .. })));
    }
}
