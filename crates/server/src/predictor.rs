//! # Score Predictor
//!
//! This module ties the prediction pipeline together:
//! 1. Normalize the request and derive its features
//! 2. Align the named features to the model's training columns
//! 3. Impute missing values
//! 4. Run the regressor and invert the log transform
//! 5. Attach a confidence value
//!
//! Everything loaded at startup (historical aggregates, encoders, model)
//! is read-only afterwards, so one `Predictor` behind an `Arc` serves every
//! request.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use data_loader::{EncoderBundle, HistoricalDataset};
use ml_model::ModelBundle;
use pipeline::{DEFAULT_LANGUAGE, FeatureEngineer, MovieQuery};

use crate::config::ArtifactPaths;
use crate::confidence::{ConfidenceSampler, round2};
use crate::error::PredictError;

/// JSON body accepted by `POST /predict`.
///
/// Every field may be absent or `null`; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    pub director: Option<String>,
    pub actor1: Option<String>,
    pub actor2: Option<String>,
    pub actor3: Option<String>,
    pub genres: Option<Vec<String>>,
    pub language: Option<String>,
    /// Full English month name
    pub release_month: Option<String>,
    pub title: Option<String>,
}

impl From<PredictRequest> for MovieQuery {
    fn from(request: PredictRequest) -> Self {
        Self {
            director: request.director.unwrap_or_default(),
            actors: [request.actor1, request.actor2, request.actor3]
                .into_iter()
                .map(Option::unwrap_or_default)
                .collect(),
            genres: request.genres.unwrap_or_default(),
            language: request
                .language
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            release_month: request.release_month.unwrap_or_default(),
            title: request.title.unwrap_or_default(),
        }
    }
}

/// Successful prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Predicted score, rounded to 2 decimals
    pub score: f64,
    /// Placeholder confidence in [70, 99], rounded to 2 decimals
    pub confidence: f64,
}

/// Main predictor that owns the loaded artifacts
pub struct Predictor {
    engineer: FeatureEngineer,
    model: ModelBundle,
    confidence: ConfidenceSampler,
}

impl Predictor {
    pub fn new(engineer: FeatureEngineer, model: ModelBundle) -> Self {
        Self {
            engineer,
            model,
            confidence: ConfidenceSampler::default(),
        }
    }

    pub fn with_confidence(mut self, confidence: ConfidenceSampler) -> Self {
        self.confidence = confidence;
        self
    }

    /// Load every artifact and precompute the historical aggregates.
    ///
    /// The three files are independent, so they are read in parallel.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let start_time = Instant::now();

        let ((dataset, encoders), model) = rayon::join(
            || {
                rayon::join(
                    || HistoricalDataset::load_from_file(&paths.history),
                    || EncoderBundle::load_from_file(&paths.encoders),
                )
            },
            || ModelBundle::load_from_file(&paths.model),
        );

        let dataset = dataset
            .with_context(|| format!("Failed to load history from {:?}", paths.history))?;
        let encoders = encoders
            .with_context(|| format!("Failed to load encoders from {:?}", paths.encoders))?;
        let model =
            model.with_context(|| format!("Failed to load model from {:?}", paths.model))?;

        let engineer = FeatureEngineer::new(&dataset, &encoders);
        info!(
            "Predictor ready: {} historical movies, model '{}' over {} features, anchored at {} ({:.2?})",
            dataset.len(),
            model.model_name(),
            model.features().len(),
            engineer.stats().current_year(),
            start_time.elapsed()
        );

        Ok(Self::new(engineer, model))
    }

    pub fn engineer(&self) -> &FeatureEngineer {
        &self.engineer
    }

    pub fn model(&self) -> &ModelBundle {
        &self.model
    }

    /// The imputed feature row the regressor would see for this query
    pub fn feature_vector(&self, query: &MovieQuery) -> Result<Vec<f64>, PredictError> {
        let record = self.engineer.compute_features(query);
        Ok(self.model.prepare(record.iter())?)
    }

    /// Predicted score, before rounding
    pub fn score(&self, query: &MovieQuery) -> Result<f64, PredictError> {
        let row = self.feature_vector(query)?;
        let log_score = self.model.predict_log(&row)?;
        debug!("Raw model output {:.4} for '{}'", log_score, query.title);
        Ok(log_score.exp_m1())
    }

    /// Score a query and attach a confidence
    pub fn predict(&self, query: &MovieQuery) -> Result<PredictResponse, PredictError> {
        let start_time = Instant::now();

        let score = round2(self.score(query)?);
        let confidence = self.confidence.sample();

        info!(
            "Predicted {:.2} (confidence {:.2}) for '{}' in {:.2?}",
            score,
            confidence,
            query.title,
            start_time.elapsed()
        );
        Ok(PredictResponse { score, confidence })
    }

    /// Run `predict` on the blocking pool
    pub async fn predict_blocking(
        self: &Arc<Self>,
        query: MovieQuery,
    ) -> Result<PredictResponse, PredictError> {
        let predictor = Arc::clone(self);
        tokio::task::spawn_blocking(move || predictor.predict(&query)).await?
    }
}
