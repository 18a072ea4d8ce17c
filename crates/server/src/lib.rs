//! HTTP service for movie score prediction.
//!
//! This crate contains the predictor that runs a request through feature
//! engineering and the trained model, and the axum routes that expose it.

pub mod api;
pub mod confidence;
pub mod config;
pub mod error;
pub mod predictor;

pub use api::{AppState, HealthResponse, build_router, serve};
pub use confidence::{ConfidenceError, ConfidenceSampler};
pub use config::ArtifactPaths;
pub use error::PredictError;
pub use predictor::{PredictRequest, PredictResponse, Predictor};
