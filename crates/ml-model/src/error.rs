//! Errors raised while loading or running the regression model.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    #[error("Invalid model manifest: {0}")]
    InvalidManifest(#[from] serde_json::Error),

    /// The underlying model library refused the model file
    #[error("Failed to load model from {path}: {reason}")]
    LoadError { path: String, reason: String },

    #[error("Feature count mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("Invalid feature schema: {0}")]
    InvalidSchema(String),

    #[error("Inference failed: {0}")]
    InferenceError(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
