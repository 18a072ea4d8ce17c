//! Request-level errors.
//!
//! Every failure while serving `/predict` surfaces to the caller the same
//! way: HTTP 500 with `{"error": "<message>"}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ml_model::ModelError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Invalid request body: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Prediction task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        error!("Prediction failed: {}", message);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message })),
        )
            .into_response()
    }
}
