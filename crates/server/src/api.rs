//! HTTP routes.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::PredictError;
use crate::predictor::{PredictRequest, PredictResponse, Predictor};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// Build the router with `/predict` and `/health`
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(bind_addr: &str, predictor: Arc<Predictor>) -> anyhow::Result<()> {
    let app = build_router(AppState { predictor });

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// POST /predict
///
/// The body is parsed here rather than through the `Json` extractor so a
/// malformed body gets the same 500 `{"error"}` shape as any other failure.
async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictResponse>, PredictError> {
    let request: PredictRequest = serde_json::from_slice(&body)?;
    let response = state.predictor.predict_blocking(request.into()).await?;
    Ok(Json(response))
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "reel-score".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
