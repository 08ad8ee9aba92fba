// Axum API Server Module
//
// Purpose: HTTP surface for the admin approval workflow. Callers post a field
// request together with the statistics their geospatial provider returned and
// receive the verification report.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::VerificationError;
use crate::providers::PrecomputedObservations;
use crate::report::{VerificationRequest, VerificationResult};
use crate::utils::VerificationConfig;
use crate::verifier::verify_observed;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<VerificationConfig>,
}

impl AppState {
    /// Load thresholds from `config_path`, or use the built-in defaults
    pub fn new(config_path: Option<&str>) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => {
                tracing::info!("Loading verification config from {}", path);
                VerificationConfig::load(Path::new(path))?
            }
            None => {
                tracing::info!("No config file given - using built-in thresholds");
                VerificationConfig::default()
            }
        };
        config.validate()?;

        tracing::info!("Verification config version {}", config.version);

        Ok(Self::from_config(config))
    }

    pub fn from_config(config: VerificationConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/config", get(get_config))
        .route("/api/verify", post(verify_field))
        .route("/api/verify/batch", post(verify_batch))
        // Middleware (applied in reverse order)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPayload {
    pub request: VerificationRequest,
    #[serde(default)]
    pub observations: PrecomputedObservations,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<VerificationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn get_config(State(state): State<AppState>) -> Json<VerificationConfig> {
    Json(state.config.as_ref().clone())
}

async fn verify_field(
    State(state): State<AppState>,
    Json(payload): Json<VerifyPayload>,
) -> Result<Json<VerificationResult>, AppError> {
    let config = state.config.clone();

    tracing::info!(
        "Verification requested for {}",
        payload.request.project_id.as_deref().unwrap_or("<unnamed>")
    );

    // CPU-bound work: run in blocking thread pool
    let report = tokio::task::spawn_blocking(move || {
        verify_observed(&config, &payload.request, &payload.observations)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(report))
}

async fn verify_batch(
    State(state): State<AppState>,
    Json(payloads): Json<Vec<VerifyPayload>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let config = state.config.clone();
    let batch_size = payloads.len();

    tracing::info!("Batch verification of {} fields", batch_size);

    let entries = tokio::task::spawn_blocking(move || {
        payloads
            .par_iter()
            .map(|p| match verify_observed(&config, &p.request, &p.observations) {
                Ok(report) => BatchEntry {
                    report: Some(report),
                    error: None,
                },
                Err(e) => BatchEntry {
                    report: None,
                    error: Some(e.to_string()),
                },
            })
            .collect::<Vec<_>>()
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    Ok(Json(serde_json::json!({
        "count": batch_size,
        "results": entries,
    })))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    Unprocessable(String),
    Internal(String),
}

impl From<VerificationError> for AppError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::InvalidGeometry(_) | VerificationError::InvalidRequest(_) => {
                AppError::Unprocessable(err.to_string())
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Internal(msg) => {
                tracing::error!("Verification failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
