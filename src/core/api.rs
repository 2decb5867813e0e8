//! HTTP API for sentiment analysis
//!
//! Endpoints:
//! - GET /health - Liveness plus model status (503 until the model is usable)
//! - GET /ready - Readiness probe
//! - POST /analyze - Classify one text
//! - POST /batch-analyze - Classify up to 100 texts

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::core::RequestGateway;
use crate::types::{
    BatchResult, GatewayError, HealthReport, NormalizedSentiment, ReadinessReport,
};
use crate::{RETRY_AFTER_SECS, SERVICE_NAME, VERSION};

/// Analyze request
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: Option<String>,
}

/// Batch request; `texts` is checked by hand so non-array input gets a clear error
#[derive(Debug, Deserialize)]
pub struct BatchAnalyzeRequest {
    pub texts: Option<Value>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    #[serde(flatten)]
    pub report: HealthReport,
    pub timestamp: DateTime<Utc>,
    pub service: &'static str,
    pub version: &'static str,
}

/// Readiness response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    #[serde(flatten)]
    pub report: ReadinessReport,
    pub timestamp: DateTime<Utc>,
}

/// Analyze response
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub sentiment: NormalizedSentiment,
    pub processed_at: DateTime<Utc>,
}

/// Batch response
#[derive(Debug, Serialize)]
pub struct BatchAnalyzeResponse {
    #[serde(flatten)]
    pub batch: BatchResult,
    pub processed_at: DateTime<Utc>,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::NotReady { loading, detail } => {
                let mut body = json!({
                    "error": "Model not ready yet. Please wait for initialization.",
                    "model_loading": loading,
                    "retry_after": RETRY_AFTER_SECS,
                });
                if let Some(detail) = detail {
                    body["model_error"] = Value::String(detail);
                }
                (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
            }
            GatewayError::InvalidInput(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            GatewayError::Internal(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error", "details": details })),
            )
                .into_response(),
        }
    }
}

/// Create the API router
pub fn create_router(gateway: Arc<RequestGateway>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(readiness))
        .route("/analyze", post(analyze))
        .route("/batch-analyze", post(batch_analyze))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(gateway)
}

/// Health check endpoint
async fn health(State(gateway): State<Arc<RequestGateway>>) -> impl IntoResponse {
    let report = gateway.health_check();
    let code = if report.serving {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        code,
        Json(HealthResponse {
            report,
            timestamp: Utc::now(),
            service: SERVICE_NAME,
            version: VERSION,
        }),
    )
}

/// Readiness endpoint
async fn readiness(State(gateway): State<Arc<RequestGateway>>) -> impl IntoResponse {
    let report = gateway.readiness_check();
    let code = if report.model_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        code,
        Json(ReadinessResponse {
            report,
            timestamp: Utc::now(),
        }),
    )
}

/// Classify one text
async fn analyze(
    State(gateway): State<Arc<RequestGateway>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, GatewayError> {
    gateway.ensure_ready()?;
    let Json(req) = payload.map_err(rejection_error)?;

    let sentiment = gateway.analyze(req.text.as_deref()).await?;
    info!(
        "Analysis complete: {} ({:.3})",
        sentiment.label, sentiment.confidence
    );

    Ok(Json(AnalyzeResponse {
        sentiment,
        processed_at: Utc::now(),
    }))
}

/// Classify a batch of texts
async fn batch_analyze(
    State(gateway): State<Arc<RequestGateway>>,
    payload: Result<Json<BatchAnalyzeRequest>, JsonRejection>,
) -> Result<Json<BatchAnalyzeResponse>, GatewayError> {
    gateway.ensure_ready()?;
    let Json(req) = payload.map_err(rejection_error)?;

    let texts = match req.texts {
        None => None,
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(text) => Some(text),
                    _ => None,
                })
                .collect(),
        ),
        Some(_) => return Err(GatewayError::invalid("texts must be a non-empty array")),
    };

    let batch = gateway.batch_analyze(texts).await?;
    Ok(Json(BatchAnalyzeResponse {
        batch,
        processed_at: Utc::now(),
    }))
}

fn rejection_error(rejection: JsonRejection) -> GatewayError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            GatewayError::invalid("Content-Type must be application/json")
        }
        other => GatewayError::invalid(format!("Invalid JSON body: {}", other.body_text())),
    }
}

/// Run the API server until ctrl-c
pub async fn run_server(
    addr: &str,
    gateway: Arc<RequestGateway>,
) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(gateway);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Sentiment API listening on {}", addr);
    info!("Model loads in background; requests are accepted immediately");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        // No signal handler: serve until the process is killed
        Err(_) => std::future::pending::<()>().await,
    }
}
