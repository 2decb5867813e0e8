//! Health and readiness reports

use serde::Serialize;

/// Overall service status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Health probe result
///
/// `serving` is false while loading (alive, not usable) and after a
/// failed initialization; the transport maps it to 200 vs 503.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub model_ready: bool,
    pub model_loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip)]
    pub serving: bool,
}

/// Readiness probe result: ready iff a usable engine is published
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadinessReport {
    pub status: &'static str,
    pub model_ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_loading: Option<bool>,
}

impl ReadinessReport {
    pub fn ready() -> Self {
        Self {
            status: "ready",
            model_ready: true,
            model_loading: None,
        }
    }

    pub fn not_ready(loading: bool) -> Self {
        Self {
            status: "not_ready",
            model_ready: false,
            model_loading: Some(loading),
        }
    }
}
