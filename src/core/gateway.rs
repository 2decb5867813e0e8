//! Request gateway: every inference request is gated on the lifecycle
//!
//! Readiness is checked before input validation, so a loading service
//! answers "not ready" regardless of what the caller sent.

use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error};

use crate::core::{ModelLifecycle, ScoreClassifier};
use crate::types::{
    BatchItem, BatchResult, GatewayError, HealthReport, HealthStatus, LifecycleState,
    NormalizedSentiment, ReadinessReport, ReadyEngine,
};
use crate::{MAX_BATCH_SIZE, TEXT_ECHO_LIMIT};

/// Concurrency limits for engine calls
#[derive(Debug, Clone, Copy)]
pub struct GatewayConfig {
    /// Engine calls allowed in flight across all requests
    pub max_concurrent_inferences: usize,
    /// Items of one batch scored concurrently
    pub batch_concurrency: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_concurrent_inferences: 4,
            batch_concurrency: 4,
        }
    }
}

pub struct RequestGateway {
    lifecycle: Arc<ModelLifecycle>,
    classifier: ScoreClassifier,
    permits: Arc<Semaphore>,
    batch_concurrency: usize,
}

impl RequestGateway {
    pub fn new(lifecycle: Arc<ModelLifecycle>, config: GatewayConfig) -> Self {
        Self {
            lifecycle,
            classifier: ScoreClassifier::new(),
            permits: Arc::new(Semaphore::new(config.max_concurrent_inferences.max(1))),
            batch_concurrency: config.batch_concurrency.max(1),
        }
    }

    /// Map the lifecycle state to a health report
    pub fn health_check(&self) -> HealthReport {
        match self.lifecycle.current_state() {
            LifecycleState::Ready(ready) => HealthReport {
                status: HealthStatus::Healthy,
                model_ready: true,
                model_loading: false,
                model: Some(ready.model().to_string()),
                model_error: None,
                message: None,
                serving: true,
            },
            LifecycleState::NotStarted | LifecycleState::Loading => HealthReport {
                status: HealthStatus::Healthy,
                model_ready: false,
                model_loading: true,
                model: None,
                model_error: None,
                message: Some("Model is loading, please wait...".to_string()),
                serving: false,
            },
            LifecycleState::Failed(err) => HealthReport {
                status: HealthStatus::Unhealthy,
                model_ready: false,
                model_loading: false,
                model: None,
                model_error: Some(err.to_string()),
                message: Some("Model failed to load".to_string()),
                serving: false,
            },
        }
    }

    /// Ready iff an engine is published; a failed model is never ready
    pub fn readiness_check(&self) -> ReadinessReport {
        let state = self.lifecycle.current_state();
        if state.is_ready() {
            ReadinessReport::ready()
        } else {
            ReadinessReport::not_ready(state.is_loading())
        }
    }

    /// The published engine, or a not-ready error carrying retry guidance
    pub fn ensure_ready(&self) -> Result<ReadyEngine, GatewayError> {
        match self.lifecycle.current_state() {
            LifecycleState::Ready(ready) => Ok(ready),
            LifecycleState::NotStarted | LifecycleState::Loading => Err(GatewayError::NotReady {
                loading: true,
                detail: None,
            }),
            LifecycleState::Failed(err) => Err(GatewayError::NotReady {
                loading: false,
                detail: Some(err.to_string()),
            }),
        }
    }

    /// Classify one text
    ///
    /// `None` means the caller did not supply the field.
    pub async fn analyze(&self, text: Option<&str>) -> Result<NormalizedSentiment, GatewayError> {
        let ready = self.ensure_ready()?;

        let text = text.ok_or_else(|| GatewayError::invalid("Missing required field: text"))?;
        let text = text.trim();
        if text.is_empty() {
            return Err(GatewayError::invalid("Text cannot be empty"));
        }

        debug!("Analyzing sentiment for text: {}...", echo(text, 50));
        self.score(&ready, text.to_string()).await.map_err(|detail| {
            error!("Error in sentiment analysis: {}", detail);
            GatewayError::Internal(detail)
        })
    }

    /// Classify up to `MAX_BATCH_SIZE` texts; per-item failures never abort the batch
    ///
    /// `None` items are inputs that were not strings.
    pub async fn batch_analyze(
        &self,
        texts: Option<Vec<Option<String>>>,
    ) -> Result<BatchResult, GatewayError> {
        let ready = self.ensure_ready()?;

        let texts = texts.ok_or_else(|| GatewayError::invalid("Missing required field: texts"))?;
        if texts.is_empty() {
            return Err(GatewayError::invalid("texts must be a non-empty array"));
        }
        if texts.len() > MAX_BATCH_SIZE {
            return Err(GatewayError::invalid(format!(
                "Batch size cannot exceed {} texts",
                MAX_BATCH_SIZE
            )));
        }

        debug!("Analyzing batch of {} texts", texts.len());
        let ready = &ready;
        let items: Vec<BatchItem> = stream::iter(texts.into_iter().enumerate())
            .map(move |(index, text)| self.score_item(ready, index, text))
            .buffered(self.batch_concurrency)
            .collect()
            .await;

        let result = BatchResult::from_items(items);
        debug!(
            "Batch complete: {} processed, {} errors",
            result.processed_count, result.error_count
        );
        Ok(result)
    }

    async fn score_item(&self, ready: &ReadyEngine, index: usize, text: Option<String>) -> BatchItem {
        let Some(text) = text else {
            return BatchItem::Failed {
                index,
                error: "Text must be a string".to_string(),
            };
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return BatchItem::Failed {
                index,
                error: "Empty text".to_string(),
            };
        }

        match self.score(ready, trimmed.to_string()).await {
            Ok(sentiment) => BatchItem::Analyzed {
                index,
                text: echo(&text, TEXT_ECHO_LIMIT),
                sentiment,
            },
            Err(error) => BatchItem::Failed { index, error },
        }
    }

    /// Run the engine on the blocking pool and classify its output
    async fn score(&self, ready: &ReadyEngine, text: String) -> Result<NormalizedSentiment, String> {
        // The blocking job holds the permit until `infer` returns, even if
        // this future is dropped first
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| format!("inference pool closed: {}", e))?;

        let engine = Arc::clone(&ready.engine);
        let raw = tokio::task::spawn_blocking(move || {
            let result = engine.infer(&text);
            drop(permit);
            result
        })
        .await
        .map_err(|e| format!("inference task failed: {}", e))?
        .map_err(|e| e.to_string())?;

        raw.validate().map_err(|e| e.to_string())?;
        self.classifier
            .normalize(&raw)
            .ok_or_else(|| "engine returned no scores".to_string())
    }
}

/// First `limit` characters, with "..." when the text was longer
fn echo(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_keeps_short_text() {
        assert_eq!(echo("good movie", 100), "good movie");
    }

    #[test]
    fn test_echo_truncates_on_char_boundary() {
        let text = "é".repeat(101);
        let echoed = echo(&text, 100);
        assert_eq!(echoed.chars().count(), 103);
        assert!(echoed.ends_with("..."));
    }

    #[test]
    fn test_echo_exact_limit_is_untouched() {
        let text = "a".repeat(100);
        assert_eq!(echo(&text, 100), text);
    }
}
