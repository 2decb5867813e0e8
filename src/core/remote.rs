//! Remote engine: hosted text-classification endpoint
//!
//! Request:  POST {endpoint}/models/{model}
//!           {"inputs": "...", "options": {"wait_for_model": true}}
//! Response: [[{label, score}, ...]] | [{label, score}, ...] | {label, score}
//!
//! Construction sends a warm-up request, so a model that cannot be served
//! fails at load time rather than on the first user request.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::InferenceEngine;
use crate::types::{EngineError, RawResult, ScoreEntry};

const WARM_UP_TEXT: &str = "Warming up the sentiment model.";

/// Error bodies are cut to this many characters before being surfaced
const MAX_ERROR_BODY: usize = 200;

/// Blocking HTTP client bound to one model
#[derive(Debug)]
pub struct RemoteEngine {
    client: Client,
    url: String,
    model: String,
    api_token: Option<String>,
    all_scores: bool,
}

impl RemoteEngine {
    /// Build the client and warm the model up
    pub fn connect(
        model: &str,
        endpoint: &str,
        api_token: Option<&str>,
        all_scores: bool,
        timeout: Duration,
    ) -> Result<Self, EngineError> {
        let client = Client::builder().timeout(timeout).build()?;
        let engine = Self {
            client,
            url: format!("{}/models/{}", endpoint.trim_end_matches('/'), model),
            model: model.to_string(),
            api_token: api_token.map(str::to_string),
            all_scores,
        };

        info!("Warming up remote model {} at {}", engine.model, engine.url);
        engine.infer(WARM_UP_TEXT)?.validate()?;
        Ok(engine)
    }

    fn request_body(&self, text: &str) -> serde_json::Value {
        let mut body = json!({
            "inputs": text,
            "options": { "wait_for_model": true },
        });
        if !self.all_scores {
            body["parameters"] = json!({ "top_k": 1 });
        }
        body
    }
}

impl InferenceEngine for RemoteEngine {
    fn model(&self) -> &str {
        &self.model
    }

    fn infer(&self, text: &str) -> Result<RawResult, EngineError> {
        let mut request = self.client.post(&self.url).json(&self.request_body(text));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(EngineError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let bytes = response.bytes()?;
        debug!("Remote model {} answered with {} bytes", self.model, bytes.len());
        parse_response(&bytes)
    }
}

/// Response layouts seen from hosted classification endpoints
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseShape {
    Nested(Vec<Vec<ScoreEntry>>),
    Flat(Vec<ScoreEntry>),
    Single(ScoreEntry),
}

/// Decode a response body into a raw result for a single input
pub fn parse_response(body: &[u8]) -> Result<RawResult, EngineError> {
    let shape: ResponseShape = serde_json::from_slice(body)
        .map_err(|e| EngineError::Malformed(format!("unexpected response: {}", e)))?;

    let mut entries = match shape {
        ResponseShape::Nested(mut batches) => {
            if batches.is_empty() {
                return Err(EngineError::Malformed("empty response".to_string()));
            }
            batches.swap_remove(0)
        }
        ResponseShape::Flat(entries) => entries,
        ResponseShape::Single(entry) => return Ok(RawResult::Simple(entry)),
    };

    match entries.len() {
        0 => Err(EngineError::Malformed("response carried no scores".to_string())),
        1 => Ok(RawResult::Simple(entries.remove(0))),
        _ => Ok(RawResult::Detailed(entries)),
    }
}

// =============================================================================
// TESTS
// =============================================================================
