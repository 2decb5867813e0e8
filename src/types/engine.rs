//! Engine configurations and engine-level failures

use std::time::Duration;
use thiserror::Error;

/// A specific inference backend the lifecycle may construct
#[derive(Debug, Clone, PartialEq)]
pub enum EngineConfig {
    /// Hosted text-classification endpoint (`POST {endpoint}/models/{model}`)
    Remote {
        model: String,
        endpoint: String,
        api_token: Option<String>,
        /// Ask for every class score instead of the best label only
        all_scores: bool,
        timeout: Duration,
    },
    /// Built-in word-list classifier, always constructible
    Lexicon,
}

impl EngineConfig {
    /// Remote model with the crate defaults for endpoint and timeout
    pub fn remote(model: impl Into<String>, all_scores: bool) -> Self {
        EngineConfig::Remote {
            model: model.into(),
            endpoint: crate::DEFAULT_INFERENCE_URL.to_string(),
            api_token: None,
            all_scores,
            timeout: Duration::from_secs(crate::DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Name used in logs and health output
    pub fn model_name(&self) -> &str {
        match self {
            EngineConfig::Remote { model, .. } => model,
            EngineConfig::Lexicon => crate::core::lexicon::LEXICON_MODEL_NAME,
        }
    }
}

/// Failure while constructing or invoking an engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("request to inference endpoint failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("inference endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed engine output: {0}")]
    Malformed(String),
}
