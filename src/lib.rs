//! nlp-sentiment: sentiment analysis served while the model loads
//!
//! The process accepts connections immediately; a single background task
//! constructs the inference engine (primary model, then fallback) and the
//! request gateway rejects work with "not ready" until that task publishes
//! a usable engine.

pub mod core;
pub mod types;

// =============================================================================
// REQUEST LIMITS
// =============================================================================

/// Hard cap on the number of texts in one batch request
pub const MAX_BATCH_SIZE: usize = 100;

/// Batch results echo at most this many characters of the input text
pub const TEXT_ECHO_LIMIT: usize = 100;

/// Retry hint (seconds) handed to clients while the model is loading
pub const RETRY_AFTER_SECS: u64 = 10;

// =============================================================================
// ENGINE DEFAULTS
// =============================================================================

/// Higher-quality three-class model tried first
pub const DEFAULT_PRIMARY_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment-latest";

/// Lighter two-class model used when the primary cannot be constructed
pub const DEFAULT_FALLBACK_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";

/// Hosted inference endpoint serving `/models/{model}`
pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co";

/// Per-request timeout for the remote backend (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// SERVICE
// =============================================================================

pub const DEFAULT_PORT: u16 = 5000;

pub const SERVICE_NAME: &str = "nlp-sentiment-analysis";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
