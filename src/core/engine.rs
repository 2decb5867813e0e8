//! Inference engine seam
//!
//! Engines are blocking: construction may take minutes (model download,
//! cold start) and each call may block on I/O. Callers run both on the
//! blocking pool.

use std::sync::Arc;
use tracing::debug;

use crate::core::lexicon::LexiconEngine;
use crate::core::remote::RemoteEngine;
use crate::types::{EngineConfig, EngineError, RawResult};

/// A constructed engine; shared by all concurrent requests
pub trait InferenceEngine: Send + Sync {
    /// Model identifier, for logs and health output
    fn model(&self) -> &str;

    /// Score one text
    fn infer(&self, text: &str) -> Result<RawResult, EngineError>;
}

/// Builds engines from configurations
pub trait EngineLoader: Send + Sync {
    fn load(&self, config: &EngineConfig) -> Result<Arc<dyn InferenceEngine>, EngineError>;
}

/// Loader for the backends shipped with the crate
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLoader;

impl EngineLoader for DefaultLoader {
    fn load(&self, config: &EngineConfig) -> Result<Arc<dyn InferenceEngine>, EngineError> {
        debug!("Constructing engine for {}", config.model_name());
        match config {
            EngineConfig::Remote {
                model,
                endpoint,
                api_token,
                all_scores,
                timeout,
            } => {
                let engine = RemoteEngine::connect(
                    model,
                    endpoint,
                    api_token.as_deref(),
                    *all_scores,
                    *timeout,
                )?;
                Ok(Arc::new(engine))
            }
            EngineConfig::Lexicon => Ok(Arc::new(LexiconEngine::new())),
        }
    }
}
