//! Model readiness states
//!
//! Transitions only move forward:
//! - NOT_STARTED → LOADING: initialization spawned
//! - LOADING → READY: primary or fallback engine constructed
//! - LOADING → FAILED: both tiers failed
//!
//! READY and FAILED are terminal.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::core::InferenceEngine;

/// Which engine configuration produced the ready engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    Primary,
    Fallback,
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelTier::Primary => write!(f, "primary"),
            ModelTier::Fallback => write!(f, "fallback"),
        }
    }
}

/// A constructed engine, immutable and shared by every request
#[derive(Clone)]
pub struct ReadyEngine {
    pub engine: Arc<dyn InferenceEngine>,
    pub tier: ModelTier,
}

impl ReadyEngine {
    pub fn model(&self) -> &str {
        self.engine.model()
    }
}

impl fmt::Debug for ReadyEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadyEngine")
            .field("model", &self.engine.model())
            .field("tier", &self.tier)
            .finish()
    }
}

/// Both engine tiers failed to construct
///
/// Displays as the fallback failure; the primary failure is kept for logs.
#[derive(Debug, Clone, Error)]
#[error("{fallback_error}")]
pub struct InitializationError {
    pub primary_model: String,
    pub primary_error: String,
    pub fallback_model: String,
    pub fallback_error: String,
}

impl InitializationError {
    /// Failure raised outside the two-tier attempt (e.g. a panicking loader)
    pub fn aborted(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            primary_model: String::new(),
            primary_error: detail.clone(),
            fallback_model: String::new(),
            fallback_error: detail,
        }
    }
}

/// The single authoritative readiness value
#[derive(Debug, Clone)]
pub enum LifecycleState {
    NotStarted,
    Loading,
    Ready(ReadyEngine),
    Failed(InitializationError),
}

impl LifecycleState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LifecycleState::Ready(_))
    }

    /// NOT_STARTED counts as loading: initialization is expected at boot
    pub fn is_loading(&self) -> bool {
        matches!(self, LifecycleState::NotStarted | LifecycleState::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Ready(_) | LifecycleState::Failed(_))
    }

    pub fn error(&self) -> Option<&InitializationError> {
        match self {
            LifecycleState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::NotStarted => "NOT_STARTED",
            LifecycleState::Loading => "LOADING",
            LifecycleState::Ready(_) => "READY",
            LifecycleState::Failed(_) => "FAILED",
        };
        write!(f, "{}", name)
    }
}
