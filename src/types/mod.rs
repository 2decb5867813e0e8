//! Core types for nlp-sentiment

mod sentiment;
mod engine;
mod lifecycle;
mod batch;
mod report;
mod error;

pub use sentiment::{ScoreEntry, RawResult, SentimentLabel, NormalizedSentiment};
pub use engine::{EngineConfig, EngineError};
pub use lifecycle::{LifecycleState, ReadyEngine, ModelTier, InitializationError};
pub use batch::{BatchItem, BatchResult};
pub use report::{HealthReport, HealthStatus, ReadinessReport};
pub use error::GatewayError;
