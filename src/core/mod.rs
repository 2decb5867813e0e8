//! Core modules for nlp-sentiment

pub mod classifier;
pub mod engine;
pub mod remote;
pub mod lexicon;
pub mod lifecycle;
pub mod gateway;
pub mod api;

pub use classifier::ScoreClassifier;
pub use engine::{InferenceEngine, EngineLoader, DefaultLoader};
pub use remote::RemoteEngine;
pub use lexicon::LexiconEngine;
pub use lifecycle::ModelLifecycle;
pub use gateway::{RequestGateway, GatewayConfig};
pub use api::{create_router, run_server};
