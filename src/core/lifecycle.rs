//! Model lifecycle: one background initialization racing live requests
//!
//! State transitions (each published with a single watch send):
//! - NOT_STARTED → LOADING: `start_initialization` wins the transition
//! - LOADING → READY: primary engine, or fallback after a primary failure
//! - LOADING → FAILED: fallback failed too (or the loader panicked)
//!
//! Readers never wait on initialization: `current_state` clones the latest
//! published value.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::core::{DefaultLoader, EngineLoader};
use crate::types::{
    EngineConfig, InitializationError, LifecycleState, ModelTier, ReadyEngine,
};

/// Owner of the readiness state machine
pub struct ModelLifecycle {
    state: Arc<watch::Sender<LifecycleState>>,
    loader: Arc<dyn EngineLoader>,
    primary: EngineConfig,
    fallback: EngineConfig,
}

impl ModelLifecycle {
    /// Lifecycle using the crate's own backends
    pub fn new(primary: EngineConfig, fallback: EngineConfig) -> Self {
        Self::with_loader(primary, fallback, Arc::new(DefaultLoader))
    }

    pub fn with_loader(
        primary: EngineConfig,
        fallback: EngineConfig,
        loader: Arc<dyn EngineLoader>,
    ) -> Self {
        let (tx, _) = watch::channel(LifecycleState::NotStarted);
        Self {
            state: Arc::new(tx),
            loader,
            primary,
            fallback,
        }
    }

    /// Spawn the background initialization, at most once
    ///
    /// Returns `false` (and does nothing) unless the state was NOT_STARTED.
    /// Outside a tokio runtime nothing is spawned and the state stays
    /// NOT_STARTED, so a later call from inside a runtime can still start.
    pub fn start_initialization(&self) -> bool {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!("Cannot start model loading outside a tokio runtime: {}", e);
                return false;
            }
        };

        let won = self.state.send_if_modified(|state| {
            if matches!(state, LifecycleState::NotStarted) {
                *state = LifecycleState::Loading;
                true
            } else {
                false
            }
        });
        if !won {
            return false;
        }

        info!(
            "Starting background model loading (primary: {}, fallback: {})",
            self.primary.model_name(),
            self.fallback.model_name()
        );

        let state = Arc::clone(&self.state);
        let loader = Arc::clone(&self.loader);
        let primary = self.primary.clone();
        let fallback = self.fallback.clone();

        runtime.spawn(async move {
            let attempt =
                tokio::task::spawn_blocking(move || initialize(loader.as_ref(), &primary, &fallback))
                    .await;

            let next = match attempt {
                Ok(Ok(ready)) => {
                    info!(
                        "Model initialization completed: {} ({})",
                        ready.model(),
                        ready.tier
                    );
                    LifecycleState::Ready(ready)
                }
                Ok(Err(err)) => {
                    error!("Fatal error loading model: {}", err);
                    LifecycleState::Failed(err)
                }
                Err(join_err) => {
                    error!("Model loader aborted: {}", join_err);
                    LifecycleState::Failed(InitializationError::aborted(join_err.to_string()))
                }
            };
            state.send_replace(next);
        });

        true
    }

    /// Snapshot of the current state; never blocks on initialization
    pub fn current_state(&self) -> LifecycleState {
        self.state.borrow().clone()
    }

    /// Receiver for observing transitions
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Wait until READY or FAILED is published
    ///
    /// Waits forever if initialization was never started.
    pub async fn wait_until_settled(&self) -> LifecycleState {
        let mut rx = self.state.subscribe();
        let settled = match rx.wait_for(LifecycleState::is_terminal).await {
            Ok(state) => state.clone(),
            // The sender lives in `self`, so the channel cannot close here
            Err(_) => self.current_state(),
        };
        settled
    }
}

/// Two-tier attempt: the primary failure is data handed to the fallback step
fn initialize(
    loader: &dyn EngineLoader,
    primary: &EngineConfig,
    fallback: &EngineConfig,
) -> Result<ReadyEngine, InitializationError> {
    info!("Loading primary model: {}", primary.model_name());
    let primary_error = match loader.load(primary) {
        Ok(engine) => {
            return Ok(ReadyEngine {
                engine,
                tier: ModelTier::Primary,
            })
        }
        Err(err) => err,
    };

    warn!(
        "Primary model {} failed, using fallback {}: {}",
        primary.model_name(),
        fallback.model_name(),
        primary_error
    );

    loader
        .load(fallback)
        .map(|engine| ReadyEngine {
            engine,
            tier: ModelTier::Fallback,
        })
        .map_err(|fallback_error| InitializationError {
            primary_model: primary.model_name().to_string(),
            primary_error: primary_error.to_string(),
            fallback_model: fallback.model_name().to_string(),
            fallback_error: fallback_error.to_string(),
        })
}
