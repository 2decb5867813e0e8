//! Scripted engines and loaders shared by the integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::sleep;
use std::time::Duration;

use nlp_sentiment::core::{
    EngineLoader, GatewayConfig, InferenceEngine, LexiconEngine, ModelLifecycle, RequestGateway,
};
use nlp_sentiment::types::{EngineConfig, EngineError, RawResult};

pub const PRIMARY_MODEL: &str = "primary-model";
pub const FALLBACK_MODEL: &str = "fallback-model";

/// Scores with the lexicon, except for a few trigger words:
/// - "fail" → engine error
/// - "explode" → panic
/// - "empty" → detailed result with no entries
/// - a "zzz" prefix → sleeps before answering
pub struct ScriptedEngine {
    model: String,
    lexicon: LexiconEngine,
}

impl ScriptedEngine {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            lexicon: LexiconEngine::new(),
        }
    }
}

impl InferenceEngine for ScriptedEngine {
    fn model(&self) -> &str {
        &self.model
    }

    fn infer(&self, text: &str) -> Result<RawResult, EngineError> {
        if text.contains("explode") {
            panic!("scripted panic");
        }
        if text.contains("fail") {
            return Err(EngineError::Malformed("scripted failure".to_string()));
        }
        if text.contains("empty") {
            return Ok(RawResult::Detailed(vec![]));
        }
        if text.starts_with("zzz") {
            sleep(Duration::from_millis(60));
        }
        self.lexicon.infer(text)
    }
}

/// Sleeps on every call and records how many calls overlap
pub struct CountingEngine {
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    lexicon: LexiconEngine,
}

impl CountingEngine {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            lexicon: LexiconEngine::new(),
        })
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl InferenceEngine for CountingEngine {
    fn model(&self) -> &str {
        PRIMARY_MODEL
    }

    fn infer(&self, text: &str) -> Result<RawResult, EngineError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        sleep(self.delay);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.lexicon.infer(text)
    }
}

/// Loader that always hands out the same engine
pub struct FixedLoader(pub Arc<CountingEngine>);

impl EngineLoader for FixedLoader {
    fn load(&self, _config: &EngineConfig) -> Result<Arc<dyn InferenceEngine>, EngineError> {
        let engine: Arc<dyn InferenceEngine> = self.0.clone();
        Ok(engine)
    }
}

/// Loader whose outcome per tier is fixed up front
pub struct ScriptedLoader {
    primary_ok: bool,
    fallback_ok: bool,
    panics: bool,
    loads: AtomicUsize,
    gate: Mutex<Option<mpsc::Receiver<()>>>,
}

impl ScriptedLoader {
    pub fn new(primary_ok: bool, fallback_ok: bool) -> Arc<Self> {
        Arc::new(Self {
            primary_ok,
            fallback_ok,
            panics: false,
            loads: AtomicUsize::new(0),
            gate: Mutex::new(None),
        })
    }

    pub fn panicking() -> Arc<Self> {
        Arc::new(Self {
            primary_ok: false,
            fallback_ok: false,
            panics: true,
            loads: AtomicUsize::new(0),
            gate: Mutex::new(None),
        })
    }

    /// Loader that blocks its first load until the gate is released or dropped
    pub fn gated(primary_ok: bool, fallback_ok: bool) -> (Arc<Self>, Gate) {
        let (tx, rx) = mpsc::channel();
        let loader = Arc::new(Self {
            primary_ok,
            fallback_ok,
            panics: false,
            loads: AtomicUsize::new(0),
            gate: Mutex::new(Some(rx)),
        });
        (loader, Gate(tx))
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl EngineLoader for ScriptedLoader {
    fn load(&self, config: &EngineConfig) -> Result<Arc<dyn InferenceEngine>, EngineError> {
        self.loads.fetch_add(1, Ordering::SeqCst);

        if let Some(rx) = self.gate.lock().unwrap().take() {
            // Either a release or a dropped gate lets loading continue
            let _ = rx.recv();
        }
        if self.panics {
            panic!("scripted loader panic");
        }

        let model = config.model_name();
        let ok = if model == PRIMARY_MODEL {
            self.primary_ok
        } else {
            self.fallback_ok
        };
        if ok {
            Ok(Arc::new(ScriptedEngine::new(model)))
        } else {
            Err(EngineError::Status {
                status: 503,
                body: format!("{} unavailable", model),
            })
        }
    }
}

/// Holds a gated loader until released
pub struct Gate(mpsc::Sender<()>);

impl Gate {
    pub fn release(self) {
        let _ = self.0.send(());
    }
}

pub fn lifecycle_with(loader: Arc<ScriptedLoader>) -> Arc<ModelLifecycle> {
    Arc::new(ModelLifecycle::with_loader(
        EngineConfig::remote(PRIMARY_MODEL, true),
        EngineConfig::remote(FALLBACK_MODEL, false),
        loader,
    ))
}

/// Gateway over a READY lifecycle serving `engine`, with custom limits
pub async fn gateway_with_engine(
    engine: Arc<CountingEngine>,
    config: GatewayConfig,
) -> Arc<RequestGateway> {
    let lifecycle = Arc::new(ModelLifecycle::with_loader(
        EngineConfig::remote(PRIMARY_MODEL, true),
        EngineConfig::remote(FALLBACK_MODEL, false),
        Arc::new(FixedLoader(engine)),
    ));
    lifecycle.start_initialization();
    lifecycle.wait_until_settled().await;
    Arc::new(RequestGateway::new(lifecycle, config))
}

pub fn gateway_for(lifecycle: &Arc<ModelLifecycle>) -> Arc<RequestGateway> {
    Arc::new(RequestGateway::new(
        Arc::clone(lifecycle),
        GatewayConfig::default(),
    ))
}

/// Gateway whose lifecycle has already published READY (primary tier)
pub async fn ready_gateway() -> Arc<RequestGateway> {
    let lifecycle = lifecycle_with(ScriptedLoader::new(true, true));
    lifecycle.start_initialization();
    lifecycle.wait_until_settled().await;
    gateway_for(&lifecycle)
}

/// Gateway whose lifecycle has published FAILED
pub async fn failed_gateway() -> Arc<RequestGateway> {
    let lifecycle = lifecycle_with(ScriptedLoader::new(false, false));
    lifecycle.start_initialization();
    lifecycle.wait_until_settled().await;
    gateway_for(&lifecycle)
}
