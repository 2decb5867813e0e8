//! nlp-sentiment CLI
//!
//! Usage:
//!   nlp-sentiment                              # HTTP API server on $PORT (default 5000)
//!   nlp-sentiment --text "great food"          # Classify one text and exit
//!   nlp-sentiment --text "great food" --json   # JSON output
//!   nlp-sentiment --primary-backend lexicon    # Offline, built-in word lists

use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::prelude::*;

use nlp_sentiment::core::{run_server, GatewayConfig, ModelLifecycle, RequestGateway};
use nlp_sentiment::types::{EngineConfig, LifecycleState, NormalizedSentiment, SentimentLabel};
use nlp_sentiment::{
    DEFAULT_FALLBACK_MODEL, DEFAULT_INFERENCE_URL, DEFAULT_PORT, DEFAULT_PRIMARY_MODEL,
    DEFAULT_REQUEST_TIMEOUT_SECS, VERSION,
};

/// Engine backend for one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Hosted model endpoint
    Remote,
    /// Built-in word lists, no network
    Lexicon,
}

#[derive(Parser, Debug)]
#[command(
    name = "nlp-sentiment",
    version = VERSION,
    about = "Sentiment analysis API that accepts requests while the model loads",
    long_about = "Serves sentiment analysis over HTTP.\n\n\
                  The model is constructed in the background: the primary model first,\n\
                  the fallback model if that fails. Until one is ready, /health and /ready\n\
                  answer 503 and analysis requests are rejected with retry guidance.\n\n\
                  Endpoints:\n  \
                  GET  /health         - Service and model status\n  \
                  GET  /ready          - Readiness probe\n  \
                  POST /analyze        - {\"text\": \"...\"}\n  \
                  POST /batch-analyze  - {\"texts\": [\"...\", ...]} (max 100)"
)]
struct Args {
    /// Classify this text once and exit instead of serving
    #[arg(short, long)]
    text: Option<String>,

    /// Output as JSON (with --text)
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Model tried first
    #[arg(long, env = "PRIMARY_MODEL", default_value = DEFAULT_PRIMARY_MODEL)]
    primary_model: String,

    /// Backend for the primary model
    #[arg(long, env = "PRIMARY_BACKEND", value_enum, default_value_t = Backend::Remote)]
    primary_backend: Backend,

    /// Model used when the primary cannot be loaded
    #[arg(long, env = "FALLBACK_MODEL", default_value = DEFAULT_FALLBACK_MODEL)]
    fallback_model: String,

    /// Backend for the fallback model
    #[arg(long, env = "FALLBACK_BACKEND", value_enum, default_value_t = Backend::Remote)]
    fallback_backend: Backend,

    /// Base URL of the hosted inference endpoint
    #[arg(long, env = "INFERENCE_URL", default_value = DEFAULT_INFERENCE_URL)]
    inference_url: String,

    /// API token for the inference endpoint
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    hf_token: Option<String>,

    /// Timeout for each remote inference request (seconds)
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout_secs: u64,

    /// Engine calls allowed in flight at once
    #[arg(long, env = "MAX_CONCURRENT_INFERENCES", default_value_t = 4)]
    max_concurrent_inferences: usize,

    /// Items of one batch scored concurrently
    #[arg(long, env = "BATCH_CONCURRENCY", default_value_t = 4)]
    batch_concurrency: usize,

    /// Verbose logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn engine_config(&self, backend: Backend, model: &str, all_scores: bool) -> EngineConfig {
        match backend {
            Backend::Lexicon => EngineConfig::Lexicon,
            Backend::Remote => EngineConfig::Remote {
                model: model.to_string(),
                endpoint: self.inference_url.clone(),
                api_token: self.hf_token.clone(),
                all_scores,
                timeout: Duration::from_secs(self.request_timeout_secs),
            },
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    // Primary reports every class score; fallback reports the best label only
    let primary = args.engine_config(args.primary_backend, &args.primary_model, true);
    let fallback = args.engine_config(args.fallback_backend, &args.fallback_model, false);

    let lifecycle = Arc::new(ModelLifecycle::new(primary, fallback));
    lifecycle.start_initialization();

    let gateway = Arc::new(RequestGateway::new(
        Arc::clone(&lifecycle),
        GatewayConfig {
            max_concurrent_inferences: args.max_concurrent_inferences,
            batch_concurrency: args.batch_concurrency,
        },
    ));

    let code = match args.text.as_deref() {
        Some(text) => run_single(text, &args, &lifecycle, &gateway).await,
        None => run_serve(&args, gateway).await,
    };
    std::process::exit(code);
}

fn init_logging(debug: bool) {
    let default_directive = if debug {
        "nlp_sentiment=debug,tower_http=debug,info"
    } else {
        "nlp_sentiment=info,tower_http=info,warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();
}

/// Run the HTTP API server
async fn run_serve(args: &Args, gateway: Arc<RequestGateway>) -> i32 {
    let addr = format!("{}:{}", args.host, args.port);
    info!("nlp-sentiment v{} starting on {}", VERSION, addr);

    match run_server(&addr, gateway).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Server error: {}", e);
            1
        }
    }
}

/// Wait for the model, classify one text, print it
async fn run_single(
    text: &str,
    args: &Args,
    lifecycle: &ModelLifecycle,
    gateway: &RequestGateway,
) -> i32 {
    if let LifecycleState::Failed(err) = lifecycle.wait_until_settled().await {
        eprintln!("Model failed to load: {}", err);
        return 1;
    }

    let sentiment = match gateway.analyze(Some(text)).await {
        Ok(sentiment) => sentiment,
        Err(e) => {
            eprintln!("Analysis failed: {}", e);
            return 1;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&sentiment) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Could not encode result: {}", e);
                return 1;
            }
        }
    } else {
        println!("{}", format_sentiment(&sentiment, args.no_color));
    }
    0
}

fn format_sentiment(sentiment: &NormalizedSentiment, no_color: bool) -> String {
    let line = format!(
        "{} confidence={:.3} score={:+.3}",
        sentiment.label, sentiment.confidence, sentiment.score
    );
    if no_color {
        return line;
    }
    match sentiment.label {
        SentimentLabel::Positive => line.green().to_string(),
        SentimentLabel::Negative => line.red().to_string(),
        SentimentLabel::Neutral => line.yellow().to_string(),
    }
}
