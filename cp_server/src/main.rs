//! Casino simulator and predictor HTTP server.
//!
//! Serves the simulation, prediction and chat endpoints over one shared
//! in-memory casino. Nothing is persisted; restarting clears every table.

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Error};
use casino_predictor::{
    Casino, CasinoConfig,
    chat::{ChatAssistant, OllamaClient},
};
use cp_server::{
    api::{self, EDUCATIONAL_WARNING},
    config::{Overrides, ServerConfig},
    logging, metrics,
};
use pico_args::Arguments;
use tracing::{info, warn};

const HELP: &str = "\
Run the casino simulator and predictor HTTP server

USAGE:
  cp_server [OPTIONS]

OPTIONS:
  --bind          IP:PORT  Server socket bind address   [default: env SERVER_BIND or 127.0.0.1:5000]
  --window        N        Prediction window size       [default: env PREDICTION_WINDOW or 100]
  --ollama-url    URL      Ollama server root           [default: env OLLAMA_URL or http://localhost:11434]
  --model         NAME     Ollama model                 [default: env OLLAMA_MODEL or gemma3:4b]
  --metrics-bind  IP:PORT  Prometheus exporter address  [default: env METRICS_BIND, disabled when unset]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  CHAT_TIMEOUT_SECS        Completion request timeout in seconds [default: 60]
  RUST_LOG                 Log filter [default: info,hyper=warn,reqwest=warn]
  (A .env file in the working directory is loaded first)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let overrides = Overrides {
        bind: pargs.opt_value_from_str("--bind")?,
        prediction_window: pargs.opt_value_from_str("--window")?,
        ollama_url: pargs.opt_value_from_str("--ollama-url")?,
        model: pargs.opt_value_from_str("--model")?,
        metrics_bind: pargs.opt_value_from_str::<_, SocketAddr>("--metrics-bind")?,
    };

    logging::init();

    let config = ServerConfig::from_env(overrides).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    warn!("{}", EDUCATIONAL_WARNING);

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus metrics exported at http://{}/metrics", addr);
    }

    let casino = Arc::new(Casino::new(CasinoConfig {
        prediction_window: config.prediction_window,
    }));
    for (game, stats) in casino.stats() {
        info!("{}: {} table(s) {:?}", game, stats.tables.len(), stats.tables);
    }

    let client = OllamaClient::new(config.chat.to_chat_config());
    let assistant = Arc::new(ChatAssistant::new(Arc::new(client)));

    let status = assistant.check_connection().await;
    if status.available {
        info!("{}", status.message);
    } else {
        warn!("{}", status.message);
        warn!(
            "Chat answers will report the backend as unavailable until `ollama serve` runs and `ollama pull {}` completes",
            config.chat.model
        );
    }

    let app = api::create_router(api::AppState { casino, assistant });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
}
