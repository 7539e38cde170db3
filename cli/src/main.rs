//! CLI entrypoint for chat-relay
//!
//! This is the main binary that wires together all layers using
//! dependency injection and serves the HTTP API.

use anyhow::{Context, Result};
use clap::Parser;
use relay_application::{ChatUseCase, ConversationLogger, ManageSessionUseCase};
use relay_infrastructure::{
    ConfigLoader, FileConfig, InMemorySessionStore, JsonlConversationLogger,
    OpenAiCompatibleProvider,
};
use relay_presentation::{AppState, Cli, RouterOptions, build_router};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    apply_cli_overrides(&cli, &mut config);

    if cli.print_config {
        print!("{}", config.to_redacted_toml()?);
        return Ok(());
    }

    config.validate().context("Invalid configuration")?;

    // === Logging ===
    let _log_guard = init_logging(&cli, config.logging.log_file.as_deref())?;

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }
    info!("chat-relay v{}", env!("CARGO_PKG_VERSION"));

    // === Dependency Injection ===
    let store = Arc::new(InMemorySessionStore::new());
    let provider = Arc::new(
        OpenAiCompatibleProvider::new(
            &config.llm.base_url,
            config.llm.api_key().unwrap_or_default(),
            &config.llm.model,
        )
        .with_max_tokens(config.llm.max_tokens),
    );

    let shutdown = CancellationToken::new();
    let mut chat = ChatUseCase::new(store.clone(), provider, config.to_chat_params())
        .with_cancellation(shutdown.clone());

    if let Some(path) = &config.logging.conversation_log {
        match JsonlConversationLogger::new(path) {
            Some(logger) => {
                info!("Conversation log: {}", logger.path().display());
                let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
                chat = chat.with_conversation_logger(logger);
            }
            None => warn!("Conversation log disabled"),
        }
    }

    let state = AppState::new(chat, ManageSessionUseCase::new(store));
    let mut options = RouterOptions::default().with_max_body_bytes(config.server.max_body_bytes);
    if let Some(dir) = &config.server.static_dir {
        if dir.is_dir() {
            info!("Serving static files from {}", dir.display());
            options = options.with_static_dir(dir);
        } else {
            warn!("Static directory {} does not exist, serving API only", dir.display());
        }
    }
    let router = build_router(state, options);

    // === Serve ===
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        model = %config.llm.model,
        base_url = %config.llm.base_url,
        "Listening on {}",
        addr
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Server stopped");
    Ok(())
}

fn apply_cli_overrides(cli: &Cli, config: &mut FileConfig) {
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(dir) = &cli.static_dir {
        config.server.static_dir = Some(dir.clone());
    }
}

/// Stderr output plus an optional daily-rolling file.
///
/// `RUST_LOG` wins over the `-v` / `-q` flags.
fn init_logging(cli: &Cli, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    let stderr = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let Some(path) = log_file else {
        tracing_subscriber::registry().with(filter).with(stderr).init();
        return Ok(None);
    };

    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", path.display()))?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(directory, file_name));
    let file = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(file)
        .init();
    Ok(Some(guard))
}

/// Resolve on Ctrl-C (or SIGTERM on unix) and cancel in-flight provider calls.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown requested");
    token.cancel();
}
