//! transcript-tasks server binary
//!
//! Wires configuration, storage, the Gemini adapter and optional ntfy
//! notifications into the HTTP router.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use transcript_tasks::adapters::services::llm::GoogleService;
use transcript_tasks::adapters::services::notify::NtfyNotifier;
use transcript_tasks::adapters::storage::{MemoryStorage, SqliteStorage};
use transcript_tasks::config::Config;
use transcript_tasks::ports::StoragePort;
use transcript_tasks::{build_router, AppState};

/// Open the configured store
///
/// Sets up the SQLite database and runs migrations when a path is given.
fn initialize_storage(config: &Config) -> Result<Arc<dyn StoragePort>> {
    match &config.database {
        Some(db_path) => {
            if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }

            let storage = SqliteStorage::new(db_path.clone())?;
            storage.run_migrations()?;
            log::info!("Using SQLite storage at {}", db_path.display());
            Ok(Arc::new(storage))
        }
        None => {
            log::warn!("No database configured; meetings and tasks are lost on restart");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
    log::info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    config.validate()?;

    log::info!(
        "Starting transcript-tasks v{} (model: {})",
        env!("CARGO_PKG_VERSION"),
        config.model
    );

    let storage = initialize_storage(&config)?;
    let llm = GoogleService::new(config.gemini_api_key.clone(), config.llm_timeout())?;

    let mut state = AppState::new(storage, Arc::new(llm), config.llm_config());

    let tokens = config.session_token_set();
    if tokens.is_empty() {
        log::warn!("No session tokens configured; authentication is disabled");
    } else {
        log::info!("Session gate enabled with {} token(s)", tokens.len());
    }
    state = state.with_session_tokens(tokens);

    if let Some(topic) = &config.ntfy_topic {
        let notifier = NtfyNotifier::new(&config.ntfy_url, topic)?;
        log::info!("Push notifications enabled: {}", notifier.topic_url());
        state = state.with_notifier(Arc::new(notifier));
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    log::info!("Listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
