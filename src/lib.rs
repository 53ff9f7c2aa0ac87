//! Transcript Tasks library
//!
//! HTTP service that turns meeting transcripts into action items via an LLM
//! and serves them to a kanban-style board.

use axum::{extract::DefaultBodyLimit, middleware, Router};
use std::collections::HashSet;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

use ports::{LlmConfig, LlmServicePort, NotifierPort, StoragePort};

/// Largest request body accepted (transcripts can be long)
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn StoragePort>,
    pub llm: Arc<dyn LlmServicePort>,
    pub llm_config: LlmConfig,
    /// Push notifications after ingestion; `None` disables them
    pub notifier: Option<Arc<dyn NotifierPort>>,
    /// Accepted session tokens; empty disables the auth gate
    pub session_tokens: Arc<HashSet<String>>,
}

impl AppState {
    /// Create new application state with auth and notifications off
    pub fn new(
        storage: Arc<dyn StoragePort>,
        llm: Arc<dyn LlmServicePort>,
        llm_config: LlmConfig,
    ) -> Self {
        Self {
            storage,
            llm,
            llm_config,
            notifier: None,
            session_tokens: Arc::new(HashSet::new()),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotifierPort>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_session_tokens(mut self, tokens: HashSet<String>) -> Self {
        self.session_tokens = Arc::new(tokens);
        self
    }
}

/// Build application router
///
/// Every route sits behind the session gate except the ones
/// [`api::auth::is_public_path`] lets through.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, patch, post};

    Router::new()
        .route(
            "/api/transcripts",
            get(api::list_transcripts).post(api::ingest_transcript),
        )
        .route("/api/tasks/:id", patch(api::update_task))
        .route(
            "/api/glossary",
            get(api::get_glossary).put(api::replace_glossary),
        )
        .route("/api/ask", post(api::ask))
        .route("/api/parse-file", post(api::parse_file))
        .route("/login", get(api::login_page))
        .merge(api::health_routes())
        .fallback(api::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
