//! HTTP API handlers

pub mod ask;
pub mod auth;
pub mod files;
pub mod glossary;
pub mod health;
pub mod tasks;
pub mod transcripts;

#[cfg(test)]
mod test_support;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::{AppError, Result};

pub use ask::ask;
pub use auth::{auth_middleware, login_page};
pub use files::parse_file;
pub use glossary::{get_glossary, replace_glossary};
pub use health::health_routes;
pub use tasks::update_task;
pub use transcripts::{ingest_transcript, list_transcripts};

/// Unwrap a JSON body, reporting malformed input as a 400
pub(crate) fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))
}

/// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::NotFound("route".to_string())
}
