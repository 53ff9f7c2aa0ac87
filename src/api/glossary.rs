//! Participant glossary endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::api::json_body;
use crate::domain::{Glossary, GlossaryEntry};
use crate::error::Result;
use crate::AppState;

/// GET /api/glossary
pub async fn get_glossary(State(state): State<AppState>) -> Result<Json<Vec<GlossaryEntry>>> {
    Ok(Json(state.storage.get_glossary().await?))
}

/// PUT /api/glossary
///
/// Replaces the whole list; returns the entries as stored (trimmed).
pub async fn replace_glossary(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Vec<GlossaryEntry>>, JsonRejection>,
) -> Result<Json<Vec<GlossaryEntry>>> {
    let glossary = json_body(payload).and_then(Glossary::new).map_err(|e| {
        log::error!("Rejected glossary update: {}", e);
        e
    })?;

    state.storage.save_glossary(glossary.entries()).await.map_err(|e| {
        log::error!("Failed to save glossary: {}", e);
        e
    })?;
    log::info!("Glossary replaced with {} entries", glossary.entries().len());

    Ok(Json(glossary.entries().to_vec()))
}
