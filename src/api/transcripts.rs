//! Transcript ingestion and read endpoints
//!
//! POST turns a transcript into a meeting plus tasks via the LLM; GET returns
//! everything stored.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::json_body;
use crate::domain::{parse_extraction, Glossary, Meeting, PromptTemplates, Task, TranscriptMetadata};
use crate::error::{AppError, Result};
use crate::ports::NotifierPort;
use crate::AppState;

/// Request to ingest a transcript
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    pub transcript: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub note_id: Option<String>,
}

/// Records created by one ingestion
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub success: bool,
    pub meeting: Meeting,
    pub tasks: Vec<Task>,
    pub message: String,
}

/// Everything in the store
#[derive(Debug, Serialize)]
pub struct TranscriptsResponse {
    pub meetings: Vec<Meeting>,
    pub tasks: Vec<Task>,
}

/// Extra prompt context: caller metadata and known participant spellings
fn prompt_context(request: &IngestRequest, glossary: &Glossary) -> String {
    let mut lines = Vec::new();
    if let Some(title) = request.title.as_deref().filter(|t| !t.trim().is_empty()) {
        lines.push(format!("Meeting title: {}", title.trim()));
    }
    if let Some(date) = request.date.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push(format!("Meeting date: {}", date.trim()));
    }
    if !glossary.is_empty() {
        lines.push(format!(
            "Known participants (use these exact spellings for owners): {}",
            glossary.canonical_names().join(", ")
        ));
    }
    lines.join("\n")
}

/// Run one transcript through extraction and store the result
///
/// The store is untouched unless every step before the write succeeds.
pub async fn process_transcript(
    state: &AppState,
    request: IngestRequest,
) -> Result<(Meeting, Vec<Task>)> {
    let transcript = request
        .transcript
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::InvalidInput("transcript is required".to_string()))?
        .to_string();

    let glossary = Glossary::new(state.storage.get_glossary().await?)?;
    let prompt = PromptTemplates::render_extraction(&transcript, &prompt_context(&request, &glossary));

    log::info!(
        "Extracting tasks from transcript ({} characters) with {}",
        transcript.len(),
        state.llm.provider_name()
    );
    let raw = state.llm.generate(&prompt, &state.llm_config).await?;
    let extraction = parse_extraction(&raw)?;

    let metadata = TranscriptMetadata {
        title: request.title,
        date: request.date,
        note_id: request.note_id,
    };
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let (meeting, tasks) = extraction.into_records(&metadata, &glossary, &today);

    state.storage.save_extraction(&meeting, &tasks).await
}

/// Fire-and-forget push; failures only reach the log
fn spawn_notification(notifier: Arc<dyn NotifierPort>, meeting: &Meeting, task_count: usize) {
    let message = format!("{} tasks extracted from {}", task_count, meeting.title);
    tokio::spawn(async move {
        if let Err(e) = notifier.notify("New meeting processed", &message).await {
            log::warn!("Failed to send notification: {}", e);
        }
    });
}

/// POST /api/transcripts
pub async fn ingest_transcript(
    State(state): State<AppState>,
    payload: std::result::Result<Json<IngestRequest>, JsonRejection>,
) -> Result<Json<IngestResponse>> {
    let request = json_body(payload)?;

    let (meeting, tasks) = process_transcript(&state, request).await.map_err(|e| {
        log::error!("Transcript ingestion failed: {}", e);
        e
    })?;

    log::info!(
        "Stored meeting {:?} with {} tasks",
        meeting.id,
        tasks.len()
    );

    if let Some(notifier) = &state.notifier {
        spawn_notification(Arc::clone(notifier), &meeting, tasks.len());
    }

    let message = format!("Extracted {} tasks from \"{}\"", tasks.len(), meeting.title);
    Ok(Json(IngestResponse {
        success: true,
        meeting,
        tasks,
        message,
    }))
}

/// GET /api/transcripts
pub async fn list_transcripts(State(state): State<AppState>) -> Result<Json<TranscriptsResponse>> {
    let meetings = state.storage.list_meetings().await?;
    let tasks = state.storage.list_tasks().await?;

    Ok(Json(TranscriptsResponse { meetings, tasks }))
}
