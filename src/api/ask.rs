//! "Ask AI" assistant over stored meetings and tasks

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::json_body;
use crate::domain::PromptTemplates;
use crate::error::{AppError, Result};
use crate::AppState;

/// Older turns beyond this are dropped from the prompt
const MAX_HISTORY: usize = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

fn render_history(history: &[ChatMessage]) -> String {
    let start = history.len().saturating_sub(MAX_HISTORY);
    let lines: Vec<String> = history[start..]
        .iter()
        .map(|m| {
            let speaker = match m.role {
                ChatRole::User => "User",
                ChatRole::Assistant => "Assistant",
            };
            format!("{}: {}", speaker, m.content.trim())
        })
        .collect();

    if lines.is_empty() {
        "(none)".to_string()
    } else {
        lines.join("\n")
    }
}

/// POST /api/ask
pub async fn ask(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>> {
    let request = json_body(payload)?;
    let question = request
        .question
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::InvalidInput("question is required".to_string()))?;

    let data = json!({
        "meetings": state.storage.list_meetings().await?,
        "tasks": state.storage.list_tasks().await?,
    });
    let prompt = PromptTemplates::render_ask(
        &serde_json::to_string_pretty(&data)?,
        &render_history(&request.history),
        question,
    );

    let answer = state
        .llm
        .generate(&prompt, &state.llm_config)
        .await
        .map_err(|e| {
            log::error!("Ask AI failed: {}", e);
            e
        })?;

    Ok(Json(AskResponse {
        answer: answer.trim().to_string(),
    }))
}
