//! Task board updates
//!
//! Moves tasks between columns and edits their details.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::api::json_body;
use crate::domain::{Glossary, Task, TaskUpdate};
use crate::error::{AppError, Result};
use crate::AppState;

/// PATCH /api/tasks/:id
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: std::result::Result<Json<TaskUpdate>, JsonRejection>,
) -> Result<Json<Task>> {
    let task = apply_update(&state, id, payload).await.map_err(|e| {
        log::error!("Task {} update failed: {}", id, e);
        e
    })?;
    log::info!("Updated task {} (status: {})", id, task.status);

    Ok(Json(task))
}

async fn apply_update(
    state: &AppState,
    id: i64,
    payload: std::result::Result<Json<TaskUpdate>, JsonRejection>,
) -> Result<Task> {
    let mut update = json_body(payload)?;
    if update.is_empty() {
        return Err(AppError::InvalidInput("no fields to update".to_string()));
    }

    if let Some(owner) = update.owner.as_deref() {
        if owner.trim().is_empty() {
            return Err(AppError::InvalidInput("owner must not be empty".to_string()));
        }
        let glossary = Glossary::new(state.storage.get_glossary().await?)?;
        update.owner = Some(glossary.resolve(owner));
    }

    state.storage.update_task(id, &update).await
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{json_request, send, test_state};
    use crate::domain::{GlossaryEntry, Meeting, Task};
    use crate::ports::llm::MockLlmServicePort;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn seeded_state() -> (crate::AppState, i64) {
        let state = test_state(MockLlmServicePort::new());
        let (_, tasks) = state
            .storage
            .save_extraction(
                &Meeting::new("Planning".to_string(), "2024-01-01".to_string()),
                &[Task::new("Write rollout plan".to_string(), "Ana".to_string())],
            )
            .await
            .unwrap();
        (state, tasks[0].id.unwrap())
    }

    #[tokio::test]
    async fn test_move_task_to_done() {
        let (state, id) = seeded_state().await;
        let (status, body) = send(
            &state,
            json_request("PATCH", &format!("/api/tasks/{}", id), json!({ "status": "done" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "done");
        assert_eq!(body["description"], "Write rollout plan");
    }

    #[tokio::test]
    async fn test_owner_goes_through_glossary() {
        let (state, id) = seeded_state().await;
        state
            .storage
            .save_glossary(&[GlossaryEntry {
                canonical: "Robert".to_string(),
                aliases: vec!["Bob".to_string()],
            }])
            .await
            .unwrap();

        let (status, body) = send(
            &state,
            json_request("PATCH", &format!("/api/tasks/{}", id), json!({ "owner": "bob" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["owner"], "Robert");
    }

    #[tokio::test]
    async fn test_unknown_task_is_404() {
        let (state, _) = seeded_state().await;
        let (status, _) = send(
            &state,
            json_request("PATCH", "/api/tasks/9999", json!({ "priority": "low" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_updates_are_400() {
        let (state, id) = seeded_state().await;
        let uri = format!("/api/tasks/{}", id);

        for body in [json!({ "status": "archived" }), json!({}), json!({ "owner": " " })] {
            let (status, _) = send(&state, json_request("PATCH", &uri, body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }
}
