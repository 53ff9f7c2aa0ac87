//! Shared helpers for handler tests

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::adapters::storage::MemoryStorage;
use crate::ports::llm::{LlmConfig, MockLlmServicePort};
use crate::{build_router, AppState};

/// Model reply used by most ingestion tests: fenced, two tasks, one owner alias
pub const EXTRACTION_JSON: &str = r#"```json
{
  "meeting": {
    "title": "Release sync",
    "date": "2024-05-02",
    "duration": "25 minutes",
    "participants": ["Ana", "Bob"],
    "summary": "Agreed on the release plan."
  },
  "tasks": [
    {"description": "Ship the build", "owner": "Ana", "dueDate": "2024-05-03",
     "type": "action", "priority": "high"},
    {"description": "Confirm numbers with finance", "owner": "bob", "type": "follow-up",
     "priority": "medium", "followUpWith": "Finance"}
  ]
}
```"#;

pub fn test_state(llm: MockLlmServicePort) -> AppState {
    AppState::new(
        Arc::new(MemoryStorage::new()),
        Arc::new(llm),
        LlmConfig::default(),
    )
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Run one request through a fresh router; non-JSON bodies come back as Null
pub async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
    let response = build_router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
