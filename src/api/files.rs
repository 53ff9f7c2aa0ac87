//! Transcript file parsing endpoint
//!
//! Clients upload an exported transcript file here first, then send the
//! returned text to the ingestion endpoint.

use axum::extract::Query;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::{parse_transcript_file, TranscriptFormat};

#[derive(Debug, Deserialize)]
pub struct ParseFileQuery {
    pub filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ParseFileResponse {
    pub transcript: String,
    pub format: TranscriptFormat,
}

/// POST /api/parse-file?filename=<name>
///
/// The body is the raw file text.
pub async fn parse_file(
    Query(query): Query<ParseFileQuery>,
    body: String,
) -> Result<Json<ParseFileResponse>> {
    let Some(filename) = query.filename.as_deref().map(str::trim).filter(|f| !f.is_empty()) else {
        log::error!("File parse rejected: no filename given");
        return Err(AppError::InvalidInput(
            "filename query parameter is required".to_string(),
        ));
    };

    let (transcript, format) = parse_transcript_file(filename, &body).map_err(|e| {
        log::error!("Failed to parse {}: {}", filename, e);
        e
    })?;
    log::info!("Parsed {} as {} ({} characters)", filename, format, transcript.len());

    Ok(Json(ParseFileResponse { transcript, format }))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{send, test_state};
    use crate::ports::llm::MockLlmServicePort;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};

    fn upload(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "text/plain")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_parse_srt_upload() {
        let state = test_state(MockLlmServicePort::new());
        let (status, body) = send(
            &state,
            upload(
                "/api/parse-file?filename=call.srt",
                "1\n00:00:01,000 --> 00:00:02,000\nAna: ship it\n",
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transcript"], "Ana: ship it");
        assert_eq!(body["format"], "srt");
    }

    #[tokio::test]
    async fn test_missing_filename_and_bad_type_are_400() {
        let state = test_state(MockLlmServicePort::new());

        let (status, _) = send(&state, upload("/api/parse-file", "hello")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&state, upload("/api/parse-file?filename=deck.pdf", "%PDF")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Unsupported"));
    }
}
