//! ntfy push notification adapter
//!
//! Publishes plain-text messages to `<server>/<topic>`; the title travels in
//! the `Title` header as ntfy expects.

use crate::error::{AppError, Result};
use crate::ports::notifier::NotifierPort;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const NTFY_DEFAULT_SERVER: &str = "https://ntfy.sh";

/// ntfy notifier implementation
pub struct NtfyNotifier {
    client: Client,
    server: String,
    topic: String,
}

impl NtfyNotifier {
    /// Create a notifier publishing to `topic` on `server`
    pub fn new(server: &str, topic: &str) -> Result<Self> {
        let topic = topic.trim().trim_matches('/');
        if topic.is_empty() {
            return Err(AppError::Config("ntfy topic must not be empty".to_string()));
        }

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            client,
            server: server.trim_end_matches('/').to_string(),
            topic: topic.to_string(),
        })
    }

    pub fn topic_url(&self) -> String {
        format!("{}/{}", self.server, self.topic)
    }
}

#[async_trait]
impl NotifierPort for NtfyNotifier {
    async fn notify(&self, title: &str, message: &str) -> Result<()> {
        let response = self
            .client
            .post(self.topic_url())
            .header("Title", title)
            .header("Tags", "memo")
            .body(message.to_string())
            .send()
            .await
            .map_err(|e| {
                AppError::Notification(format!("ntfy request failed: {}", e.without_url()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Notification(format!(
                "ntfy returned {}: {}",
                status, error_text
            )));
        }

        log::debug!("Sent ntfy notification to topic {}", self.topic);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, routing::post, Router};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_topic_url() {
        let notifier = NtfyNotifier::new("https://ntfy.example.com/", "/team-tasks/").unwrap();
        assert_eq!(notifier.topic_url(), "https://ntfy.example.com/team-tasks");
    }

    #[test]
    fn test_empty_topic_rejected() {
        assert!(matches!(
            NtfyNotifier::new(NTFY_DEFAULT_SERVER, "  "),
            Err(AppError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_publishes_title_and_body() {
        let received: Arc<Mutex<Option<(String, String)>>> = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&received);

        let app = Router::new().route(
            "/tasks",
            post(move |headers: HeaderMap, body: String| {
                let sink = Arc::clone(&sink);
                async move {
                    let title = headers
                        .get("Title")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    *sink.lock().unwrap() = Some((title, body));
                    "ok"
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let notifier = NtfyNotifier::new(&format!("http://{}", addr), "tasks").unwrap();
        notifier
            .notify("New meeting processed", "2 tasks extracted from Sync")
            .await
            .unwrap();

        let (title, body) = received.lock().unwrap().clone().unwrap();
        assert_eq!(title, "New meeting processed");
        assert_eq!(body, "2 tasks extracted from Sync");
    }
}
