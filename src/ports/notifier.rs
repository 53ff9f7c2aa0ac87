/// Push notification port trait
///
/// Implementation: ntfy.
use crate::error::Result;
use async_trait::async_trait;

/// Port trait for push notifications
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotifierPort: Send + Sync {
    /// Send a short notification
    async fn notify(&self, title: &str, message: &str) -> Result<()>;
}
