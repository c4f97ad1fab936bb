//! Vendor integrations for dream analysis and imagery
//!
//! Each external API sits behind a small trait so handlers never know which
//! vendor (or which test double) they are talking to.

pub mod deepseek;
pub mod fouro;
pub mod mock;
pub mod unsplash;

pub use deepseek::DeepSeekChatClient;
pub use fouro::FourOImageClient;
pub use mock::{MockChatClient, MockImageClient, MockStockPhotoClient};
pub use unsplash::UnsplashClient;

use crate::models::Language;
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::Retry;
use tracing::warn;

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Five-point interpretation of `dream`, written in `language`.
    async fn analyze_dream(&self, dream: &str, language: Language) -> Result<String>;
}

/// What a single pass over the image vendor's query routes observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Ready(String),
    Pending(String),
    Failed,
    /// No query route gave a recognizable answer.
    Unreachable,
}

#[async_trait]
pub trait VendorImageClient: Send + Sync {
    /// Starts an asynchronous job and returns the vendor-assigned task id.
    async fn submit(&self, prompt: &str, callback_url: Option<&str>) -> Result<String>;
    async fn poll(&self, task_id: &str) -> Result<PollOutcome>;
}

#[async_trait]
pub trait StockPhotoService: Send + Sync {
    async fn search(&self, query: &str) -> Result<Option<String>>;
}

/// Polls until the task is ready or failed, with a fixed delay and at most
/// `attempts` passes. Returns the last outcome seen.
pub async fn wait_for_image(
    client: &dyn VendorImageClient,
    task_id: &str,
    attempts: usize,
    interval: Duration,
) -> PollOutcome {
    let strategy = FixedInterval::new(interval).take(attempts.saturating_sub(1));

    let result = Retry::spawn(strategy, move || async move {
        match client.poll(task_id).await {
            Ok(outcome @ (PollOutcome::Ready(_) | PollOutcome::Failed)) => Ok(outcome),
            Ok(outcome) => Err(outcome),
            Err(e) => {
                warn!("Polling task {} failed: {}", task_id, e);
                Err(PollOutcome::Unreachable)
            }
        }
    })
    .await;

    match result {
        Ok(outcome) | Err(outcome) => outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_for_image_stops_when_ready() {
        let client = MockImageClient::new()
            .with_poll_outcome(PollOutcome::Pending("processing".to_string()))
            .with_poll_outcome(PollOutcome::Unreachable)
            .with_poll_outcome(PollOutcome::Ready("https://img/done.png".to_string()));

        let outcome = wait_for_image(&client, "t", 30, Duration::from_millis(1)).await;
        assert_eq!(outcome, PollOutcome::Ready("https://img/done.png".to_string()));
        assert_eq!(client.get_poll_count(), 3);
    }

    #[tokio::test]
    async fn test_wait_for_image_gives_up_after_attempts() {
        let client =
            MockImageClient::new().with_poll_outcome(PollOutcome::Pending("queued".to_string()));

        let outcome = wait_for_image(&client, "t", 4, Duration::from_millis(1)).await;
        assert_eq!(outcome, PollOutcome::Pending("queued".to_string()));
        assert_eq!(client.get_poll_count(), 4);
    }

    #[tokio::test]
    async fn test_wait_for_image_stops_on_failure() {
        let client = MockImageClient::new().with_poll_outcome(PollOutcome::Failed);

        let outcome = wait_for_image(&client, "t", 10, Duration::from_millis(1)).await;
        assert_eq!(outcome, PollOutcome::Failed);
        assert_eq!(client.get_poll_count(), 1);
    }
}
