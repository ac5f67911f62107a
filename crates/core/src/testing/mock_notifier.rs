//! Mock notifier for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::notifier::{Notifier, NotifyError};

/// Mock implementation of the Notifier trait.
///
/// Records every delivered message. Clones share their state.
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    /// Delivered messages.
    messages: Arc<RwLock<Vec<String>>>,
    /// Whether deliveries fail.
    fail: Arc<RwLock<bool>>,
    /// Simulated delivery latency.
    delay: Option<Duration>,
}

impl MockNotifier {
    /// Create a new mock notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every delivery by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get all delivered messages.
    pub async fn messages(&self) -> Vec<String> {
        self.messages.read().await.clone()
    }

    /// Make deliveries fail or succeed.
    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if *self.fail.read().await {
            return Err(NotifyError::Request("mock failure".to_string()));
        }
        self.messages.write().await.push(message.to_string());
        Ok(())
    }
}
