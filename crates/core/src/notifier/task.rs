//! Background delivery of notifications.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{Notifier, NotifyError};

/// A notification being delivered on its own task.
pub struct NotificationTask {
    notifier: String,
    handle: JoinHandle<Result<(), NotifyError>>,
}

/// Starts delivering `message` without waiting for it.
pub fn spawn_notification(notifier: Arc<dyn Notifier>, message: String) -> NotificationTask {
    let name = notifier.name().to_string();
    let handle = tokio::spawn(async move { notifier.notify(&message).await });
    NotificationTask {
        notifier: name,
        handle,
    }
}

impl NotificationTask {
    /// Waits up to `timeout` for delivery. Failures are logged, never returned.
    ///
    /// Returns whether the notification was delivered.
    pub async fn wait(self, timeout: Duration) -> bool {
        let mut handle = self.handle;
        match tokio::time::timeout(timeout, &mut handle).await {
            Ok(Ok(Ok(()))) => {
                info!("Notification delivered via {}", self.notifier);
                true
            }
            Ok(Ok(Err(e))) => {
                warn!("Notification via {} failed: {}", self.notifier, e);
                false
            }
            Ok(Err(e)) => {
                warn!("Notification task via {} panicked: {}", self.notifier, e);
                false
            }
            Err(_) => {
                handle.abort();
                warn!(
                    "Notification via {} still pending after {:?}, giving up",
                    self.notifier, timeout
                );
                false
            }
        }
    }
}
