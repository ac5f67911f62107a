//! Notifier module for reporting finished conversions.
//!
//! Each completed request produces one summary line that is handed to a
//! [`Notifier`]. Delivery runs on its own task ([`spawn_notification`]) so a
//! slow endpoint never holds up the next conversion.

mod error;
mod task;
mod telegram;

use async_trait::async_trait;

pub use error::NotifyError;
pub use task::{spawn_notification, NotificationTask};
pub use telegram::{TelegramNotifier, TELEGRAM_API_BASE};

/// A sink for conversion summaries.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns the name of this notifier implementation.
    fn name(&self) -> &str;

    /// Delivers one message.
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;
}
