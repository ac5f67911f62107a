//! Error types for notifications.

use thiserror::Error;

/// Errors from delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    /// The request did not complete.
    #[error("Notification request failed: {0}")]
    Request(String),

    /// The request timed out.
    #[error("Notification request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("Notification rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}
