//! Cloud seam errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CloudError {
    /// No instance with the given id.
    #[error("No such instance: {0}")]
    InstanceNotFound(String),

    /// Instance launch was rejected or failed.
    #[error("Launch failed: {0}")]
    LaunchFailed(String),

    /// Object storage write failed.
    #[error("Storage failed for key {key}: {message}")]
    StorageFailed { key: String, message: String },

    /// Outbound email failed.
    #[error("Mail delivery failed: {0}")]
    MailFailed(String),
}
