//! Outbound email seam.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CloudError;

/// One outbound message.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMail {
    pub to: String,
    pub subject: String,
    /// HTML body.
    pub body: String,
}

/// Email dispatch.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// The verified sender address.
    fn source(&self) -> &str;

    /// Send one HTML message.
    async fn send(&self, mail: OutboundMail) -> Result<(), CloudError>;
}
