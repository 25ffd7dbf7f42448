//! Object storage seam.

use async_trait::async_trait;

use crate::error::CloudError;

/// Write-only view of one bucket.
///
/// The console only ever uploads (SSH public keys, code archives); reads
/// happen on the workers themselves.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// The bucket this store writes to.
    fn bucket(&self) -> &str;

    /// Store an object under `key`.
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), CloudError>;
}
