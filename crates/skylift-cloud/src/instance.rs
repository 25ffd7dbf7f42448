//! Worker instance model and lifecycle seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CloudError;

/// Lifecycle state of a worker instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstanceState {
    Pending,
    Running,
    ShuttingDown,
    Terminated,
}

impl InstanceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
        }
    }
}

/// A short-lived analysis worker machine.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerInstance {
    pub id: String,
    pub state: InstanceState,
    pub public_dns: String,
    /// Email of the user who launched the instance. Monitor and terminate
    /// requests are only honored for the owner.
    pub owner: String,
    pub name: String,
    pub app_tag: String,
    pub launched_at: DateTime<Utc>,
}

/// Everything needed to launch one worker.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    pub image_id: String,
    pub instance_type: String,
    pub security_groups: Vec<String>,
    pub profile: String,
    /// Cloud-init style script run on first boot.
    pub boot_script: String,
    /// Idempotency token supplied by the launch form.
    pub client_token: String,
    pub owner: String,
    pub name: String,
    pub app_tag: String,
}

/// Compute-instance lifecycle operations.
///
/// One launch per request; workers terminate themselves when their run
/// completes, so there is no reconciliation loop behind this trait.
#[async_trait]
pub trait InstanceService: Send + Sync {
    /// Launch a worker and tag it with owner, name, and application.
    async fn launch(&self, spec: LaunchSpec) -> Result<WorkerInstance, CloudError>;

    /// Look up an instance by id. `None` when the id is unknown.
    async fn describe(&self, instance_id: &str) -> Result<Option<WorkerInstance>, CloudError>;

    /// Terminate an instance and return its updated state.
    async fn terminate(&self, instance_id: &str) -> Result<WorkerInstance, CloudError>;
}
