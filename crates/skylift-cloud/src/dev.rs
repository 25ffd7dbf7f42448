//! In-process implementations of the cloud seams.
//!
//! Used by tests and `--dev` runs. State lives in process memory and is
//! discarded on exit; nothing here retries or persists.

use std::sync::Mutex;

use chrono::Utc;
use dashmap::DashMap;
use tracing::info;

use crate::error::CloudError;
use crate::instance::{InstanceService, InstanceState, LaunchSpec, WorkerInstance};
use crate::mailer::{Mailer, OutboundMail};
use crate::storage::ObjectStore;

/// In-memory instance registry.
#[derive(Default)]
pub struct DevInstanceService {
    instances: DashMap<String, WorkerInstance>,
    /// Client token to instance id, for idempotent launches.
    tokens: DashMap<String, String>,
}

impl DevInstanceService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl InstanceService for DevInstanceService {
    async fn launch(&self, spec: LaunchSpec) -> Result<WorkerInstance, CloudError> {
        if let Some(existing_id) = self.tokens.get(&spec.client_token) {
            if let Some(instance) = self.instances.get(existing_id.value()) {
                return Ok(instance.clone());
            }
        }

        if spec.image_id.is_empty() {
            return Err(CloudError::LaunchFailed("image id is empty".to_string()));
        }

        let id = format!("i-{}", &uuid::Uuid::new_v4().simple().to_string()[..12]);
        let instance = WorkerInstance {
            id: id.clone(),
            state: InstanceState::Running,
            public_dns: format!("{id}.workers.dev.internal"),
            owner: spec.owner,
            name: spec.name,
            app_tag: spec.app_tag,
            launched_at: Utc::now(),
        };

        info!(instance_id = %id, owner = %instance.owner, "launched dev worker instance");
        self.tokens.insert(spec.client_token, id.clone());
        self.instances.insert(id, instance.clone());
        Ok(instance)
    }

    async fn describe(&self, instance_id: &str) -> Result<Option<WorkerInstance>, CloudError> {
        Ok(self.instances.get(instance_id).map(|i| i.clone()))
    }

    async fn terminate(&self, instance_id: &str) -> Result<WorkerInstance, CloudError> {
        let mut instance = self
            .instances
            .get_mut(instance_id)
            .ok_or_else(|| CloudError::InstanceNotFound(instance_id.to_string()))?;

        instance.state = InstanceState::ShuttingDown;
        info!(instance_id = %instance_id, "terminated dev worker instance");
        Ok(instance.clone())
    }
}

/// In-memory object store for one bucket.
pub struct DevObjectStore {
    bucket: String,
    objects: DashMap<String, Vec<u8>>,
}

impl DevObjectStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: DashMap::new(),
        }
    }

    /// Read an object back, for tests.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.get(key).map(|o| o.clone())
    }
}

#[async_trait::async_trait]
impl ObjectStore for DevObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), CloudError> {
        info!(bucket = %self.bucket, key = %key, bytes = body.len(), "stored object");
        self.objects.insert(key.to_string(), body);
        Ok(())
    }
}

/// Mailer that records messages and logs them instead of sending.
pub struct DevMailer {
    source: String,
    sent: Mutex<Vec<OutboundMail>>,
}

impl DevMailer {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Messages recorded so far, for tests.
    pub fn sent(&self) -> Vec<OutboundMail> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }
}

#[async_trait::async_trait]
impl Mailer for DevMailer {
    fn source(&self) -> &str {
        &self.source
    }

    async fn send(&self, mail: OutboundMail) -> Result<(), CloudError> {
        info!(to = %mail.to, subject = %mail.subject, "recorded outbound mail");
        self.sent.lock().expect("mailer lock poisoned").push(mail);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch_spec(token: &str) -> LaunchSpec {
        LaunchSpec {
            image_id: "ami-ace67f9c".to_string(),
            instance_type: "m1.xlarge".to_string(),
            security_groups: vec!["workers".to_string()],
            profile: "worker-profile".to_string(),
            boot_script: "#!/bin/bash\n".to_string(),
            client_token: token.to_string(),
            owner: "user@example.com".to_string(),
            name: "my-worker".to_string(),
            app_tag: "skylift-worker".to_string(),
        }
    }

    #[tokio::test]
    async fn test_launch_describe_terminate() {
        let service = DevInstanceService::new();

        let instance = service.launch(launch_spec("tok-1")).await.unwrap();
        assert_eq!(instance.state, InstanceState::Running);
        assert!(instance.id.starts_with("i-"));

        let described = service.describe(&instance.id).await.unwrap().unwrap();
        assert_eq!(described.owner, "user@example.com");

        let terminated = service.terminate(&instance.id).await.unwrap();
        assert_eq!(terminated.state, InstanceState::ShuttingDown);

        let described = service.describe(&instance.id).await.unwrap().unwrap();
        assert_eq!(described.state, InstanceState::ShuttingDown);
    }

    #[tokio::test]
    async fn test_launch_is_idempotent_per_token() {
        let service = DevInstanceService::new();

        let first = service.launch(launch_spec("tok-same")).await.unwrap();
        let second = service.launch(launch_spec("tok-same")).await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_describe_unknown_instance() {
        let service = DevInstanceService::new();
        assert!(service.describe("i-missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_terminate_unknown_instance_errors() {
        let service = DevInstanceService::new();
        let err = service.terminate("i-missing").await.unwrap_err();
        assert!(matches!(err, CloudError::InstanceNotFound(_)));
    }

    #[tokio::test]
    async fn test_object_store_roundtrip() {
        let store = DevObjectStore::new("skylift-temporary");
        store.put("keys/tok.pub", b"ssh-rsa AAAAB3...".to_vec()).await.unwrap();

        assert_eq!(store.bucket(), "skylift-temporary");
        assert_eq!(store.get("keys/tok.pub").unwrap(), b"ssh-rsa AAAAB3...");
    }

    #[tokio::test]
    async fn test_mailer_records_messages() {
        let mailer = DevMailer::new("skylift@example.com");
        mailer
            .send(OutboundMail {
                to: "user@example.com".to_string(),
                subject: "worker launched".to_string(),
                body: "<p>launched</p>".to_string(),
            })
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "user@example.com");
        assert_eq!(mailer.source(), "skylift@example.com");
    }
}
