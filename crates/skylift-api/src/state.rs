//! Application state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use axum::http::HeaderMap;

use skylift_cloud::dev::{DevInstanceService, DevMailer, DevObjectStore};
use skylift_cloud::{InstanceService, Mailer, ObjectStore};
use skylift_config::Config;

use crate::error::ApiError;

/// Header set by the authenticating proxy in front of the console.
pub const FORWARDED_EMAIL_HEADER: &str = "x-forwarded-email";

/// Application state shared across handlers.
///
/// Every cloud collaborator is injected here at startup; handlers never
/// construct or look up clients themselves.
pub struct AppState {
    pub config: Config,
    pub instances: Arc<dyn InstanceService>,
    pub store: Arc<dyn ObjectStore>,
    pub mailer: Arc<dyn Mailer>,
    start_time: Instant,
    request_count: AtomicU64,
}

impl AppState {
    pub fn new(
        config: Config,
        instances: Arc<dyn InstanceService>,
        store: Arc<dyn ObjectStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config,
            instances,
            store,
            mailer,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    /// State backed by the in-process dev collaborators.
    pub fn dev(config: Config) -> Self {
        let store = Arc::new(DevObjectStore::new(config.cloud.temporary_bucket.clone()));
        let mailer = Arc::new(DevMailer::new(config.email.source.clone()));
        Self::new(config, Arc::new(DevInstanceService::new()), store, mailer)
    }

    /// Get uptime.
    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// Get request count.
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Count one inbound request.
    pub fn record_request(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }
}

/// Identity of the requester, from the auth proxy header.
pub fn require_user(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(FORWARDED_EMAIL_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .ok_or(ApiError::Unauthorized)
}
