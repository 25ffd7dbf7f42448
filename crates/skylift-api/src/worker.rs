//! Worker instance handlers: launch, monitor, terminate.

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Form, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;
use tracing::info;

use skylift_cloud::{LaunchSpec, OutboundMail, WorkerInstance};
use skylift_schedule::{FieldError, ValidationErrors};

use crate::error::ApiError;
use crate::state::{AppState, require_user};

const SSH_KEY_PREFIX: &str = "ssh-rsa AAAAB3";

/// Instance status as shown on the monitor page.
#[derive(Debug, Serialize)]
pub struct MonitorResponse {
    pub instance_id: String,
    pub instance_state: String,
    pub public_dns: String,
    pub terminate_url: String,
}

/// Result of a terminate request.
#[derive(Debug, Serialize)]
pub struct KillResponse {
    pub instance_id: String,
    pub instance_state: String,
    pub public_dns: String,
    pub monitoring_url: String,
}

#[derive(Debug, Serialize)]
struct WorkerErrorsResponse {
    errors: ValidationErrors,
}

/// `POST /worker/new`.
///
/// Validates the launch form, stores the SSH public key, launches a tagged
/// instance, emails the requester a monitoring link, and redirects to the
/// monitor page.
pub async fn spawn_worker_instance(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let user = require_user(&headers)?;

    let mut errors = ValidationErrors::default();
    for field in ["name", "token"] {
        if form.get(field).map(|v| v.trim().is_empty()).unwrap_or(true) {
            errors.insert(FieldError::new(field, "This field is required"));
        }
    }

    let public_key = form.get("public-ssh-key").map(|v| v.trim()).unwrap_or_default();
    if public_key.is_empty() {
        errors.insert(FieldError::new("public-ssh-key", "Public key file is required"));
    } else if !public_key.starts_with(SSH_KEY_PREFIX) {
        errors.insert(FieldError::new(
            "public-ssh-key",
            "Supplied file does not appear to be a valid OpenSSH public key.",
        ));
    }

    if !errors.is_empty() {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(WorkerErrorsResponse { errors }),
        )
            .into_response());
    }

    let name = form.get("name").cloned().unwrap_or_default();
    let token = form.get("token").cloned().unwrap_or_default();

    let key_path = format!("keys/{token}.pub");
    state.store.put(&key_path, public_key.as_bytes().to_vec()).await?;

    let instance = state
        .instances
        .launch(LaunchSpec {
            image_id: state.config.instance.image_id.clone(),
            instance_type: state.config.instance.instance_type.clone(),
            security_groups: state.config.instance.security_groups.clone(),
            profile: state.config.instance.profile.clone(),
            boot_script: boot_script(&state, &key_path),
            client_token: token,
            owner: user.clone(),
            name: name.clone(),
            app_tag: state.config.instance.app_tag.clone(),
        })
        .await?;

    let monitoring_url = format!("/worker/monitor/{}", instance.id);
    state
        .mailer
        .send(OutboundMail {
            to: user.clone(),
            subject: format!("skylift worker instance: {} ({}) launched", name, instance.id),
            body: launch_email(&name, &instance.id, &monitoring_url),
        })
        .await?;

    info!(instance_id = %instance.id, owner = %user, "worker instance launched");
    Ok(Redirect::to(&monitoring_url).into_response())
}

/// `GET /worker/monitor/{instance_id}`.
pub async fn monitor(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(instance_id): Path<String>,
) -> Result<Json<MonitorResponse>, ApiError> {
    let user = require_user(&headers)?;
    let instance = owned_instance(&state, &instance_id, &user).await?;

    Ok(Json(MonitorResponse {
        terminate_url: format!("/worker/kill/{}", instance.id),
        instance_id: instance.id,
        instance_state: instance.state.as_str().to_string(),
        public_dns: instance.public_dns,
    }))
}

/// `GET /worker/kill/{instance_id}`.
pub async fn kill(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(instance_id): Path<String>,
) -> Result<Json<KillResponse>, ApiError> {
    let user = require_user(&headers)?;
    owned_instance(&state, &instance_id, &user).await?;

    let instance = state.instances.terminate(&instance_id).await?;
    info!(instance_id = %instance.id, owner = %user, "worker instance terminated");

    Ok(Json(KillResponse {
        monitoring_url: format!("/worker/monitor/{}", instance.id),
        instance_id: instance.id,
        instance_state: instance.state.as_str().to_string(),
        public_dns: instance.public_dns,
    }))
}

/// Fetch an instance and check the requester owns it.
async fn owned_instance(
    state: &AppState,
    instance_id: &str,
    user: &str,
) -> Result<WorkerInstance, ApiError> {
    let instance = state
        .instances
        .describe(instance_id)
        .await?
        .ok_or(ApiError::NoSuchInstance)?;

    if instance.owner != user {
        return Err(ApiError::Forbidden);
    }
    Ok(instance)
}

/// First-boot script handed to the instance as user data.
fn boot_script(state: &AppState, key_path: &str) -> String {
    format!(
        "#!/bin/bash\n\
         export SKYLIFT_REGION={}\n\
         export SKYLIFT_TEMPORARY_BUCKET={}\n\
         export SKYLIFT_SSH_KEY={}\n\
         exec /usr/local/bin/skylift-worker\n",
        state.config.cloud.region, state.config.cloud.temporary_bucket, key_path
    )
}

fn launch_email(name: &str, instance_id: &str, monitoring_url: &str) -> String {
    format!(
        "<p>Your worker instance <strong>{name}</strong> ({instance_id}) has launched.</p>\
         <p><a href=\"{monitoring_url}\">Monitor it here.</a></p>"
    )
}
