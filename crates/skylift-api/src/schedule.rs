//! Schedule submission handler.

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Form, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::info;

use skylift_schedule::{
    CronSpec, ScheduleValidator, ValidationErrors, display_day_of_month, display_day_of_week,
    fields, hour_to_time,
};

use crate::error::ApiError;
use crate::state::{AppState, require_user};

/// A successfully scheduled job, as shown back to the user.
#[derive(Debug, Serialize)]
pub struct ScheduleCreatedResponse {
    /// Where the uploaded code archive will live.
    pub code_s3path: String,
    /// Where the job publishes its output.
    pub data_s3path: String,
    pub commandline: String,
    pub output_dir: String,
    pub job_frequency: String,
    /// e.g. `17:00 UTC`.
    pub job_time: String,
    /// e.g. `" every Wednesday"`; empty unless weekly.
    pub job_dow: String,
    /// e.g. `" on the 2nd day of each month"`; empty unless monthly.
    pub job_dom: String,
    pub job_timeout: u32,
    /// Full crontab line: five fields plus the runner path.
    pub cron_spec: String,
    /// Next fire time, RFC 3339, when computable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_run: Option<String>,
}

/// Validation failure payload: field name to user-facing message.
#[derive(Debug, Serialize)]
pub struct ScheduleErrorsResponse {
    pub errors: ValidationErrors,
}

/// `POST /schedule/new`.
///
/// Validates the whole form in one pass and either returns every field
/// error together (422) or the created schedule description. The cron spec
/// is only built once validation has fully passed.
pub async fn create_scheduled_job(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let user = require_user(&headers)?;

    let archive_name = form.get(fields::CODE_ARCHIVE).map(|s| s.as_str());
    let request = match ScheduleValidator::validate(&form, archive_name) {
        Ok(request) => request,
        Err(errors) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ScheduleErrorsResponse { errors }),
            )
                .into_response());
        }
    };

    let spec = CronSpec::for_request(&request);
    let cloud = &state.config.cloud;
    let response = ScheduleCreatedResponse {
        code_s3path: format!(
            "s3://{}/{}/{}",
            cloud.code_bucket, request.job_name, request.code_archive
        ),
        data_s3path: format!("s3://{}/{}/data/", cloud.data_bucket, request.job_name),
        commandline: request.command_line.clone(),
        output_dir: request.output_dir.clone(),
        job_frequency: request.frequency.as_str().to_string(),
        job_time: hour_to_time(request.time_of_day),
        job_dow: display_day_of_week(request.day_of_week),
        job_dom: display_day_of_month(request.day_of_month),
        job_timeout: request.timeout_minutes,
        cron_spec: spec.cron_line(&state.config.schedule.runner_path),
        next_run: spec.next_fire_time().map(|t| t.to_rfc3339()),
    };

    info!(
        job = %request.job_name,
        owner = %user,
        cron = %response.cron_spec,
        "scheduled job created"
    );

    Ok(Json(response).into_response())
}
