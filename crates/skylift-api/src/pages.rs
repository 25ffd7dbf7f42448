//! Static-ish HTML pages and service probes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse};
use uuid::Uuid;

use crate::state::AppState;

/// Index page.
pub async fn index() -> impl IntoResponse {
    Html(index_html())
}

/// Schedule form page.
pub async fn schedule_form() -> impl IntoResponse {
    Html(schedule_html())
}

/// Worker launch form page, with a fresh idempotency token baked in.
pub async fn worker_form() -> impl IntoResponse {
    Html(worker_html(&Uuid::new_v4().to_string()))
}

/// Plain health probe.
pub async fn status() -> impl IntoResponse {
    "OK"
}

/// Service info endpoint.
pub async fn api_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        serde_json::json!({
            "name": "Skylift Console",
            "version": env!("CARGO_PKG_VERSION"),
            "uptime_seconds": state.uptime().as_secs(),
            "requests": state.request_count(),
            "endpoints": {
                "schedule": "/schedule",
                "worker": "/worker",
                "status": "/status"
            }
        })
        .to_string(),
    )
}

fn index_html() -> String {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Skylift</title>
</head>
<body>
    <h1>Skylift</h1>
    <p>Self-serve analysis workers.</p>
    <ul>
        <li><a href="/worker">Launch a worker instance</a></li>
        <li><a href="/schedule">Schedule a recurring job</a></li>
    </ul>
</body>
</html>"#
        .to_string()
}

fn schedule_html() -> String {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Skylift - Schedule a Job</title>
</head>
<body>
    <h1>Schedule a Job</h1>
    <form method="post" action="/schedule/new">
        <label>Job name <input name="job-name"></label>
        <label>Command line <input name="commandline"></label>
        <label>Output directory <input name="output-dir"></label>
        <label>Frequency
            <select name="schedule-frequency">
                <option value="daily">Daily</option>
                <option value="weekly">Weekly</option>
                <option value="monthly">Monthly</option>
            </select>
        </label>
        <label>Time of day (0-23 UTC) <input name="schedule-time-of-day"></label>
        <label>Day of week (0=Sunday) <input name="schedule-day-of-week"></label>
        <label>Day of month (1-31) <input name="schedule-day-of-month"></label>
        <label>Timeout (minutes) <input name="timeout"></label>
        <label>Code archive (.tar.gz or .tgz) <input name="code-tarball"></label>
        <button type="submit">Schedule</button>
    </form>
</body>
</html>"#
        .to_string()
}

fn worker_html(token: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Skylift - Launch a Worker</title>
</head>
<body>
    <h1>Launch a Worker</h1>
    <form method="post" action="/worker/new">
        <label>Name <input name="name"></label>
        <label>OpenSSH public key <textarea name="public-ssh-key"></textarea></label>
        <input type="hidden" name="token" value="{token}">
        <button type="submit">Launch</button>
    </form>
</body>
</html>"#
    )
}
