
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use skylift_config::Config;

use super::*;
use crate::routes::create_router;
use crate::state::{AppState, FORWARDED_EMAIL_HEADER};

fn test_router() -> Router {
    create_router(Arc::new(AppState::dev(Config::default())))
}

fn encode(value: &str) -> String {
    value.replace(' ', "+")
}

fn form_body(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={}", encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn valid_daily_pairs() -> Vec<(&'static str, &'static str)> {
    vec![
        ("job-name", "churn-report"),
        ("commandline", "python churn.py"),
        ("output-dir", "output"),
        ("schedule-frequency", "daily"),
        ("schedule-time-of-day", "17"),
        ("timeout", "120"),
        ("code-tarball", "code.tar.gz"),
    ]
}

async fn post_schedule(app: Router, pairs: &[(&str, &str)]) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/schedule/new")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header(FORWARDED_EMAIL_HEADER, "user@example.com")
                .body(Body::from(form_body(pairs)))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_daily_schedule_created() {
    let (status, body) = post_schedule(test_router(), &valid_daily_pairs()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cron_spec"], "0 17 * * * /path/to/run/script.sh");
    assert_eq!(body["job_time"], "17:00 UTC");
    assert_eq!(body["job_frequency"], "daily");
    assert_eq!(body["job_dow"], "");
    assert_eq!(body["job_dom"], "");
    assert_eq!(
        body["code_s3path"],
        "s3://skylift-analysis-code/churn-report/code.tar.gz"
    );
    assert_eq!(
        body["data_s3path"],
        "s3://skylift-public-analysis/churn-report/data/"
    );
    assert_eq!(body["job_timeout"], 120);
}

#[tokio::test]
async fn test_weekly_schedule_created() {
    let mut pairs = valid_daily_pairs();
    pairs.retain(|(k, _)| *k != "schedule-frequency");
    pairs.push(("schedule-frequency", "weekly"));
    pairs.push(("schedule-day-of-week", "3"));

    let (status, body) = post_schedule(test_router(), &pairs).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cron_spec"], "0 17 * * 3 /path/to/run/script.sh");
    assert_eq!(body["job_dow"], " every Wednesday");
    assert!(body["next_run"].is_string());
}

#[tokio::test]
async fn test_monthly_schedule_created() {
    let mut pairs = valid_daily_pairs();
    pairs.retain(|(k, _)| *k != "schedule-frequency");
    pairs.push(("schedule-frequency", "monthly"));
    pairs.push(("schedule-day-of-month", "2"));

    let (status, body) = post_schedule(test_router(), &pairs).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job_dom"], " on the 2nd day of each month");
}

#[tokio::test]
async fn test_out_of_range_hour_returns_field_errors() {
    let mut pairs = valid_daily_pairs();
    pairs.retain(|(k, _)| *k != "schedule-time-of-day");
    pairs.push(("schedule-time-of-day", "24"));

    let (status, body) = post_schedule(test_router(), &pairs).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"]["schedule-time-of-day"],
        "Time of Day should be an int between 0 and 23"
    );
    // No cron spec on any error.
    assert!(body.get("cron_spec").is_none());
}

#[tokio::test]
async fn test_bad_archive_suffix_rejected() {
    let mut pairs = valid_daily_pairs();
    pairs.retain(|(k, _)| *k != "code-tarball");
    pairs.push(("code-tarball", "data.zip"));

    let (status, body) = post_schedule(test_router(), &pairs).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"]["code-tarball"],
        "Code file must be in .tar.gz or .tgz format"
    );
}

#[tokio::test]
async fn test_all_errors_reported_together() {
    let (status, body) = post_schedule(
        test_router(),
        &[("schedule-frequency", "weekly"), ("schedule-time-of-day", "sometime")],
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = body["errors"].as_object().unwrap();
    assert!(errors.contains_key("job-name"));
    assert!(errors.contains_key("commandline"));
    assert!(errors.contains_key("output-dir"));
    assert!(errors.contains_key("schedule-time-of-day"));
    assert!(errors.contains_key("schedule-day-of-week"));
    assert!(errors.contains_key("timeout"));
    assert!(errors.contains_key("code-tarball"));
}

#[tokio::test]
async fn test_schedule_requires_identity() {
    let app = test_router();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/schedule/new")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form_body(&valid_daily_pairs())))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
