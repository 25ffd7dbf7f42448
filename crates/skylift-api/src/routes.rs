//! HTTP route definitions.

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::pages;
use crate::schedule;
use crate::state::AppState;
use crate::worker;

/// Create the console router.
///
/// ## Route Structure
///
/// ```text
/// GET  /                              - index page
/// GET  /status                        - plain health probe
/// GET  /api/info                      - service info (JSON)
///
/// GET  /schedule                      - schedule form
/// POST /schedule/new                  - validate form, build cron spec
///
/// GET  /worker                        - worker launch form (fresh token)
/// POST /worker/new                    - launch a worker instance
/// GET  /worker/monitor/{instance_id}  - instance state (owner only)
/// GET  /worker/kill/{instance_id}     - terminate instance (owner only)
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/status", get(pages::status))
        .route("/api/info", get(pages::api_info))
        .route("/schedule", get(pages::schedule_form))
        .route("/schedule/new", post(schedule::create_scheduled_job))
        .route("/worker", get(pages::worker_form))
        .route("/worker/new", post(worker::spawn_worker_instance))
        .route("/worker/monitor/{instance_id}", get(worker::monitor))
        .route("/worker/kill/{instance_id}", get(worker::kill))
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn count_requests(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    state.record_request();
    next.run(request).await
}
