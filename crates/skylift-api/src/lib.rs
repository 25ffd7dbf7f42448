//! # Skylift API
//!
//! HTTP interface for the console: schedule submission, worker launch,
//! monitoring, and termination. Handlers receive every collaborator through
//! [`AppState`]; nothing here reaches for a process-wide client.
//!
//! Requester identity comes from the `X-Forwarded-Email` header set by the
//! authenticating proxy in front of this service.

mod error;
mod pages;
mod routes;
mod schedule;
mod state;
mod worker;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
