//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use skylift_cloud::CloudError;

/// Errors surfaced to HTTP clients.
///
/// Validation failures are not errors; they travel as field-keyed maps in
/// 422 responses. This type covers everything else.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No authenticated user on the request.
    #[error("Authentication required")]
    Unauthorized,

    /// The requester is not the instance owner.
    #[error("You do not own this instance")]
    Forbidden,

    /// Unknown instance id.
    #[error("No such instance")]
    NoSuchInstance,

    /// A cloud collaborator failed.
    #[error(transparent)]
    Cloud(#[from] CloudError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NoSuchInstance => StatusCode::NOT_FOUND,
            Self::Cloud(CloudError::InstanceNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Cloud(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
