//! HTTP-facing error types and rejection recovery

use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::{debug, error, info};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::store::StoreError;

/// Errors surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown method or path
    #[error("No route matched")]
    NoRouteMatched,

    /// Stream name missing or malformed
    #[error("Invalid path parameter: {0}")]
    InvalidPathParameter(String),

    /// The user store failed while being read
    #[error("Upstream failure: {0}")]
    UpstreamFailure(#[from] StoreError),

    /// A response body could not be encoded
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoRouteMatched => StatusCode::NOT_FOUND,
            ApiError::InvalidPathParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::UpstreamFailure(_) | ApiError::Encoding(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl warp::reject::Reject for ApiError {}

// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

/// Turn any rejection into a JSON error response
///
/// Paths or methods no filter accepted are reported as [`ApiError::NoRouteMatched`].
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let no_route = ApiError::NoRouteMatched;
    let api_error = match err.find::<ApiError>() {
        Some(api_error) => Some(api_error),
        None if err.is_not_found()
            || err.find::<warp::reject::MethodNotAllowed>().is_some() =>
        {
            Some(&no_route)
        }
        None => None,
    };

    let (status, message) = match api_error {
        Some(api_error) => {
            match api_error {
                ApiError::NoRouteMatched => debug!(rejection = ?err, "no route matched"),
                ApiError::InvalidPathParameter(_) => info!(error = %api_error, "request rejected"),
                ApiError::UpstreamFailure(_) | ApiError::Encoding(_) => {
                    error!(error = %api_error, "request failed")
                }
            }
            (api_error.status_code(), api_error.to_string())
        }
        None => {
            error!(rejection = ?err, "unhandled rejection");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    };

    let body = ErrorResponse {
        code: status.as_u16(),
        message,
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
