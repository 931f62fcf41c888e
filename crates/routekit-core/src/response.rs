//! The structured `{status, message}` failure.
//!
//! Every failure that reaches a client (handler errors, recovered panics,
//! rejected path parameters) is normalised into an [`ErrorResponse`] and
//! written as exactly one JSON body:
//!
//! ```json
//! { "status": 400, "message": "missing path parameter \"id\"" }
//! ```
//!
//! The HTTP status of the response always equals the `status` field.


use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed, thread-safe error accepted from handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Response extension marking a request whose processing was aborted.
///
/// Inserted by [`ErrorResponse::abort_json`] so outer middleware can tell an
/// aborted request apart from one that completed normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aborted;

/// A failure carrying an HTTP status code and a human-readable message.
///
/// Usable as an error value (`Display` yields the message) and directly as a
/// response body. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[serde(try_from = "RawErrorResponse")]
#[error("{message}")]
pub struct ErrorResponse {
    status: u16,
    message: String,
}

#[derive(Deserialize)]
struct RawErrorResponse {
    status: u16,
    message: String,
}

impl TryFrom<RawErrorResponse> for ErrorResponse {
    type Error = String;

    fn try_from(raw: RawErrorResponse) -> Result<Self, Self::Error> {
        let status = StatusCode::from_u16(raw.status)
            .map_err(|_| format!("invalid HTTP status code {}", raw.status))?;
        Ok(Self::new(status, raw.message))
    }
}

impl ErrorResponse {
    /// Creates an error response with an explicit status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    /// 500 Internal Server Error.
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// 400 Bad Request.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 401 Unauthorized.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// 403 Forbidden.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// 404 Not Found.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Normalises an arbitrary error.
    ///
    /// An error that is an `ErrorResponse`, or wraps one anywhere in its
    /// `source()` chain, yields that `ErrorResponse` unchanged, keeping its
    /// status. Anything else becomes a 500 carrying the outer error's
    /// `Display` text.
    pub fn from_error(err: BoxError) -> Self {
        let err = match err.downcast::<ErrorResponse>() {
            Ok(structured) => return *structured,
            Err(other) => other,
        };

        let wrapped = std::iter::successors(err.source(), |cause: &&(dyn std::error::Error + 'static)| (*cause).source())
            .find_map(|cause| cause.downcast_ref::<ErrorResponse>().cloned());

        wrapped.unwrap_or_else(|| Self::server_error(err.to_string()))
    }

    /// The numeric status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The status as an `http` status code.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Writes this error as the terminal JSON response and marks the request
    /// as aborted.
    pub fn abort_json(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = self.status, message = %self.message, "Request aborted");
        } else {
            tracing::debug!(status = self.status, message = %self.message, "Request aborted");
        }

        let mut response = (status, Json(self)).into_response();
        response.extensions_mut().insert(Aborted);
        response
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        self.abort_json()
    }
}

/// Writes `err` as the terminal JSON response. Same as [`ErrorResponse::abort_json`].
pub fn abort_with_error(err: ErrorResponse) -> Response {
    err.abort_json()
}
