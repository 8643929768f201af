//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The client sent a request with missing, malformed or out of range
    /// fields, e.g. an unparseable date or an unknown transaction type.
    #[error("{0}")]
    Validation(String),

    /// The requested transaction was not found.
    ///
    /// For HTTP request handlers, the client should check that the ID is
    /// correct and that the transaction has not already been deleted.
    #[error("Transaction not found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// A timestamp could not be formatted for storage.
    #[error("could not format timestamp: {0}")]
    TimestampFormat(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A CORS origin in the server configuration is not a valid header value.
    #[error("invalid CORS origin \"{0}\"")]
    InvalidCorsOrigin(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<time::error::Format> for Error {
    fn from(value: time::error::Format) -> Self {
        Error::TimestampFormat(value.to_string())
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    /// A human readable explanation of what went wrong.
    pub detail: String,
}

impl ErrorBody {
    pub(crate) fn response(status: StatusCode, detail: impl Into<String>) -> Response {
        (
            status,
            Json(ErrorBody {
                detail: detail.into(),
            }),
        )
            .into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(detail) => ErrorBody::response(StatusCode::BAD_REQUEST, detail),
            Error::NotFound => ErrorBody::response(StatusCode::NOT_FOUND, Error::NotFound.to_string()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                ErrorBody::response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details.",
                )
            }
        }
    }
}

/// Give error responses that have no body, such as 405 Method Not Allowed from
/// the router or 408 Request Timeout from the timeout layer, a JSON body with
/// the status' reason as the detail.
///
/// Responses that already have a content type are passed through unchanged.
pub async fn json_error_body(response: Response) -> Response {
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error())
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }

    let detail = status.canonical_reason().unwrap_or("Error");
    let mut json_response = ErrorBody::response(status, detail);

    if let Some(allow) = response.headers().get(header::ALLOW) {
        json_response
            .headers_mut()
            .insert(header::ALLOW, allow.clone());
    }

    json_response
}
