//! A JSON REST API for recording payment transactions and summarizing them
//! on a dashboard.
//!
//! Transactions are stored in SQLite. Each transaction belongs to an external
//! user, carries a positive amount and a three-valued status, and can be
//! soft-deleted. The dashboard endpoint reports best-effort aggregates over
//! the live rows.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::{Deserialize, Serialize};
use tokio::signal;

mod app_state;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod health;
mod logging;
mod pagination;
mod routing;
mod timestamp;
mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use pagination::PaginationConfig;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested transaction was not found, or has been soft-deleted.
    ///
    /// The client should check that the id is correct and that the
    /// transaction has not been deleted.
    #[error("the requested transaction could not be found")]
    NotFound,

    /// A path parameter that should be a transaction id could not be parsed
    /// as a positive integer.
    #[error("\"{0}\" is not a valid transaction id")]
    InvalidId(String),

    /// A status string was not one of `pending`, `success` or `failed`.
    ///
    /// Status values are case-sensitive, so e.g. `PENDING` is rejected.
    #[error("\"{0}\" is not a valid transaction status")]
    InvalidStatus(String),

    /// The request body or query string failed validation.
    ///
    /// The inner string describes what was wrong and is returned to the
    /// client in the `details` field of the error body.
    #[error("request validation failed: {0}")]
    Validation(String),

    /// An unhandled/unexpected SQL error.
    ///
    /// The inner error is logged on the server and never shown to clients.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
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

/// The standardized JSON body sent with every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// A short, machine-readable error code such as `invalid_status`.
    pub error: String,

    /// A human-readable description of the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Extra validation detail, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "not_found".to_owned(),
                    message: Some("Transaction not found".to_owned()),
                    details: None,
                },
            ),
            Error::InvalidId(id) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "invalid_id".to_owned(),
                    message: Some("Invalid transaction ID".to_owned()),
                    details: Some(format!("\"{id}\" is not a positive integer")),
                },
            ),
            Error::InvalidStatus(status) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "invalid_status".to_owned(),
                    message: Some("Status must be one of: pending, success, failed".to_owned()),
                    details: Some(format!("got \"{status}\"")),
                },
            ),
            Error::Validation(details) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "validation_error".to_owned(),
                    message: Some("Request validation failed".to_owned()),
                    details: Some(details),
                },
            ),
            // Raw SQL errors are not shown to the client.
            Error::SqlError(error) => {
                tracing::error!("An unexpected error occurred: {}", error);

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "internal_server_error".to_owned(),
                        message: Some("An unexpected error occurred".to_owned()),
                        details: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn sql_error_maps_no_rows_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn not_found_renders_404() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_status_renders_400() {
        let response = Error::InvalidStatus("PENDING".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn sql_error_renders_500() {
        let response = Error::SqlError(rusqlite::Error::InvalidQuery).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
