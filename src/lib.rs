//! Peniato is a web app for tracking personal finances.
//!
//! This library provides a JSON REST API for managing accounts, categories,
//! incomes and expenses, plus the aggregates shown on the dashboard.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod account;
mod acting_user;
mod app_state;
mod calendar_date;
mod category;
mod dashboard;
mod database_id;
mod db;
mod default_data;
mod endpoints;
mod extract;
mod list_filter;
mod logging;
mod pagination;
mod password;
mod response;
mod role;
mod routing;
mod setting;
mod timestamp;
mod timezone;
mod transaction;
mod user;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use default_data::{DEFAULT_ADMIN_EMAIL, seed_default_data, seed_sample_data};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use password::PasswordHash;
pub use routing::build_router;
pub use timezone::{get_local_offset, get_local_today};
pub use user::{User, UserId, get_user_by_email, set_user_password};

#[cfg(test)]
mod test_utils;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
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
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    /// Records that belong to another user are also reported as not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The request did not say which user it is acting for.
    #[error("the request is missing the acting user")]
    MissingActingUser,

    /// The acting user named in the request does not exist.
    #[error("the acting user does not exist")]
    UnknownActingUser,

    /// The sort parameter named a field that cannot be sorted on, or an
    /// unknown direction.
    #[error("cannot sort by \"{0}\"")]
    InvalidSort(String),

    /// The request body or query string could not be parsed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The page or limit parameter was out of range.
    #[error("{0} must be at least 1")]
    InvalidPagination(&'static str),

    /// A required text field was empty or only whitespace.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// A category of the wrong type was used for an income or expense.
    #[error("a category of type {category_type} cannot be used for an {kind}")]
    CategoryKindMismatch {
        /// The type of the category that was given.
        category_type: String,
        /// The kind of transaction the category was used for.
        kind: String,
    },

    /// A foreign key did not refer to an existing record.
    #[error("the {0} ID does not refer to a valid {0}")]
    InvalidReference(&'static str),

    /// The chart window was outside of the supported range.
    #[error("months must be between 1 and {0}")]
    InvalidMonthCount(u32),

    /// The email address is already used by another user.
    #[error("Email already exist.")]
    DuplicateEmail,

    /// The email address could not be parsed.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::MissingActingUser | Error::UnknownActingUser => StatusCode::UNAUTHORIZED,
            Error::InvalidRequest(_)
            | Error::InvalidSort(_)
            | Error::InvalidPagination(_)
            | Error::EmptyField(_)
            | Error::CategoryKindMismatch { .. }
            | Error::InvalidReference(_)
            | Error::InvalidMonthCount(_)
            | Error::InvalidEmail(_) => StatusCode::BAD_REQUEST,
            Error::DuplicateEmail => StatusCode::CONFLICT,
            Error::InvalidTimezone(_)
            | Error::HashingError(_)
            | Error::DatabaseLockError
            | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            // The details of server errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
