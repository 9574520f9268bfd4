//! A small sales dashboard.
//!
//! This library provides a REST API for querying product transactions by
//! month, along with a server-rendered dashboard page that charts the results.
//!
//! All queries are scoped to a single calendar month of a configurable year.
//! The database is populated once from a remote JSON dataset via the
//! `/initialize` endpoint or the `seed_db` binary.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod breakdown;
mod combined;
mod dashboard;
mod db;
mod endpoints;
mod histogram;
mod html;
mod logging;
mod month;
mod not_found;
mod pagination;
mod routing;
mod seed;
mod statistics;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use month::{DEFAULT_WINDOW_YEAR, Month, MonthWindow};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use seed::{DEFAULT_SEED_URL, fetch_seed_data};
pub use transaction::{Transaction, insert_transactions};

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
    /// The remote seed dataset could not be downloaded or decoded.
    ///
    /// The string holds the underlying cause and should only be logged.
    #[error("could not fetch seed data: {0}")]
    FetchFailed(String),

    /// The month was not a calendar month between "01" and "12".
    #[error("\"{0}\" is not a valid month, expected a value from 01 to 12")]
    InvalidMonth(String),

    /// The search string could not be compiled as a regular expression.
    #[error("invalid search pattern: {0}")]
    InvalidSearchPattern(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A query running on a blocking worker thread panicked or was cancelled.
    #[error("a background query did not complete: {0}")]
    TaskFailed(String),

    /// One of the queries of a combined fetch failed, so no result is returned.
    #[error("combined fetch failed: {0}")]
    CombinedFetch(Box<Error>),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidMonth(_) | Error::InvalidSearchPattern(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details.",
                )
                    .into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into a plain text response.
    ///
    /// Bad input is reported back to the client as is. Every other error is
    /// logged and replaced with `message` and an internal server error status.
    fn into_plain_text_response(self, message: &'static str) -> Response {
        match self {
            Error::InvalidMonth(_) | Error::InvalidSearchPattern(_) => self.into_response(),
            error => {
                tracing::error!("{message} {error}");
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
        }
    }
}
