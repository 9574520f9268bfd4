//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{Error, db::initialize, pagination::PaginationConfig};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The year that month windows are built in, e.g. 2022.
    pub window_year: i32,

    /// The config that controls how to page through transactions.
    pub pagination_config: PaginationConfig,

    /// The URL of the JSON dataset used to seed the database.
    pub seed_url: String,

    /// The client used to download the seed dataset.
    pub http_client: reqwest::Client,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        seed_url: &str,
        window_year: i32,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            window_year,
            pagination_config,
            seed_url: seed_url.to_owned(),
            http_client: reqwest::Client::new(),
        })
    }
}

/// The state needed by the read-only query endpoints.
#[derive(Debug, Clone)]
pub struct QueryState {
    /// The database connection for querying transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The year that month windows are built in.
    pub window_year: i32,
    /// The default page and page size for transaction lists.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for QueryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            window_year: state.window_year,
            pagination_config: state.pagination_config.clone(),
        }
    }
}
