//! Populates the database from the remote JSON dataset.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::lock_connection,
    transaction::{Transaction, insert_transactions},
};

/// Where the product transaction dataset is downloaded from by default.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// Download the seed dataset, a JSON array of transactions.
///
/// # Errors
/// Returns [Error::FetchFailed] if the request fails, the server responds
/// with an error status, or the body is not a valid array of transactions.
pub async fn fetch_seed_data(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<Transaction>, Error> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|error| Error::FetchFailed(error.to_string()))?;

    response
        .json::<Vec<Transaction>>()
        .await
        .map_err(|error| Error::FetchFailed(error.to_string()))
}

/// The state needed to seed the database.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection to insert the seed data into.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The client used to download the dataset.
    pub http_client: reqwest::Client,
    /// The URL of the dataset.
    pub seed_url: String,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            http_client: state.http_client.clone(),
            seed_url: state.seed_url.clone(),
        }
    }
}

/// Download the dataset and insert every record.
///
/// Records are inserted as is, so seeding twice stores every record twice.
///
/// # Errors
/// Returns [Error::FetchFailed] if the dataset cannot be downloaded, or
/// [Error::SqlError] if the records cannot be inserted.
pub async fn seed_database(state: &SeedState) -> Result<usize, Error> {
    let transactions = fetch_seed_data(&state.http_client, &state.seed_url).await?;
    tracing::info!(
        "Fetched {} transactions from {}",
        transactions.len(),
        state.seed_url
    );

    let connection = lock_connection(&state.db_connection)?;
    insert_transactions(&transactions, &connection)
}

/// Route handler that seeds the database from the remote dataset.
pub async fn get_initialize(State(state): State<SeedState>) -> Response {
    match seed_database(&state).await {
        Ok(count) => {
            tracing::info!("Inserted {count} seed transactions");
            (StatusCode::OK, "Database initialized with seed data.").into_response()
        }
        Err(error) => error.into_plain_text_response("Error initializing database."),
    }
}
