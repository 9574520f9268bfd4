//! Summary statistics for the sales in a month.

use axum::{
    Json,
    extract::{Query, State},
    response::Response,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    app_state::QueryState,
    db::{get_count, lock_connection},
    month::{Month, MonthWindow},
};

/// The query string parameters for the per-month aggregate endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthQuery {
    /// The month to aggregate.
    pub month: Month,
}

/// Totals over the transactions in a month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the prices of every transaction, sold or not.
    pub total_amount: f64,
    /// The number of transactions that were sold.
    pub total_sold_items: u64,
    /// The number of transactions that were not sold.
    pub total_not_sold_items: u64,
}

/// Calculate the [Statistics] for the transactions in `window`.
///
/// Returns `None` if no transactions fall in the window.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_statistics(
    window: MonthWindow,
    connection: &Connection,
) -> Result<Option<Statistics>, Error> {
    let (start, end) = window.as_millis();

    let (count, statistics) = connection
        .prepare(
            "SELECT
                COUNT(*),
                COALESCE(SUM(price), 0),
                COALESCE(SUM(CASE WHEN sold THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN sold THEN 0 ELSE 1 END), 0)
            FROM \"transaction\"
            WHERE date_of_sale >= ?1 AND date_of_sale < ?2",
        )?
        .query_row((start, end), |row| {
            let count = get_count(row, 0)?;
            let statistics = Statistics {
                total_amount: row.get(1)?,
                total_sold_items: get_count(row, 2)?,
                total_not_sold_items: get_count(row, 3)?,
            };

            Ok((count, statistics))
        })?;

    Ok((count > 0).then_some(statistics))
}

/// Route handler for the statistics of a month.
///
/// Responds with JSON `null` when the month has no transactions.
pub async fn get_statistics_endpoint(
    State(state): State<QueryState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Option<Statistics>>, Response> {
    let message = "Error fetching statistics.";

    let window = query
        .month
        .window(state.window_year)
        .map_err(|error| error.into_plain_text_response(message))?;
    let connection = lock_connection(&state.db_connection)
        .map_err(|error| error.into_plain_text_response(message))?;

    get_statistics(window, &connection)
        .map(Json)
        .map_err(|error| error.into_plain_text_response(message))
}
