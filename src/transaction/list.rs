//! Paged, searchable listing of the transactions in a month.

use axum::{
    Json,
    extract::{Query, State},
    response::Response,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    Error,
    app_state::QueryState,
    db::lock_connection,
    month::{Month, MonthWindow},
    pagination::{Page, PaginationConfig},
};

use super::{
    core::{TRANSACTION_COLUMNS, Transaction, map_transaction_row},
    search::SearchPattern,
};

/// The query string parameters accepted by the transaction list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsQuery {
    /// The month to list transactions for.
    pub month: Month,
    /// The one-based page number.
    pub page: Option<u64>,
    /// The maximum number of transactions per page.
    pub per_page: Option<u64>,
    /// A case-insensitive regular expression matched against the title,
    /// description and price.
    #[serde(default)]
    pub search: String,
}

/// A validated filter for listing transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFilter {
    /// Only transactions sold within this window are listed.
    pub window: MonthWindow,
    /// Which page of the filtered transactions to return.
    pub page: Page,
    /// The pattern that either the title, description or price must match.
    pub search: SearchPattern,
}

impl TransactionFilter {
    /// Build a filter from request parameters.
    ///
    /// # Errors
    /// Returns [Error::InvalidSearchPattern] if the search is not a valid
    /// regular expression.
    pub fn from_query(
        query: &TransactionsQuery,
        window_year: i32,
        pagination_config: &PaginationConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            window: query.month.window(window_year)?,
            page: Page::new(query.page, query.per_page, pagination_config),
            search: SearchPattern::new(&query.search)?,
        })
    }
}

/// Get one page of the transactions in the filter's month window whose
/// title, description or price matches the search pattern.
///
/// Transactions are returned in the order they were inserted. A page past
/// the end of the results is empty. A page size of zero means no limit.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn list_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let (start, end) = filter.window.as_millis();
    // SQLite treats a negative limit as no limit.
    let limit = match filter.page.limit() {
        0 => -1,
        limit => i64::try_from(limit).unwrap_or(i64::MAX),
    };
    let offset = i64::try_from(filter.page.offset()).unwrap_or(i64::MAX);

    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
        WHERE date_of_sale >= ?1 AND date_of_sale < ?2 \
        AND (title REGEXP ?3 OR description REGEXP ?3 OR price REGEXP ?3) \
        ORDER BY rowid ASC \
        LIMIT ?4 OFFSET ?5"
    );

    connection
        .prepare(&query)?
        .query_map(
            (start, end, filter.search.as_sql_pattern(), limit, offset),
            map_transaction_row,
        )?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Route handler that lists the transactions for a month as JSON.
pub async fn get_transactions(
    State(state): State<QueryState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<Vec<Transaction>>, Response> {
    let message = "Error fetching transactions.";

    let filter =
        TransactionFilter::from_query(&query, state.window_year, &state.pagination_config)
            .map_err(|error| error.into_plain_text_response(message))?;

    let connection =
        lock_connection(&state.db_connection).map_err(|error| error.into_plain_text_response(message))?;

    list_transactions(&filter, &connection)
        .map(Json)
        .map_err(|error| error.into_plain_text_response(message))
}
