//! Runs the list and the three aggregates for one filter and merges the results.

use std::sync::{Arc, Mutex};

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
    breakdown::{CategoryCount, get_category_breakdown},
    db::lock_connection,
    histogram::{PriceRangeCount, get_price_histogram},
    statistics::{Statistics, get_statistics},
    transaction::{Transaction, TransactionFilter, TransactionsQuery, list_transactions},
};

/// The results of every query for one filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combined {
    /// The requested page of transactions.
    pub transactions: Vec<Transaction>,
    /// The month's statistics, `None` if the month has no transactions.
    pub statistics: Option<Statistics>,
    /// The price histogram for the month.
    #[serde(rename = "barchart")]
    pub histogram: Vec<PriceRangeCount>,
    /// The category breakdown for the month.
    #[serde(rename = "piechart")]
    pub breakdown: Vec<CategoryCount>,
}

/// Run `query` against the shared connection on a blocking worker thread.
async fn run_query<T, F>(db_connection: &Arc<Mutex<Connection>>, query: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, Error> + Send + 'static,
{
    let db_connection = db_connection.clone();

    tokio::task::spawn_blocking(move || {
        let connection = lock_connection(&db_connection)?;
        query(&connection)
    })
    .await
    .map_err(|error| Error::TaskFailed(error.to_string()))?
}

/// Fetch the transactions, statistics, histogram and breakdown for `filter`
/// concurrently.
///
/// # Errors
/// Returns [Error::CombinedFetch] wrapping the first error if any of the
/// queries fail. No partial result is returned.
pub async fn get_combined(
    db_connection: &Arc<Mutex<Connection>>,
    filter: TransactionFilter,
) -> Result<Combined, Error> {
    let window = filter.window;

    let (transactions, statistics, histogram, breakdown) = tokio::try_join!(
        run_query(db_connection, move |connection| {
            list_transactions(&filter, connection)
        }),
        run_query(db_connection, move |connection| {
            get_statistics(window, connection)
        }),
        run_query(db_connection, move |connection| {
            get_price_histogram(window, connection)
        }),
        run_query(db_connection, move |connection| {
            get_category_breakdown(window, connection)
        }),
    )
    .map_err(|error| Error::CombinedFetch(Box::new(error)))?;

    Ok(Combined {
        transactions,
        statistics,
        histogram,
        breakdown,
    })
}

/// Route handler that returns every query result for a filter as one JSON object.
pub async fn get_combined_endpoint(
    State(state): State<QueryState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<Combined>, Response> {
    let message = "Error fetching combined data.";

    let filter =
        TransactionFilter::from_query(&query, state.window_year, &state.pagination_config)
            .map_err(|error| error.into_plain_text_response(message))?;

    get_combined(&state.db_connection, filter)
        .await
        .map(Json)
        .map_err(|error| error.into_plain_text_response(message))
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{
        Error,
        month::Month,
        pagination::PaginationConfig,
        test_utils::{drop_category_column, get_test_app_state, insert_test_transactions},
        transaction::{TransactionFilter, TransactionsQuery, test_utils::sale},
    };

    use super::get_combined;

    fn march_filter() -> TransactionFilter {
        TransactionFilter::from_query(
            &TransactionsQuery {
                month: Month::parse("03").unwrap(),
                page: None,
                per_page: None,
                search: String::new(),
            },
            2022,
            &PaginationConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn merges_all_four_results() {
        let state = get_test_app_state();
        insert_test_transactions(
            &state,
            &[
                sale(50.0, datetime!(2022-03-05 0:00 UTC), true, "A"),
                sale(150.0, datetime!(2022-03-10 0:00 UTC), false, "B"),
                sale(999.0, datetime!(2022-06-10 0:00 UTC), false, "C"),
            ],
        );

        let got = get_combined(&state.db_connection, march_filter())
            .await
            .unwrap();

        assert_eq!(got.transactions.len(), 2);
        assert_eq!(got.statistics.unwrap().total_amount, 200.0);
        assert_eq!(got.histogram.len(), 10);
        assert_eq!(got.histogram[0].count, 1);
        assert_eq!(got.histogram[1].count, 1);
        assert_eq!(got.breakdown.len(), 2);
    }

    #[tokio::test]
    async fn empty_month_has_null_statistics() {
        let state = get_test_app_state();

        let got = get_combined(&state.db_connection, march_filter())
            .await
            .unwrap();

        assert!(got.transactions.is_empty());
        assert_eq!(got.statistics, None);
        assert!(got.histogram.iter().all(|bucket| bucket.count == 0));
        assert!(got.breakdown.is_empty());
    }

    #[tokio::test]
    async fn fails_entirely_when_one_query_fails() {
        let state = get_test_app_state();
        insert_test_transactions(
            &state,
            &[sale(50.0, datetime!(2022-03-05 0:00 UTC), true, "A")],
        );
        // Statistics and the histogram do not read the category column.
        drop_category_column(&state);

        let result = get_combined(&state.db_connection, march_filter()).await;

        assert!(
            matches!(result, Err(Error::CombinedFetch(ref error)) if matches!(**error, Error::SqlError(_))),
            "got {result:?}"
        );
    }
}
