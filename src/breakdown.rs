//! Counts of the transactions in a month by category, for the pie chart.

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
    month::MonthWindow,
    statistics::MonthQuery,
};

/// The number of transactions in a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category name.
    #[serde(rename = "_id")]
    pub category: String,
    /// The number of transactions in the category.
    pub count: u64,
}

/// Count the transactions in `window` per distinct category.
///
/// Categories with no transactions in the window are left out.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_category_breakdown(
    window: MonthWindow,
    connection: &Connection,
) -> Result<Vec<CategoryCount>, Error> {
    let (start, end) = window.as_millis();

    connection
        .prepare(
            "SELECT category, COUNT(*) FROM \"transaction\"
            WHERE date_of_sale >= ?1 AND date_of_sale < ?2
            GROUP BY category",
        )?
        .query_map((start, end), |row| {
            Ok(CategoryCount {
                category: row.get(0)?,
                count: get_count(row, 1)?,
            })
        })?
        .map(|row| row.map_err(Error::from))
        .collect()
}

/// Route handler for the category breakdown of a month.
pub async fn get_category_breakdown_endpoint(
    State(state): State<QueryState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<CategoryCount>>, Response> {
    let message = "Error fetching pie chart data.";

    let window = query
        .month
        .window(state.window_year)
        .map_err(|error| error.into_plain_text_response(message))?;
    let connection = lock_connection(&state.db_connection)
        .map_err(|error| error.into_plain_text_response(message))?;

    get_category_breakdown(window, &connection)
        .map(Json)
        .map_err(|error| error.into_plain_text_response(message))
}


#[cfg(test)]
mod handler_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use time::macros::datetime;

    use crate::{
        build_router, endpoints,
        test_utils::{drop_category_column, get_test_app_state, insert_test_transactions},
        transaction::test_utils::sale,
    };

    #[tokio::test]
    async fn returns_breakdown_with_id_keys() {
        let state = get_test_app_state();
        insert_test_transactions(
            &state,
            &[sale(50.0, datetime!(2022-03-05 0:00 UTC), true, "A")],
        );
        let server = TestServer::new(build_router(state));

        let response = server
            .get(endpoints::PIECHART)
            .add_query_param("month", "03")
            .await;

        response.assert_status_ok();
        response.assert_json(&serde_json::json!([{"_id": "A", "count": 1}]));
    }

    #[tokio::test]
    async fn store_failure_is_internal_server_error() {
        let state = get_test_app_state();
        drop_category_column(&state);
        let server = TestServer::new(build_router(state));

        let response = server
            .get(endpoints::PIECHART)
            .add_query_param("month", "03")
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_text("Error fetching pie chart data.");
    }
}
