//! Counts of the transactions in a month by price range, for the bar chart.

use axum::{
    Json,
    extract::{Query, State},
    response::Response,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error, app_state::QueryState, db::lock_connection, month::MonthWindow,
    statistics::MonthQuery,
};

/// A price bucket covering `[min, max)`, or `[min, ∞)` when `max` is `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    /// The label shown on the chart axis.
    pub label: &'static str,
    /// The inclusive lower bound.
    pub min: f64,
    /// The exclusive upper bound.
    pub max: Option<f64>,
}

impl PriceRange {
    const fn new(label: &'static str, min: f64, max: Option<f64>) -> Self {
        Self { label, min, max }
    }

    /// Whether `price` falls in this range.
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && self.max.is_none_or(|max| price < max)
    }
}

/// The fixed histogram buckets in display order.
///
/// Ranges after the first start one above the previous upper bound, so
/// prices in `[100, 101)`, `[200, 201)` and so on are not counted.
pub const PRICE_RANGES: [PriceRange; 10] = [
    PriceRange::new("0-100", 0.0, Some(100.0)),
    PriceRange::new("101-200", 101.0, Some(200.0)),
    PriceRange::new("201-300", 201.0, Some(300.0)),
    PriceRange::new("301-400", 301.0, Some(400.0)),
    PriceRange::new("401-500", 401.0, Some(500.0)),
    PriceRange::new("501-600", 501.0, Some(600.0)),
    PriceRange::new("601-700", 601.0, Some(700.0)),
    PriceRange::new("701-800", 701.0, Some(800.0)),
    PriceRange::new("801-900", 801.0, Some(900.0)),
    PriceRange::new("901-above", 901.0, None),
];

/// The number of transactions whose price falls in a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRangeCount {
    /// The label of the [PriceRange].
    pub range: String,
    /// The number of transactions in the range.
    pub count: u64,
}

/// Count the transactions in `window` for each of the [PRICE_RANGES].
///
/// Every range is returned in order, including those with a count of zero.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_price_histogram(
    window: MonthWindow,
    connection: &Connection,
) -> Result<Vec<PriceRangeCount>, Error> {
    let (start, end) = window.as_millis();
    let mut counts = [0u64; PRICE_RANGES.len()];

    let mut statement = connection.prepare(
        "SELECT price FROM \"transaction\" WHERE date_of_sale >= ?1 AND date_of_sale < ?2",
    )?;
    let prices = statement.query_map((start, end), |row| row.get::<_, f64>(0))?;

    for price in prices {
        let price = price?;

        if let Some(index) = PRICE_RANGES.iter().position(|range| range.contains(price)) {
            counts[index] += 1;
        }
    }

    Ok(PRICE_RANGES
        .iter()
        .zip(counts)
        .map(|(range, count)| PriceRangeCount {
            range: range.label.to_owned(),
            count,
        })
        .collect())
}

/// Route handler for the price histogram of a month.
pub async fn get_price_histogram_endpoint(
    State(state): State<QueryState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<PriceRangeCount>>, Response> {
    let message = "Error fetching bar chart data.";

    let window = query
        .month
        .window(state.window_year)
        .map_err(|error| error.into_plain_text_response(message))?;
    let connection = lock_connection(&state.db_connection)
        .map_err(|error| error.into_plain_text_response(message))?;

    get_price_histogram(window, &connection)
        .map(Json)
        .map_err(|error| error.into_plain_text_response(message))
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        db::initialize,
        month::Month,
        transaction::{insert_transactions, test_utils::transaction},
    };

    use super::{PRICE_RANGES, PriceRangeCount, get_price_histogram};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn counts(histogram: &[PriceRangeCount]) -> Vec<u64> {
        histogram.iter().map(|bucket| bucket.count).collect()
    }

    #[test]
    fn empty_month_has_every_range_with_zero_count() {
        let conn = get_test_connection();
        let window = Month::DEFAULT.window(2022).unwrap();

        let got = get_price_histogram(window, &conn).unwrap();

        let labels: Vec<&str> = got.iter().map(|bucket| bucket.range.as_str()).collect();
        assert_eq!(
            labels,
            [
                "0-100",
                "101-200",
                "201-300",
                "301-400",
                "401-500",
                "501-600",
                "601-700",
                "701-800",
                "801-900",
                "901-above"
            ]
        );
        assert_eq!(counts(&got), [0; 10]);
    }

    #[test]
    fn counts_prices_into_ranges() {
        let conn = get_test_connection();
        let date = datetime!(2022-03-05 0:00 UTC);
        insert_transactions(
            &[
                transaction(1, 50.0, date),
                transaction(2, 150.0, date),
                transaction(3, 0.0, date),
                transaction(4, 99.99, date),
                transaction(5, 101.0, date),
                transaction(6, 899.5, date),
                transaction(7, 901.0, date),
                transaction(8, 25_000.0, date),
                transaction(9, 50.0, datetime!(2022-04-05 0:00 UTC)),
            ],
            &conn,
        )
        .unwrap();
        let window = Month::DEFAULT.window(2022).unwrap();

        let got = get_price_histogram(window, &conn).unwrap();

        assert_eq!(counts(&got), [3, 2, 0, 0, 0, 0, 0, 0, 1, 2]);
    }

    #[test]
    fn prices_between_ranges_are_not_counted() {
        let conn = get_test_connection();
        let date = datetime!(2022-03-05 0:00 UTC);
        insert_transactions(
            &[
                transaction(1, 100.0, date),
                transaction(2, 100.5, date),
                transaction(3, 200.0, date),
                transaction(4, 900.0, date),
            ],
            &conn,
        )
        .unwrap();
        let window = Month::DEFAULT.window(2022).unwrap();

        let got = get_price_histogram(window, &conn).unwrap();

        assert_eq!(counts(&got).iter().sum::<u64>(), 0);
    }

    #[test]
    fn counts_sum_to_number_of_transactions_in_month() {
        let conn = get_test_connection();
        let transactions: Vec<_> = (0..30)
            .map(|i| {
                let price = (i * 37 % 1_000 + 1) as f64 + 0.5;
                transaction(i, price, datetime!(2022-03-10 0:00 UTC))
            })
            .filter(|transaction| {
                PRICE_RANGES
                    .iter()
                    .any(|range| range.contains(transaction.price))
            })
            .collect();
        insert_transactions(&transactions, &conn).unwrap();
        let window = Month::DEFAULT.window(2022).unwrap();

        let got = get_price_histogram(window, &conn).unwrap();

        assert_eq!(counts(&got).iter().sum::<u64>(), transactions.len() as u64);
    }

    #[test]
    fn serializes_range_and_count() {
        let json = serde_json::to_value(PriceRangeCount {
            range: "0-100".to_owned(),
            count: 1,
        })
        .unwrap();

        assert_eq!(json, serde_json::json!({"range": "0-100", "count": 1}));
    }
}
