//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, month::to_millis};

// ============================================================================
// MODELS
// ============================================================================

/// A product listing and whether, and when, it was sold.
///
/// Serialized with the camel case keys of the seed dataset, e.g. `dateOfSale`.
/// Fields missing from the seed data fall back to their empty value. A
/// transaction without a sale date is stored but falls outside every month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID from the seed dataset. Uniqueness is not enforced.
    #[serde(default)]
    pub id: i64,
    /// The product name.
    #[serde(default)]
    pub title: String,
    /// A longer text description of the product.
    #[serde(default)]
    pub description: String,
    /// The listed price of the product.
    #[serde(default)]
    pub price: f64,
    /// When the sale happened.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date_of_sale: Option<OffsetDateTime>,
    /// Whether the product was sold.
    #[serde(default)]
    pub sold: bool,
    /// The product category, e.g. "electronics".
    #[serde(default)]
    pub category: String,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns selected by [map_transaction_row], in order.
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, title, description, price, date_of_sale, sold, category";

/// Create the transaction table in the database.
///
/// The table has no primary key on `id`: records keep SQLite's implicit
/// `rowid`, which gives the insertion order used for listing.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER NOT NULL,
                title TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                price REAL NOT NULL DEFAULT 0,
                date_of_sale INTEGER,
                sold INTEGER NOT NULL DEFAULT 0,
                category TEXT NOT NULL DEFAULT ''
                )",
        (),
    )?;

    // All queries filter on the month window.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_of_sale ON \"transaction\"(date_of_sale);",
        (),
    )?;

    Ok(())
}

/// Insert `transactions` into the database in a single SQL transaction.
///
/// Either every transaction is inserted or none are. Existing rows are left
/// untouched, so inserting the same records twice stores them twice.
///
/// # Errors
/// Returns [Error::SqlError] if any insert fails.
pub fn insert_transactions(
    transactions: &[Transaction],
    connection: &Connection,
) -> Result<usize, Error> {
    let tx = connection.unchecked_transaction()?;

    {
        let mut statement = tx.prepare(
            "INSERT INTO \"transaction\" (id, title, description, price, date_of_sale, sold, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;

        for transaction in transactions {
            statement.execute((
                transaction.id,
                &transaction.title,
                &transaction.description,
                transaction.price,
                transaction.date_of_sale.map(to_millis),
                transaction.sold,
                &transaction.category,
            ))?;
        }
    }

    tx.commit()?;

    Ok(transactions.len())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(*) FROM \"transaction\";", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Map a database row to a Transaction.
///
/// The row must contain the columns in [TRANSACTION_COLUMNS].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let date_of_sale = row
        .get::<_, Option<i64>>(4)?
        .map(|millis| {
            OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000).map_err(
                |error| rusqlite::Error::FromSqlConversionFailure(4, Type::Integer, Box::new(error)),
            )
        })
        .transpose()?;

    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        date_of_sale,
        sold: row.get(5)?,
        category: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        db::initialize,
        transaction::{Transaction, count_transactions, insert_transactions, test_utils::transaction},
    };

    use super::{TRANSACTION_COLUMNS, map_transaction_row};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn insert_stores_every_transaction() {
        let conn = get_test_connection();
        let transactions: Vec<Transaction> = (1..=20)
            .map(|i| transaction(i, i as f64, datetime!(2022-03-05 10:00 UTC)))
            .collect();

        let inserted = insert_transactions(&transactions, &conn).expect("Could not insert");

        assert_eq!(inserted, 20);
        assert_eq!(count_transactions(&conn).unwrap(), 20);
    }

    #[test]
    fn insert_does_not_deduplicate() {
        let conn = get_test_connection();
        let transactions = vec![transaction(1, 10.0, datetime!(2022-03-05 10:00 UTC))];

        insert_transactions(&transactions, &conn).unwrap();
        insert_transactions(&transactions, &conn).unwrap();

        assert_eq!(count_transactions(&conn).unwrap(), 2);
    }

    #[test]
    fn insert_is_all_or_nothing() {
        let conn = get_test_connection();
        conn.execute(
            "CREATE TRIGGER reject_negative BEFORE INSERT ON \"transaction\"
             WHEN NEW.price < 0 BEGIN SELECT RAISE(ABORT, 'negative price'); END",
            (),
        )
        .unwrap();
        let transactions = vec![
            transaction(1, 10.0, datetime!(2022-03-05 10:00 UTC)),
            transaction(2, -1.0, datetime!(2022-03-05 10:00 UTC)),
        ];

        let result = insert_transactions(&transactions, &conn);

        assert!(result.is_err());
        assert_eq!(count_transactions(&conn).unwrap(), 0);
    }

    #[test]
    fn stored_transaction_matches_original() {
        let conn = get_test_connection();
        let want = Transaction {
            id: 7,
            title: "Mens Casual Slim Fit".to_owned(),
            description: "The color could be slightly different".to_owned(),
            price: 15.99,
            date_of_sale: Some(datetime!(2022-07-27 20:29:54.123 +05:30)),
            sold: true,
            category: "men's clothing".to_owned(),
        };
        insert_transactions(std::slice::from_ref(&want), &conn).unwrap();

        let got = conn
            .query_row(
                &format!("SELECT {TRANSACTION_COLUMNS} FROM \"transaction\""),
                [],
                map_transaction_row,
            )
            .unwrap();

        assert_eq!(want, got);
    }

    #[test]
    fn stores_transaction_without_date_of_sale() {
        let conn = get_test_connection();
        let want = Transaction {
            date_of_sale: None,
            ..transaction(3, 20.0, datetime!(2022-03-05 10:00 UTC))
        };
        insert_transactions(std::slice::from_ref(&want), &conn).unwrap();

        let got = conn
            .query_row(
                &format!("SELECT {TRANSACTION_COLUMNS} FROM \"transaction\""),
                [],
                map_transaction_row,
            )
            .unwrap();

        assert_eq!(want, got);
    }
}
