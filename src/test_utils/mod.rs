#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod http;

use rusqlite::Connection;

use crate::{
    AppState, pagination::PaginationConfig, transaction::Transaction,
    transaction::insert_transactions,
};

pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment, select_text};
pub(crate) use http::assert_content_type;

/// App state backed by an empty in-memory database.
///
/// The seed URL points at a closed port so that seeding fails unless a test
/// overrides it.
pub(crate) fn get_test_app_state() -> AppState {
    let conn = Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(
        conn,
        "http://127.0.0.1:9/seed.json",
        2022,
        PaginationConfig::default(),
    )
    .expect("Could not create app state")
}

pub(crate) fn insert_test_transactions(state: &AppState, transactions: &[Transaction]) {
    let connection = state
        .db_connection
        .lock()
        .expect("Could not acquire database lock");

    insert_transactions(transactions, &connection).expect("Could not insert transactions");
}

/// Break the `category` column so that only the queries reading it fail.
pub(crate) fn drop_category_column(state: &AppState) {
    state
        .db_connection
        .lock()
        .expect("Could not acquire database lock")
        .execute("ALTER TABLE \"transaction\" DROP COLUMN category", ())
        .expect("Could not drop category column");
}
