//! Database initialization and access to the shared connection.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row, types::Type};

use crate::{
    Error,
    transaction::{create_transaction_table, register_regexp_function},
};

/// Acquire the lock on the shared database connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned.
pub(crate) fn lock_connection(
    db_connection: &Arc<Mutex<Connection>>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}

/// Read the non-negative integer in column `index` of `row`, e.g. a `COUNT(*)`.
///
/// # Errors
/// Returns [rusqlite::Error::FromSqlConversionFailure] if the value is negative.
pub(crate) fn get_count(row: &Row, index: usize) -> Result<u64, rusqlite::Error> {
    let value: i64 = row.get(index)?;

    u64::try_from(value).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Integer, Box::new(error))
    })
}

/// Prepare `connection` for use by the application.
///
/// Registers the `REGEXP` function used by the transaction search and creates
/// the transaction table if it does not already exist. Functions are
/// registered per connection, so this must be called on every connection the
/// application opens.
///
/// # Errors
/// Returns an [Error::SqlError] if the function cannot be registered or the
/// table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    register_regexp_function(connection)?;
    create_transaction_table(connection)?;

    Ok(())
}
