//! Transactions: the product sales that every query is run against.
//!
//! This module contains:
//! - The `Transaction` model and its database table
//! - The bulk insert used to seed the database
//! - The paged, searchable transaction list and its route handler

mod core;
mod list;
mod search;

pub use core::{Transaction, create_transaction_table, insert_transactions};
pub use list::{TransactionFilter, TransactionsQuery, get_transactions, list_transactions};
pub use search::{SearchPattern, register_regexp_function};

#[cfg(test)]
pub use core::count_transactions;

#[cfg(test)]
pub(crate) mod test_utils;
