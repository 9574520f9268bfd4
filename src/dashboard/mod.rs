//! Dashboard module
//!
//! Provides a page showing the transactions, statistics and charts for a
//! selected month.

mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
