//! The API endpoints URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The page showing the transactions, statistics and charts for a month.
pub const DASHBOARD_VIEW: &str = "/dashboard";

/// The route that seeds the database from the remote dataset.
pub const INITIALIZE: &str = "/initialize";
/// The route for listing the transactions in a month.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for the statistics of a month.
pub const STATISTICS: &str = "/statistics";
/// The route for the price range histogram of a month.
pub const BARCHART: &str = "/barchart";
/// The route for the category breakdown of a month.
pub const PIECHART: &str = "/piechart";
/// The route for all of the above in a single response.
pub const COMBINED: &str = "/combined";
