//! Application router configuration.

use axum::{Router, response::Redirect, routing::get};

use crate::{
    AppState,
    breakdown::get_category_breakdown_endpoint,
    combined::get_combined_endpoint,
    dashboard::get_dashboard_page,
    endpoints,
    histogram::get_price_histogram_endpoint,
    not_found::get_404_not_found,
    seed::get_initialize,
    statistics::get_statistics_endpoint,
    transaction::get_transactions,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(endpoints::INITIALIZE, get(get_initialize))
        .route(endpoints::TRANSACTIONS, get(get_transactions))
        .route(endpoints::STATISTICS, get(get_statistics_endpoint))
        .route(endpoints::BARCHART, get(get_price_histogram_endpoint))
        .route(endpoints::PIECHART, get(get_category_breakdown_endpoint))
        .route(endpoints::COMBINED, get(get_combined_endpoint));

    let view_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page));

    view_routes
        .merge(api_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
