//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for rendering the full page and the htmx fragment
//! - State and query types used by the handler

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRequest;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    combined::{Combined, get_combined},
    dashboard::{
        charts::{
            ChartSeries, DashboardChart, category_chart, charts_script, charts_view,
            price_range_chart,
        },
        tables::{statistics_summary, transactions_table},
    },
    endpoints,
    html::{FORM_LABEL_STYLE, FORM_SELECT_STYLE, PAGE_CONTAINER_STYLE, base},
    month::Month,
    pagination::{Page, PaginationConfig},
    transaction::{SearchPattern, TransactionFilter},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for querying transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The year that month windows are built in.
    pub window_year: i32,
    /// The page size of the transaction table.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            window_year: state.window_year,
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query string parameters for the dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The month to display, March if not specified.
    pub month: Option<Month>,
}

/// Display the transactions, statistics and charts for a month.
///
/// htmx requests get just the dashboard content so that it can be swapped
/// into the existing page.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let month = query.month.unwrap_or_default();

    let (status, content) = match load_dashboard_data(&state, month).await {
        Ok(data) => (StatusCode::OK, dashboard_content(&data, month)),
        Err(error) => {
            tracing::error!("Could not load dashboard data for month {month}: {error}");
            (StatusCode::INTERNAL_SERVER_ERROR, dashboard_error_content())
        }
    };

    if is_htmx_request {
        (status, content).into_response()
    } else {
        (status, dashboard_view(month, &content)).into_response()
    }
}

/// Load the first page of transactions and the aggregates for `month`.
async fn load_dashboard_data(state: &DashboardState, month: Month) -> Result<Combined, Error> {
    let filter = TransactionFilter {
        window: month.window(state.window_year)?,
        page: Page::new(None, None, &state.pagination_config),
        search: SearchPattern::default(),
    };

    get_combined(&state.db_connection, filter).await
}

/// Renders the charts, statistics and transaction table.
fn dashboard_content(data: &Combined, month: Month) -> Markup {
    let month_name = month.name();
    let charts = [
        DashboardChart {
            id: "price-range-chart",
            options: price_range_chart(&ChartSeries::from_histogram(&data.histogram), &month_name)
                .to_string(),
        },
        DashboardChart {
            id: "category-chart",
            options: category_chart(&ChartSeries::from_breakdown(&data.breakdown), &month_name)
                .to_string(),
        },
    ];

    html!(
        (statistics_summary(data.statistics.as_ref(), &month_name))
        (charts_view(&charts))
        (transactions_table(&data.transactions))
        (charts_script(&charts))
    )
}

fn dashboard_error_content() -> Markup {
    html!(
        p
            id="dashboard-error"
            class="text-xl font-semibold text-red-600 dark:text-red-400"
        {
            "Error fetching data"
        }
    )
}

/// Renders the full dashboard page with the month selector around `content`.
fn dashboard_view(selected_month: Month, content: &Markup) -> Markup {
    let page = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                h1 class="text-2xl font-bold mb-6" { "Transaction Dashboard" }

                div class="flex items-center gap-4 mb-8"
                {
                    label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                    select
                        id="month"
                        name="month"
                        class=(FORM_SELECT_STYLE)
                        hx-get=(endpoints::DASHBOARD_VIEW)
                        hx-trigger="change"
                        hx-target="#dashboard-content"
                        hx-swap="innerHTML"
                        hx-indicator="#loading-indicator"
                    {
                        @for month in Month::all() {
                            option value=(month) selected[month == selected_month] {
                                (month.name())
                            }
                        }
                    }

                    span id="loading-indicator" class="htmx-indicator" { "Loading..." }
                }

                div id="dashboard-content" class="w-full"
                {
                    (content)
                }
            }
        }
    );

    base("Dashboard", &page)
}
