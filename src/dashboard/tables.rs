//! Table views for dashboard data display.
//!
//! Provides the transaction table and the monthly statistics summary.

use maud::{Markup, html};
use time::{OffsetDateTime, macros::format_description};

use crate::{
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    statistics::Statistics,
    transaction::Transaction,
};

const SUMMARY_CARD_STYLE: &str = "p-4 bg-white rounded-lg shadow dark:bg-gray-800";
const SUMMARY_LABEL_STYLE: &str = "text-sm text-gray-500 dark:text-gray-400";
const SUMMARY_VALUE_STYLE: &str = "text-2xl font-bold";

/// Formats a sale date as "DD/MM/YYYY".
pub(super) fn format_sale_date(date_of_sale: OffsetDateTime) -> String {
    date_of_sale
        .format(format_description!("[day]/[month]/[year]"))
        .unwrap_or_else(|error| {
            tracing::error!("could not format sale date {date_of_sale}: {error}");
            date_of_sale.date().to_string()
        })
}

/// Renders a table with one row per transaction.
pub(super) fn transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        div class="w-full mb-8" {
            h3 class="text-xl font-semibold mb-4" { "Transactions" }

            div class="overflow-x-auto rounded-lg shadow" {
                table
                    id="transactions-table"
                    class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "ID" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Price" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date of Sale" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Sold" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        }
                    }
                    tbody {
                        @for transaction in transactions {
                            tr class=(TABLE_ROW_STYLE) {
                                td class=(TABLE_CELL_STYLE) { (transaction.id) }
                                td class=(TABLE_CELL_STYLE) { (transaction.title) }
                                td class=(TABLE_CELL_STYLE) { (transaction.description) }
                                td class={(TABLE_CELL_STYLE) " whitespace-nowrap"} {
                                    (format_currency(transaction.price))
                                }
                                td class={(TABLE_CELL_STYLE) " whitespace-nowrap"} {
                                    @if let Some(date_of_sale) = transaction.date_of_sale {
                                        (format_sale_date(date_of_sale))
                                    }
                                }
                                td class=(TABLE_CELL_STYLE) {
                                    @if transaction.sold { "Yes" } @else { "No" }
                                }
                                td class=(TABLE_CELL_STYLE) { (transaction.category) }
                            }
                        }

                        @if transactions.is_empty() {
                            tr class=(TABLE_ROW_STYLE) {
                                td colspan="7" class={(TABLE_CELL_STYLE) " text-center"} {
                                    "No transactions found."
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the total sale amount and the sold and not sold item counts.
///
/// A month with no statistics shows zero for every figure.
pub(super) fn statistics_summary(statistics: Option<&Statistics>, month_name: &str) -> Markup {
    let Statistics {
        total_amount,
        total_sold_items,
        total_not_sold_items,
    } = statistics.cloned().unwrap_or_default();

    html! {
        section id="statistics" class="w-full mb-8" {
            h3 class="text-xl font-semibold mb-4" { "Statistics - " (month_name) }

            dl class="grid grid-cols-1 md:grid-cols-3 gap-4" {
                div class=(SUMMARY_CARD_STYLE) {
                    dt class=(SUMMARY_LABEL_STYLE) { "Total sale" }
                    dd id="total-amount" class=(SUMMARY_VALUE_STYLE) {
                        (format_currency(total_amount))
                    }
                }
                div class=(SUMMARY_CARD_STYLE) {
                    dt class=(SUMMARY_LABEL_STYLE) { "Total sold items" }
                    dd id="total-sold-items" class=(SUMMARY_VALUE_STYLE) { (total_sold_items) }
                }
                div class=(SUMMARY_CARD_STYLE) {
                    dt class=(SUMMARY_LABEL_STYLE) { "Total not sold items" }
                    dd id="total-not-sold-items" class=(SUMMARY_VALUE_STYLE) { (total_not_sold_items) }
                }
            }
        }
    }
}
