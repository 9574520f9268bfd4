use time::OffsetDateTime;

use super::Transaction;

/// An unsold transaction in the "test" category with placeholder text.
pub(crate) fn transaction(id: i64, price: f64, date_of_sale: OffsetDateTime) -> Transaction {
    Transaction {
        id,
        title: format!("Product #{id}"),
        description: format!("Description of product #{id}"),
        price,
        date_of_sale: Some(date_of_sale),
        sold: false,
        category: "test".to_owned(),
    }
}

/// A transaction with the sale status and category that the aggregates group by.
pub(crate) fn sale(
    price: f64,
    date_of_sale: OffsetDateTime,
    sold: bool,
    category: &str,
) -> Transaction {
    Transaction {
        sold,
        category: category.to_owned(),
        ..transaction(0, price, date_of_sale)
    }
}
