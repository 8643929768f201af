//! Filtered, ordered queries over the transaction table.

use rusqlite::{Connection, ToSql};
use serde::Deserialize;
use time::Date;

use crate::Error;

use super::core::{Transaction, TransactionType, format_date, iso_date, map_transaction_row};

/// The maximum number of transactions returned by the list endpoint.
pub(crate) const MAX_LISTED_TRANSACTIONS: u32 = 1000;

/// The order to sort transactions in a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}

/// Query string filters for listing transactions.
///
/// Both date bounds are inclusive. A range where `start_date` is after
/// `end_date` matches nothing.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct TransactionFilter {
    /// The earliest date to include.
    #[serde(default, with = "iso_date::option")]
    pub start_date: Option<Date>,
    /// The latest date to include.
    #[serde(default, with = "iso_date::option")]
    pub end_date: Option<Date>,
    /// Only include transactions of this type.
    #[serde(default)]
    pub transaction_type: Option<TransactionType>,
}

/// Query string filters for the summary and chart endpoints.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct DateRangeFilter {
    /// The earliest date to include.
    #[serde(default, with = "iso_date::option")]
    pub start_date: Option<Date>,
    /// The latest date to include.
    #[serde(default, with = "iso_date::option")]
    pub end_date: Option<Date>,
}

impl From<DateRangeFilter> for TransactionFilter {
    fn from(range: DateRangeFilter) -> Self {
        Self {
            start_date: range.start_date,
            end_date: range.end_date,
            transaction_type: None,
        }
    }
}

/// Get the transactions matching `filter`, sorted by date.
///
/// Transactions on the same date keep the order they were inserted in,
/// reversed for [SortOrder::Descending].
///
/// # Arguments
/// * `filter` - Inclusive date bounds and an optional transaction type
/// * `sort_order` - Sort direction for the date field
/// * `limit` - The maximum number of rows to return, `None` for all rows
/// * `connection` - Database connection reference
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub(crate) fn get_transactions(
    filter: &TransactionFilter,
    sort_order: SortOrder,
    limit: Option<u32>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    // Dates are stored as ISO 8601 text which sorts the same as the dates themselves.
    let start_date = filter.start_date.map(format_date);
    let end_date = filter.end_date.map(format_date);

    let mut conditions = Vec::new();
    let mut params: Vec<(&str, &dyn ToSql)> = Vec::new();

    if let Some(start_date) = &start_date {
        conditions.push("date >= :start_date");
        params.push((":start_date", start_date));
    }

    if let Some(end_date) = &end_date {
        conditions.push("date <= :end_date");
        params.push((":end_date", end_date));
    }

    if let Some(transaction_type) = &filter.transaction_type {
        conditions.push("type = :type");
        params.push((":type", transaction_type));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let direction = match sort_order {
        SortOrder::Ascending => "ASC",
        SortOrder::Descending => "DESC",
    };

    let limit_clause = limit
        .map(|limit| format!("LIMIT {limit}"))
        .unwrap_or_default();

    let query = format!(
        "SELECT id, type, amount, description, category, date, created_at FROM \"transaction\" \
        {where_clause} \
        ORDER BY date {direction}, rowid {direction} \
        {limit_clause}"
    );

    connection
        .prepare(&query)?
        .query_map(params.as_slice(), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}
