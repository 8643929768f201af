//! Defines the core data models and database queries for transactions.

use std::{fmt, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Type, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};
use uuid::Uuid;

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// The unique, server generated ID of a transaction.
pub type TransactionId = Uuid;

/// Whether a transaction earned or spent money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was earned.
    Income,
    /// Money that was spent.
    Expense,
}

impl TransactionType {
    /// The lowercase name used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The string was not one of the known transaction types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown transaction type \"{0}\", expected \"income\" or \"expense\"")]
pub struct UnknownTransactionType(String);

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(UnknownTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// A free-text grouping such as "Rent" or "Consulting".
    pub category: Option<String>,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// When the transaction was recorded by the server.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        transaction_type: TransactionType,
        amount: f64,
        date: Date,
        description: &str,
    ) -> TransactionBuilder {
        TransactionBuilder {
            transaction_type,
            amount,
            date,
            description: description.to_owned(),
            category: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The ID and creation time are assigned by [create_transaction].
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Whether money was earned or spent.
    pub transaction_type: TransactionType,

    /// The monetary amount of the transaction.
    ///
    /// Amounts are always non-negative, the direction of the money is given
    /// by `transaction_type`.
    pub amount: f64,

    /// The date when the transaction occurred.
    ///
    /// This is the business date of the transaction, not when it was
    /// recorded in the system.
    pub date: Date,

    /// A human-readable description of the transaction.
    pub description: String,

    /// An optional free-text category.
    pub category: Option<String>,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }
}

// ============================================================================
// STORAGE CONVERSIONS
// ============================================================================

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Format a date as an ISO 8601 calendar date, e.g. "2024-01-15".
pub fn format_date(date: Date) -> String {
    // `Date`'s display implementation is already YYYY-MM-DD.
    date.to_string()
}

/// The text was not a calendar date in the form "YYYY-MM-DD".
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidDate {
    /// The text did not match the date format or named a day that does not exist.
    #[error(transparent)]
    Format(#[from] time::error::Parse),
    /// The year had a sign, i.e. it was outside 0000 to 9999.
    #[error("the year must be between 0000 and 9999")]
    YearOutOfRange,
}

/// Parse an ISO 8601 calendar date such as "2024-01-15".
///
/// Only four digit, unsigned years are accepted so that the stored text sorts
/// in date order.
pub fn parse_date(text: &str) -> Result<Date, InvalidDate> {
    if text.starts_with(['+', '-']) {
        return Err(InvalidDate::YearOutOfRange);
    }

    Ok(Date::parse(text, DATE_FORMAT)?)
}

/// Format a timestamp as an RFC 3339 string with its UTC offset.
pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, time::error::Format> {
    timestamp.format(&Rfc3339)
}

/// Parse an RFC 3339 timestamp.
pub fn parse_timestamp(text: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(text, &Rfc3339)
}

/// Serde support for dates as "YYYY-MM-DD" strings.
pub(crate) mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer, de};
    use time::Date;

    use super::{format_date, parse_date};

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_date(&text)
            .map_err(|error| de::Error::custom(format!("invalid date \"{text}\": {error}")))
    }

    /// Serde support for optional dates, e.g. query string filters.
    pub mod option {
        use serde::{Deserialize, Deserializer, de};
        use time::Date;

        use super::parse_date;

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            // An empty value, e.g. "?start_date=", means no filter.
            Option::<String>::deserialize(deserializer)?
                .filter(|text| !text.is_empty())
                .map(|text| {
                    parse_date(&text).map_err(|error| {
                        de::Error::custom(format!("invalid date \"{text}\": {error}"))
                    })
                })
                .transpose()
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// The ID is a fresh UUID and the creation time is the current UTC time.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] if the amount is negative or not a finite number,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if !builder.amount.is_finite() || builder.amount < 0.0 {
        return Err(Error::Validation(format!(
            "amount must be a non-negative number, got {}",
            builder.amount
        )));
    }

    let transaction = Transaction {
        id: Uuid::new_v4(),
        transaction_type: builder.transaction_type,
        amount: builder.amount,
        description: builder.description,
        category: builder.category,
        date: builder.date,
        created_at: OffsetDateTime::now_utc(),
    };

    connection.execute(
        "INSERT INTO \"transaction\" (id, type, amount, description, category, date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            transaction.id.to_string(),
            transaction.transaction_type,
            transaction.amount,
            &transaction.description,
            &transaction.category,
            format_date(transaction.date),
            format_timestamp(transaction.created_at)?,
        ),
    )?;

    tracing::debug!(
        "Created {} transaction {} on {}",
        transaction.transaction_type,
        transaction.id,
        transaction.date
    );

    Ok(transaction)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id TEXT PRIMARY KEY,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                amount REAL NOT NULL,
                description TEXT NOT NULL,
                category TEXT,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    // Every query filters and sorts on date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// Expects the columns id, type, amount, description, category, date and
/// created_at, in that order.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id: String = row.get(0)?;
    let transaction_type = row.get(1)?;
    let amount = row.get(2)?;
    let description = row.get(3)?;
    let category = row.get(4)?;
    let date: String = row.get(5)?;
    let created_at: String = row.get(6)?;

    Ok(Transaction {
        id: Uuid::parse_str(&id).map_err(|error| conversion_error(0, error))?,
        transaction_type,
        amount,
        description,
        category,
        date: parse_date(&date).map_err(|error| conversion_error(5, error))?,
        created_at: parse_timestamp(&created_at).map_err(|error| conversion_error(6, error))?,
    })
}

fn conversion_error(
    column: usize,
    error: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(error))
}

// ============================================================================
// TESTS
// ============================================================================
