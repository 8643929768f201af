//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - The conversions between typed values and their stored text form
//! - Database functions for storing, querying, and deleting transactions
//! - The summary and chart aggregations
//! - Route handlers for the transaction endpoints

mod chart;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;
mod query;
mod summary;

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{AppState, Error};

pub use chart::{ChartData, aggregate_by_day, get_chart_data_endpoint};
pub use core::{Transaction, TransactionType, create_transaction_table};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use query::{DateRangeFilter, TransactionFilter};
pub use summary::{Summary, get_summary_endpoint, summarize};

#[cfg(test)]
pub use core::{count_transactions, create_transaction};

/// The state needed by the transaction route handlers.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

impl TransactionState {
    /// Lock the database connection for the duration of a single query.
    ///
    /// # Errors
    /// Returns [Error::DatabaseLockError] if the lock is poisoned.
    pub(crate) fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)
    }
}
