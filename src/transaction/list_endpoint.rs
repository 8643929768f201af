//! Defines the endpoint for listing transactions.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::Error;

use super::{
    TransactionState,
    core::Transaction,
    query::{MAX_LISTED_TRANSACTIONS, SortOrder, TransactionFilter, get_transactions},
};

/// A route handler for listing transactions, most recent first.
///
/// At most [MAX_LISTED_TRANSACTIONS] transactions are returned.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    query: Result<Query<TransactionFilter>, QueryRejection>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let Query(filter) = query?;

    let connection = state.connection()?;
    let transactions = get_transactions(
        &filter,
        SortOrder::Descending,
        Some(MAX_LISTED_TRANSACTIONS),
        &connection,
    )?;

    Ok(Json(transactions))
}
