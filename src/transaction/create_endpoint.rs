//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

use super::{
    TransactionState,
    core::{Transaction, TransactionType, create_transaction, iso_date},
};

/// The JSON body for creating a transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The value of the transaction.
    pub amount: f64,
    /// Text detailing the transaction.
    pub description: String,
    /// An optional free-text category.
    #[serde(default)]
    pub category: Option<String>,
    /// The date when the transaction occurred.
    #[serde(with = "iso_date")]
    pub date: Date,
}

/// A route handler for creating a new transaction, responds with the stored transaction.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<Json<Transaction>, Error> {
    let Json(request) = payload?;

    let builder = Transaction::build(
        request.transaction_type,
        request.amount,
        request.date,
        &request.description,
    )
    .category(request.category);

    let connection = state.connection()?;
    let transaction = create_transaction(builder, &connection)?;

    Ok(Json(transaction))
}
