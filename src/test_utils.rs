//! Shared fixtures for unit tests.

use axum::{body::Body, http::Response};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState,
    transaction::{Transaction, TransactionState, TransactionType, create_transaction},
};

#[track_caller]
pub(crate) fn get_test_app_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    AppState::new(connection).expect("Could not initialize database")
}

#[track_caller]
pub(crate) fn get_test_state() -> TransactionState {
    TransactionState {
        db_connection: get_test_app_state().db_connection,
    }
}

#[track_caller]
pub(crate) fn create_test_transaction(
    state: &TransactionState,
    transaction_type: TransactionType,
    amount: f64,
    date: Date,
) -> Transaction {
    let connection = state
        .db_connection
        .lock()
        .expect("Could not acquire database connection");

    create_transaction(
        Transaction::build(transaction_type, amount, date, "test transaction"),
        &connection,
    )
    .expect("Could not create test transaction")
}

pub(crate) async fn parse_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    serde_json::from_slice(&body).expect("Response body is not JSON")
}
