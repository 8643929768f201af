use axum::{
    Json,
    extract::{Path, State},
};
use rusqlite::Connection;

use crate::{Error, message::Message};

use super::TransactionState;

/// A route handler for deleting a transaction.
///
/// Responds with [Error::NotFound] if no transaction has the ID `transaction_id`.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Message>, Error> {
    let connection = state.connection()?;

    match delete_transaction(&transaction_id, &connection)? {
        0 => Err(Error::NotFound),
        _ => {
            tracing::debug!("Deleted transaction {transaction_id}");
            Ok(Json(Message::new("Transaction deleted successfully")))
        }
    }
}

type RowsAffected = usize;

fn delete_transaction(id: &str, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", id)])
        .map_err(|err| err.into())
}
