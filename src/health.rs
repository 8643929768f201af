//! The service identity endpoint.

use axum::Json;

use crate::message::Message;

/// The name the service reports about itself.
pub const SERVICE_NAME: &str = "Balance Sheet API";

/// A route handler that reports the service identity, used as a health check.
pub async fn get_health() -> Json<Message> {
    Json(Message::new(SERVICE_NAME))
}
