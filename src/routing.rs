//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::Response,
    routing::{delete, get},
};

use crate::{
    AppState, endpoints,
    error::{ErrorBody, json_error_body},
    health::get_health,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_chart_data_endpoint,
        get_summary_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_health))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::TRANSACTION_SUMMARY, get(get_summary_endpoint))
        .route(endpoints::CHART_DATA, get(get_chart_data_endpoint))
        .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
        .fallback(get_404_not_found)
        .layer(middleware::map_response(json_error_body))
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    ErrorBody::response(StatusCode::NOT_FOUND, "Not Found")
}
