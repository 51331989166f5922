//! Application router configuration with versioned and legacy route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::cors::CorsLayer;

use crate::{
    AppState, ErrorBody,
    dashboard::dashboard_summary_endpoint,
    endpoints,
    health::health_endpoint,
    logging::logging_middleware,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        list_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// The API routes are served under [endpoints::API_V1] and, for backwards
/// compatibility with older clients, at the unversioned root as well.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest(endpoints::API_V1, api_routes())
        .merge(api_routes())
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The API routes, without a version prefix.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(endpoints::HEALTH, get(health_endpoint))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(endpoints::DASHBOARD_SUMMARY, get(dashboard_summary_endpoint))
}

/// Respond with a JSON 404 body for routes that do not exist.
async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "not_found".to_owned(),
            message: Some("The requested resource does not exist.".to_owned()),
            details: None,
        }),
    )
        .into_response()
}
