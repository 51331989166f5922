//! Defines the endpoint for fetching a single transaction by id.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState,
    transaction::core::{get_transaction, parse_transaction_id},
};

/// The state needed to fetch a transaction.
#[derive(Debug, Clone)]
pub struct GetTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for fetching a transaction by its id.
///
/// Responds 200 with the record, 400 `invalid_id` for a non-numeric path id,
/// or 404 when the id does not refer to a live transaction.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_transaction_endpoint(
    State(state): State<GetTransactionState>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_transaction_id(&id) {
        Ok(id) => id,
        Err(error) => return error.into_response(),
    };

    let connection = state.db_connection.lock().unwrap();

    match get_transaction(id, &connection) {
        Ok(transaction) => Json(transaction).into_response(),
        Err(error) => error.into_response(),
    }
}
