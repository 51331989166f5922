//! Defines the endpoint for updating a transaction's status.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, timestamp,
    transaction::{
        TransactionStatus,
        core::{parse_transaction_id, update_transaction_status},
    },
};

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for updating a transaction.
///
/// Status is the only mutable field; `user_id` and `amount` are immutable
/// after creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateTransactionRequest {
    /// The new status, one of `pending`, `success` or `failed`.
    pub status: String,
}

/// A route handler for updating a transaction's status.
///
/// Responds 200 with the updated record, 400 for an invalid id or status, or
/// 404 when the id does not refer to a live transaction.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn update_transaction_endpoint(
    State(state): State<UpdateTransactionState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTransactionRequest>, JsonRejection>,
) -> Response {
    let id = match parse_transaction_id(&id) {
        Ok(id) => id,
        Err(error) => return error.into_response(),
    };

    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return Error::Validation(rejection.body_text()).into_response(),
    };

    let status = match request.status.parse::<TransactionStatus>() {
        Ok(status) => status,
        Err(error) => return error.into_response(),
    };

    let connection = state.db_connection.lock().unwrap();

    match update_transaction_status(id, status, timestamp::now_utc(), &connection) {
        Ok(transaction) => {
            tracing::info!(
                transaction_id = transaction.id,
                new_status = %transaction.status,
                "Transaction updated"
            );

            Json(transaction).into_response()
        }
        Err(error) => error.into_response(),
    }
}
