//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, timestamp, transaction::core::create_transaction};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    /// The user the transaction belongs to. Must be a positive integer.
    pub user_id: i64,
    /// The amount of money moved. Must be greater than zero.
    pub amount: f64,
}

/// A route handler for creating a new transaction.
///
/// Responds 201 with the created record, or 400 with a validation error when
/// the body is malformed or a field constraint is violated. New transactions
/// always start with status `pending`.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return Error::Validation(rejection.body_text()).into_response(),
    };

    if request.user_id < 1 {
        return Error::Validation("user_id is required and must be a positive integer".to_owned())
            .into_response();
    }

    // The comparison is also false for NaN.
    if !(request.amount > 0.0) {
        return Error::Validation("amount is required and must be greater than zero".to_owned())
            .into_response();
    }

    let connection = state.db_connection.lock().unwrap();

    match create_transaction(request.user_id, request.amount, timestamp::now_utc(), &connection) {
        Ok(transaction) => {
            tracing::info!(
                transaction_id = transaction.id,
                user_id = transaction.user_id,
                amount = transaction.amount,
                "Transaction created"
            );

            (StatusCode::CREATED, Json(transaction)).into_response()
        }
        Err(error) => error.into_response(),
    }
}
