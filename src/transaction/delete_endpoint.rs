//! Defines the endpoint for soft-deleting a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, timestamp,
    transaction::core::{parse_transaction_id, soft_delete_transaction},
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for soft-deleting a transaction.
///
/// Responds 204 with an empty body on success, 400 for a non-numeric id, or
/// 404 when the id does not refer to a live transaction (deleting twice is a
/// 404 on the second attempt). The row is retained with its `deleted_at`
/// marker set.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_transaction_id(&id) {
        Ok(id) => id,
        Err(error) => return error.into_response(),
    };

    let connection = state.db_connection.lock().unwrap();

    match soft_delete_transaction(id, timestamp::now_utc(), &connection) {
        Ok(()) => {
            tracing::info!(transaction_id = id, "Transaction deleted");

            StatusCode::NO_CONTENT.into_response()
        }
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        AppState, ErrorBody, PaginationConfig, build_router,
        endpoints::{self, format_endpoint},
        transaction::{Transaction, get_transaction_with_deleted},
    };

    fn new_test_server_with_state() -> (TestServer, AppState) {
        let conn = Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(conn, PaginationConfig::default())
            .expect("Could not initialize app state.");
        let server =
            TestServer::new(build_router(state.clone())).expect("Could not create test server.");

        (server, state)
    }

    async fn create_transaction(server: &TestServer) -> Transaction {
        server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({"user_id": 7, "amount": 12.3}))
            .await
            .json::<Transaction>()
    }

    #[tokio::test]
    async fn delete_returns_204_and_hides_the_record() {
        let (server, state) = new_test_server_with_state();
        let created = create_transaction(&server).await;
        let path = format_endpoint(endpoints::TRANSACTION, created.id);

        let response = server.delete(&path).await;

        response.assert_status(StatusCode::NO_CONTENT);
        server
            .get(&path)
            .await
            .assert_status(StatusCode::NOT_FOUND);

        // The row itself survives with its deletion marker set.
        let connection = state.db_connection.lock().unwrap();
        let retained = get_transaction_with_deleted(created.id, &connection).unwrap();
        assert!(retained.deleted_at.is_some());
    }

    #[tokio::test]
    async fn delete_twice_returns_404() {
        let (server, _state) = new_test_server_with_state();
        let created = create_transaction(&server).await;
        let path = format_endpoint(endpoints::TRANSACTION, created.id);

        server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);

        let response = server.delete(&path).await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<ErrorBody>().error, "not_found");
    }

    #[tokio::test]
    async fn delete_non_numeric_id_returns_400() {
        let (server, _state) = new_test_server_with_state();

        let response = server.delete("/transactions/abc").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<ErrorBody>().error, "invalid_id");
    }
}
