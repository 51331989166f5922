//! Defines the endpoint for listing transactions with filtering and
//! pagination.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    pagination::{PageParams, PaginationConfig},
    transaction::{
        Transaction, TransactionStatus,
        query::{TransactionFilter, count_transactions, list_transactions},
    },
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls page defaults.
    pub pagination: PaginationConfig,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination: state.pagination.clone(),
        }
    }
}

/// The query parameters accepted by the listing endpoint.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListTransactionsParams {
    /// Only include transactions belonging to this user.
    pub user_id: Option<i64>,
    /// Only include transactions with this status.
    pub status: Option<String>,
    /// The 1-based page number. Defaults to 1 when absent or non-positive.
    pub page: Option<i64>,
    /// The page size. Defaults to 10 when absent or non-positive.
    pub limit: Option<i64>,
}

/// A page of transactions along with its pagination metadata.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListTransactionsResponse {
    /// The transactions in the requested page window, newest first.
    pub data: Vec<Transaction>,
    /// The total number of matching transactions, independent of the window.
    pub total: i64,
    /// The page number the window corresponds to, after defaulting.
    pub page: i64,
    /// The page size, after defaulting.
    pub limit: i64,
    /// `ceil(total / limit)`; zero when there are no matching rows.
    pub total_pages: i64,
}

/// A route handler for listing transactions.
///
/// Soft-deleted transactions are never included. An unrecognized `status`
/// value is rejected with 400 `invalid_status`; an empty `status` parameter
/// is treated as absent.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    params: Result<Query<ListTransactionsParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(query) => query,
        Err(rejection) => return Error::Validation(rejection.body_text()).into_response(),
    };

    let status = match params.status.as_deref() {
        None | Some("") => None,
        Some(raw) => match raw.parse::<TransactionStatus>() {
            Ok(status) => Some(status),
            Err(error) => return error.into_response(),
        },
    };

    let filter = TransactionFilter {
        user_id: params.user_id,
        status,
    };
    let page_params = PageParams::resolve(params.page, params.limit, &state.pagination);

    let connection = state.db_connection.lock().unwrap();

    let result = count_transactions(filter, &connection).and_then(|total| {
        let data = list_transactions(filter, page_params.limit, page_params.offset(), &connection)?;

        Ok(ListTransactionsResponse {
            data,
            total,
            page: page_params.page,
            limit: page_params.limit,
            total_pages: page_params.total_pages(total),
        })
    });

    match result {
        Ok(response) => Json(response).into_response(),
        Err(error) => error.into_response(),
    }
}
