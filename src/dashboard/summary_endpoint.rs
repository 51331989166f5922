//! Defines the read-only dashboard summary endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, dashboard::summary::dashboard_summary, timestamp};

/// The state needed to compute the dashboard summary.
#[derive(Debug, Clone)]
pub struct DashboardSummaryState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardSummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for the dashboard summary.
///
/// Responds 200 with the aggregate snapshot, or 500 when an aggregation
/// query fails.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn dashboard_summary_endpoint(
    State(state): State<DashboardSummaryState>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match dashboard_summary(timestamp::now_utc(), &connection) {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => {
            tracing::error!("Could not compute dashboard summary: {error}");

            error.into_response()
        }
    }
}
