//! The health check endpoint.

use axum::Json;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::timestamp;

/// The name this service reports in health responses.
const SERVICE_NAME: &str = "transaction-api";

/// The response body for the health check.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process is serving traffic.
    pub status: String,
    /// The service name.
    pub service: String,
    /// The current UTC time.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// A route handler reporting that the service is up.
///
/// The process aborts at startup if the database cannot be opened, so a
/// serving process is a healthy one; no per-request database probe is made.
pub async fn health_endpoint() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_owned(),
        service: SERVICE_NAME.to_owned(),
        timestamp: timestamp::now_utc(),
    })
}
