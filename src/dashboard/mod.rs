//! Dashboard module
//!
//! Provides a read-only aggregate snapshot over the live transaction set:
//! totals, today's successes, amount sums, the status distribution, and the
//! most recent transactions.

mod summary;
mod summary_endpoint;

pub use summary::{DashboardSummary, dashboard_summary};
pub use summary_endpoint::dashboard_summary_endpoint;
