//! Aggregate queries backing the dashboard summary.
//!
//! Each aggregate is its own SQL query, computed independently. Under
//! concurrent writes the summary is therefore a best-effort snapshot, not a
//! transactionally consistent report.

use std::collections::HashMap;

use rusqlite::{Connection, ToSql};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error, timestamp,
    transaction::{TRANSACTION_COLUMNS, Transaction, TransactionStatus, map_transaction_row},
};

/// How many rows the `recent_transactions` list holds.
const RECENT_TRANSACTION_COUNT: i64 = 10;

/// A derived, best-effort aggregate snapshot over the live transaction set.
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// The number of live transactions, regardless of status.
    pub total_transactions: i64,
    /// The number of successful transactions created today (UTC).
    pub total_success_today: i64,
    /// The sum of amounts over all successful transactions.
    pub total_amount: f64,
    /// The sum of amounts over successful transactions created today (UTC).
    pub total_amount_today: f64,
    /// The mean amount over all successful transactions.
    ///
    /// Despite the name this is a plain average over successful
    /// transactions, not grouped by user. The name is kept for
    /// compatibility with existing dashboard clients.
    pub average_amount_per_user: f64,
    /// The number of live transactions per status. Only statuses that are
    /// present appear as keys.
    pub status_distribution: HashMap<String, i64>,
    /// The ten most recently created live transactions, all statuses.
    pub recent_transactions: Vec<Transaction>,
}

/// Compute the dashboard summary as of `now`.
///
/// "Today" is the UTC calendar day that `now` falls in.
///
/// # Errors
/// Returns [Error::SqlError] if any of the aggregate queries fails.
pub fn dashboard_summary(
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<DashboardSummary, Error> {
    let (today_start, today_end) = timestamp::today_utc_range(now);

    Ok(DashboardSummary {
        total_transactions: count_all(connection)?,
        total_success_today: count_success_between(today_start, today_end, connection)?,
        total_amount: sum_success_amount(connection)?,
        total_amount_today: sum_success_amount_between(today_start, today_end, connection)?,
        average_amount_per_user: average_success_amount(connection)?,
        status_distribution: status_distribution(connection)?,
        recent_transactions: recent_transactions(RECENT_TRANSACTION_COUNT, connection)?,
    })
}

/// Count all live transactions regardless of status.
pub(super) fn count_all(connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE deleted_at IS NULL",
            [],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Count live successful transactions created in `[start, end)`.
pub(super) fn count_success_between(
    start: OffsetDateTime,
    end: OffsetDateTime,
    connection: &Connection,
) -> Result<i64, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\"
             WHERE deleted_at IS NULL AND status = 'success'
               AND created_at >= ?1 AND created_at < ?2",
            (start, end),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Sum the amounts of all live successful transactions, zero if none.
pub(super) fn sum_success_amount(connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM \"transaction\"
             WHERE deleted_at IS NULL AND status = 'success'",
            [],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Sum the amounts of live successful transactions created in `[start, end)`,
/// zero if none.
pub(super) fn sum_success_amount_between(
    start: OffsetDateTime,
    end: OffsetDateTime,
    connection: &Connection,
) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM \"transaction\"
             WHERE deleted_at IS NULL AND status = 'success'
               AND created_at >= ?1 AND created_at < ?2",
            (start, end),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// The mean amount over all live successful transactions, zero if none.
pub(super) fn average_success_amount(connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(AVG(amount), 0) FROM \"transaction\"
             WHERE deleted_at IS NULL AND status = 'success'",
            [],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Count live transactions grouped by status.
pub(super) fn status_distribution(
    connection: &Connection,
) -> Result<HashMap<String, i64>, Error> {
    connection
        .prepare(
            "SELECT status, COUNT(id) FROM \"transaction\"
             WHERE deleted_at IS NULL
             GROUP BY status",
        )?
        .query_map([], |row| {
            let status: TransactionStatus = row.get(0)?;
            let count: i64 = row.get(1)?;

            Ok((status.to_string(), count))
        })?
        .map(|entry_result| entry_result.map_err(Error::SqlError))
        .collect()
}

/// The `count` most recently created live transactions, newest first, all
/// statuses and dates.
pub(super) fn recent_transactions(
    count: i64,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE deleted_at IS NULL
             ORDER BY created_at DESC, id DESC
             LIMIT ?1",
        ))?
        .query_map([&count as &dyn ToSql], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Duration, macros::datetime};

    use crate::{
        db::initialize,
        transaction::{
            TransactionStatus, create_transaction, soft_delete_transaction,
            update_transaction_status,
        },
    };

    use super::dashboard_summary;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn create_with_status(
        user_id: i64,
        amount: f64,
        status: TransactionStatus,
        created_at: time::OffsetDateTime,
        conn: &Connection,
    ) {
        let transaction = create_transaction(user_id, amount, created_at, conn).unwrap();
        if status != TransactionStatus::Pending {
            update_transaction_status(transaction.id, status, created_at, conn).unwrap();
        }
    }

    #[test]
    fn empty_database_yields_zeroed_summary() {
        let conn = get_test_connection();
        let now = datetime!(2024-06-15 12:00:00 UTC);

        let summary = dashboard_summary(now, &conn).unwrap();

        assert_eq!(summary.total_transactions, 0);
        assert_eq!(summary.total_success_today, 0);
        assert_eq!(summary.total_amount, 0.0);
        assert_eq!(summary.total_amount_today, 0.0);
        assert_eq!(summary.average_amount_per_user, 0.0);
        assert!(summary.status_distribution.is_empty());
        assert!(summary.recent_transactions.is_empty());
    }

    #[test]
    fn summary_matches_worked_example() {
        // Five records: (u1,100,success,today), (u1,200,success,today),
        // (u2,300,success,yesterday), (u2,400,pending,today),
        // (u3,500,failed,today).
        let conn = get_test_connection();
        let now = datetime!(2024-06-15 12:00:00 UTC);
        let yesterday = now - Duration::days(1);

        create_with_status(1, 100.0, TransactionStatus::Success, now, &conn);
        create_with_status(1, 200.0, TransactionStatus::Success, now, &conn);
        create_with_status(2, 300.0, TransactionStatus::Success, yesterday, &conn);
        create_with_status(2, 400.0, TransactionStatus::Pending, now, &conn);
        create_with_status(3, 500.0, TransactionStatus::Failed, now, &conn);

        let summary = dashboard_summary(now, &conn).unwrap();

        assert_eq!(summary.total_transactions, 5);
        assert_eq!(summary.total_success_today, 2);
        assert_eq!(summary.total_amount, 600.0);
        assert_eq!(summary.total_amount_today, 300.0);
        assert_eq!(summary.average_amount_per_user, 200.0);
        assert_eq!(summary.status_distribution.len(), 3);
        assert_eq!(summary.status_distribution["success"], 3);
        assert_eq!(summary.status_distribution["pending"], 1);
        assert_eq!(summary.status_distribution["failed"], 1);
        assert_eq!(summary.recent_transactions.len(), 5);
    }

    #[test]
    fn recent_transactions_are_capped_at_ten_newest_first() {
        let conn = get_test_connection();
        let base = datetime!(2024-06-15 00:00:00 UTC);
        for i in 0..12 {
            create_transaction(1, 1.0, base + Duration::minutes(i), &conn).unwrap();
        }

        let summary = dashboard_summary(base + Duration::hours(1), &conn).unwrap();

        let ids: Vec<_> = summary
            .recent_transactions
            .iter()
            .map(|transaction| transaction.id)
            .collect();
        assert_eq!(ids, vec![12, 11, 10, 9, 8, 7, 6, 5, 4, 3]);
    }

    #[test]
    fn recent_transactions_are_not_filtered_by_date() {
        let conn = get_test_connection();
        let now = datetime!(2024-06-15 12:00:00 UTC);
        create_transaction(1, 1.0, now - Duration::days(30), &conn).unwrap();

        let summary = dashboard_summary(now, &conn).unwrap();

        assert_eq!(summary.recent_transactions.len(), 1);
    }

    #[test]
    fn yesterday_boundary_is_exclusive() {
        let conn = get_test_connection();
        let now = datetime!(2024-06-15 12:00:00 UTC);
        // One second before midnight counts as yesterday.
        let just_before_midnight = datetime!(2024-06-14 23:59:59 UTC);
        let midnight = datetime!(2024-06-15 00:00:00 UTC);

        create_with_status(1, 10.0, TransactionStatus::Success, just_before_midnight, &conn);
        create_with_status(1, 20.0, TransactionStatus::Success, midnight, &conn);

        let summary = dashboard_summary(now, &conn).unwrap();

        assert_eq!(summary.total_success_today, 1);
        assert_eq!(summary.total_amount_today, 20.0);
        assert_eq!(summary.total_amount, 30.0);
    }

    #[test]
    fn soft_deleted_rows_are_excluded_from_every_aggregate() {
        let conn = get_test_connection();
        let now = datetime!(2024-06-15 12:00:00 UTC);
        create_with_status(1, 100.0, TransactionStatus::Success, now, &conn);
        create_with_status(1, 200.0, TransactionStatus::Success, now, &conn);
        soft_delete_transaction(2, now, &conn).unwrap();

        let summary = dashboard_summary(now, &conn).unwrap();

        assert_eq!(summary.total_transactions, 1);
        assert_eq!(summary.total_success_today, 1);
        assert_eq!(summary.total_amount, 100.0);
        assert_eq!(summary.status_distribution["success"], 1);
        assert_eq!(summary.recent_transactions.len(), 1);
    }
}
