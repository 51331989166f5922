//! Defines the core data model and single-row database queries for
//! transactions.

use std::{fmt, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// The processing state of a transaction.
///
/// Transitions between the three states are unrestricted: an update may set
/// any status regardless of the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// The transaction has been recorded but not settled.
    Pending,
    /// The transaction settled successfully.
    Success,
    /// The transaction failed to settle.
    Failed,
}

impl TransactionStatus {
    /// The lowercase string form used in SQL and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Success => "success",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = Error;

    /// Parse a status string. Case-sensitive: only the exact lowercase forms
    /// are accepted.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "pending" => Ok(TransactionStatus::Pending),
            "success" => Ok(TransactionStatus::Success),
            "failed" => Ok(TransactionStatus::Failed),
            other => Err(Error::InvalidStatus(other.to_owned())),
        }
    }
}

impl ToSql for TransactionStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

/// A payment transaction recorded against an external user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction. Assigned by the database, never reused.
    pub id: TransactionId,
    /// The user the transaction belongs to. Not checked against any user
    /// table, the user system is external.
    pub user_id: i64,
    /// The amount of money moved. Always greater than zero.
    pub amount: f64,
    /// The processing state of the transaction.
    pub status: TransactionStatus,
    /// When the transaction was created (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last updated (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// The soft-delete marker. Rows with a deletion time are excluded from
    /// all default reads and never serialized to clients.
    #[serde(skip)]
    pub deleted_at: Option<OffsetDateTime>,
}

/// The column list every transaction query selects, in the order
/// [map_transaction_row] expects.
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, user_id, amount, status, created_at, updated_at, deleted_at";

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Insert a new transaction with status `pending` and both timestamps set to
/// `now`.
///
/// # Errors
/// Returns [Error::SqlError] if the insert fails, e.g. when `amount` violates
/// the table's positivity check.
pub fn create_transaction(
    user_id: i64,
    amount: f64,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (user_id, amount, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             RETURNING {TRANSACTION_COLUMNS}",
        ))?
        .query_row(
            (user_id, amount, TransactionStatus::Pending, now),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a live (non-deleted) transaction by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a live transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE id = :id AND deleted_at IS NULL",
        ))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve a transaction by its `id` regardless of its soft-delete marker.
///
/// This is the audit-mode fetch: soft-deleted rows stay recoverable through
/// this query even though every client-facing read excludes them.
///
/// # Errors
/// Returns [Error::NotFound] if no row with `id` exists at all.
pub fn get_transaction_with_deleted(
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id",
        ))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Overwrite the status of a live transaction and bump its `updated_at`.
///
/// `user_id` and `amount` are immutable after creation, so status is the only
/// mutable field. The update is a single statement, there is no separate
/// fetch that a concurrent writer could interleave with.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a live transaction.
pub fn update_transaction_status(
    id: TransactionId,
    status: TransactionStatus,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "UPDATE \"transaction\" SET status = :status, updated_at = :updated_at
             WHERE id = :id AND deleted_at IS NULL
             RETURNING {TRANSACTION_COLUMNS}",
        ))?
        .query_one(
            &[
                (":status", &status as &dyn ToSql),
                (":updated_at", &now),
                (":id", &id),
            ],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Soft-delete a live transaction by setting its `deleted_at` marker.
///
/// The row is kept; it simply stops appearing in default reads.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a live transaction,
/// including when the transaction was already deleted.
pub fn soft_delete_transaction(
    id: TransactionId,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\" SET deleted_at = :deleted_at
         WHERE id = :id AND deleted_at IS NULL",
        &[(":deleted_at", &now as &dyn ToSql), (":id", &id)],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Create the transaction table and its indexes in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    // AUTOINCREMENT keeps ids monotonically increasing and never reused,
    // even after the newest row is deleted.
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                status TEXT NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'success', 'failed')),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                deleted_at TEXT
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_id ON \"transaction\"(user_id);",
        (),
    )?;

    // Composite index used by the list ordering and dashboard queries, which
    // always filter on the soft-delete marker first.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_deleted_created
         ON \"transaction\"(deleted_at, created_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        status: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
        deleted_at: row.get(6)?,
    })
}

/// Parse a path parameter as a transaction id.
///
/// Mirrors unsigned integer parsing: negative values and non-numeric text are
/// rejected. Zero parses fine and simply never resolves to a row.
///
/// # Errors
/// Returns [Error::InvalidId] when `raw` is not a non-negative integer.
pub fn parse_transaction_id(raw: &str) -> Result<TransactionId, Error> {
    raw.parse::<TransactionId>()
        .ok()
        .filter(|&id| id >= 0)
        .ok_or_else(|| Error::InvalidId(raw.to_owned()))
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod status_tests {
    use crate::{Error, transaction::TransactionStatus};

    #[test]
    fn parses_exact_lowercase_values() {
        assert_eq!("pending".parse(), Ok(TransactionStatus::Pending));
        assert_eq!("success".parse(), Ok(TransactionStatus::Success));
        assert_eq!("failed".parse(), Ok(TransactionStatus::Failed));
    }

    #[test]
    fn rejects_other_values() {
        for raw in ["", "PENDING", "Success", "unknown"] {
            assert_eq!(
                raw.parse::<TransactionStatus>(),
                Err(Error::InvalidStatus(raw.to_owned()))
            );
        }
    }

    #[test]
    fn serializes_as_lowercase_string() {
        let json = serde_json::to_string(&TransactionStatus::Pending).unwrap();

        assert_eq!(json, "\"pending\"");
    }
}

#[cfg(test)]
mod parse_id_tests {
    use crate::{Error, transaction::parse_transaction_id};

    #[test]
    fn parses_non_negative_integers() {
        assert_eq!(parse_transaction_id("1"), Ok(1));
        assert_eq!(parse_transaction_id("0"), Ok(0));
        assert_eq!(parse_transaction_id("123456"), Ok(123456));
    }

    #[test]
    fn rejects_non_numeric_and_negative_ids() {
        for raw in ["abc", "-1", "1.5", ""] {
            assert_eq!(
                parse_transaction_id(raw),
                Err(Error::InvalidId(raw.to_owned()))
            );
        }
    }
}
