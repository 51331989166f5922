//! Filtered, paginated listing queries for transactions.

use rusqlite::{Connection, ToSql};

use crate::{Error, transaction::core::TRANSACTION_COLUMNS};

use super::{Transaction, TransactionStatus, core::map_transaction_row};

/// Optional exact-match filters applied to listing and counting queries.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransactionFilter {
    /// Only include transactions belonging to this user.
    pub user_id: Option<i64>,
    /// Only include transactions with this status.
    pub status: Option<TransactionStatus>,
}

impl TransactionFilter {
    /// Build the WHERE clause and its parameters for this filter.
    ///
    /// Soft-deleted rows are always excluded; the optional filters are
    /// appended after that.
    fn where_clause(&self) -> (String, Vec<&dyn ToSql>) {
        let mut clause = "WHERE deleted_at IS NULL".to_owned();
        let mut params: Vec<&dyn ToSql> = Vec::new();

        if let Some(user_id) = &self.user_id {
            params.push(user_id);
            clause.push_str(&format!(" AND user_id = ?{}", params.len()));
        }

        if let Some(status) = &self.status {
            params.push(status);
            clause.push_str(&format!(" AND status = ?{}", params.len()));
        }

        (clause, params)
    }
}

/// Get a page of live transactions matching `filter`.
///
/// Rows are ordered by creation time, newest first. Creation times are
/// truncated to whole seconds, so ties are broken by id to keep the order
/// stable across requests.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn list_transactions(
    filter: TransactionFilter,
    limit: i64,
    offset: i64,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let (where_clause, mut params) = filter.where_clause();

    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
         {where_clause}
         ORDER BY created_at DESC, id DESC
         LIMIT ?{} OFFSET ?{}",
        params.len() + 1,
        params.len() + 2,
    );
    params.push(&limit);
    params.push(&offset);

    connection
        .prepare(&query)?
        .query_map(params.as_slice(), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Count all live transactions matching `filter`, independent of any page
/// window.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn count_transactions(
    filter: TransactionFilter,
    connection: &Connection,
) -> Result<i64, Error> {
    let (where_clause, params) = filter.where_clause();

    let query = format!("SELECT COUNT(id) FROM \"transaction\" {where_clause}");

    connection
        .prepare(&query)?
        .query_one(params.as_slice(), |row| row.get(0))
        .map_err(|error| error.into())
}
