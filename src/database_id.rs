//! Database ID type definition.

/// Alias for the integer type used for transaction ids in the database.
pub type TransactionId = i64;
