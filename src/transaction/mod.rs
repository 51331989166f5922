//! Transaction management for the API.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionStatus` enum
//! - Database functions for storing, querying, and soft-deleting transactions
//! - The route handlers for the transaction CRUD endpoints

mod core;
mod create_endpoint;
mod delete_endpoint;
mod get_endpoint;
mod list_endpoint;
mod query;
mod update_endpoint;

pub(crate) use core::TRANSACTION_COLUMNS;
pub use core::{
    Transaction, TransactionStatus, create_transaction, create_transaction_table, get_transaction,
    get_transaction_with_deleted, map_transaction_row, parse_transaction_id,
    soft_delete_transaction, update_transaction_status,
};
pub use create_endpoint::{CreateTransactionRequest, create_transaction_endpoint};
pub use delete_endpoint::delete_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::{
    ListTransactionsParams, ListTransactionsResponse, list_transactions_endpoint,
};
pub use query::{TransactionFilter, count_transactions, list_transactions};
pub use update_endpoint::{UpdateTransactionRequest, update_transaction_endpoint};
