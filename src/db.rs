/*! Sets up the application's database schema. */

use rusqlite::{Connection, Error, Transaction as SqlTransaction};

use crate::transaction::create_transaction_table;

/// Create the application's tables and indexes in the database behind
/// `connection`.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
