//! The remote procedures for reading and changing transactions.
//!
//! Every procedure validates its input with the same rules as the HTML form
//! before touching the database.

use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::TransactionId,
    rpc::ProcedureError,
    transaction::{
        self, Transaction,
        validation::{
            NewTransactionInput, TransactionPatchInput, validate_new_transaction,
            validate_transaction_patch,
        },
    },
};

/// The input of the procedures that take only a transaction ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TransactionIdInput {
    pub id: TransactionId,
}

/// Get every transaction in insertion order.
pub fn get_transactions(connection: &Connection) -> Result<Vec<Transaction>, ProcedureError> {
    transaction::get_all_transactions(connection).map_err(ProcedureError::from)
}

/// Get the transaction with `id`, or `None` if there is no such transaction.
pub fn get_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Option<Transaction>, ProcedureError> {
    match transaction::get_transaction(id, connection) {
        Ok(transaction) => Ok(Some(transaction)),
        Err(Error::NotFound) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// Validate `input` and store it as a new transaction.
///
/// The transaction is dated `now` if the input has no date.
pub fn add_transaction(
    input: NewTransactionInput,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, ProcedureError> {
    let new_transaction = validate_new_transaction(input, now)?;

    Ok(transaction::create_transaction(
        &new_transaction,
        connection,
    )?)
}

/// Validate `input` and apply the fields it sets to the stored transaction.
pub fn update_transaction(
    input: TransactionPatchInput,
    connection: &Connection,
) -> Result<Transaction, ProcedureError> {
    let patch = validate_transaction_patch(&input)?;

    Ok(transaction::update_transaction(input.id, &patch, connection)?)
}

/// Delete the transaction with `id` and return it.
pub fn delete_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, ProcedureError> {
    Ok(transaction::delete_transaction(id, connection)?)
}
