//! Typed remote procedures for managing transactions.
//!
//! The procedures are plain functions over a database connection. The
//! handlers expose them as JSON over HTTP under `/rpc`.

mod error;
mod handlers;
mod procedures;

pub use error::ProcedureError;
pub use handlers::{
    add_transaction as add_transaction_endpoint,
    delete_transaction as delete_transaction_endpoint,
    get_transaction as get_transaction_endpoint,
    get_transactions as get_transactions_endpoint,
    update_transaction as update_transaction_endpoint,
};
pub use procedures::add_transaction;
