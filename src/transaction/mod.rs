//! Transaction management for the cashbook application.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the database functions for storing it
//! - Sorting, paging and the validation rules shared by the form and the procedures
//! - View handlers for the transactions table and the new transaction form

mod core;
mod create_endpoint;
pub(crate) mod form;
mod form_state;
mod new_transaction_page;
pub mod sort;
pub mod table;
mod transactions_page;
pub mod validation;

pub use core::{
    NewTransaction, Transaction, TransactionPatch, TransactionType, count_transactions,
    create_transaction, create_transaction_table, delete_transaction, get_all_transactions,
    get_transaction, update_transaction,
};
pub use create_endpoint::{create_transaction_endpoint, validate_transaction_field_endpoint};
pub use new_transaction_page::get_new_transaction_page;
pub use transactions_page::get_transactions_page;
