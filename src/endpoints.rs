//! The API endpoints URIs.

/// The root route which redirects to the transactions page.
pub const ROOT: &str = "/";
/// The page for displaying transactions as a sortable, paginated table.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for submitting the new transaction form.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route for validating a single field of the new transaction form.
pub const VALIDATE_TRANSACTION_FIELD: &str = "/api/transactions/validate";

/// The remote procedure for listing all transactions.
pub const RPC_GET_TRANSACTIONS: &str = "/rpc/getTransactions";
/// The remote procedure for getting a single transaction.
pub const RPC_GET_TRANSACTION: &str = "/rpc/getTransaction";
/// The remote procedure for adding a transaction.
pub const RPC_ADD_TRANSACTION: &str = "/rpc/addTransaction";
/// The remote procedure for updating a transaction.
pub const RPC_UPDATE_TRANSACTION: &str = "/rpc/updateTransaction";
/// The remote procedure for deleting a transaction.
pub const RPC_DELETE_TRANSACTION: &str = "/rpc/deleteTransaction";
