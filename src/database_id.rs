//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of a transaction.
///
/// Assigned by SQLite on insert. The transaction table uses `AUTOINCREMENT`,
/// so an ID is never handed out again after its transaction is deleted.
pub type TransactionId = DatabaseId;
