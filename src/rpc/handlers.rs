//! JSON over HTTP handlers for the remote procedures.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json,
    extract::{
        FromRef, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use rusqlite::Connection;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    rpc::{
        ProcedureError,
        procedures::{self, TransactionIdInput},
    },
    transaction::{
        Transaction,
        validation::{NewTransactionInput, TransactionPatchInput},
    },
};

/// The state needed by the remote procedures.
#[derive(Debug, Clone)]
pub struct RpcState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RpcState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The body of a successful procedure call: `{"result": {"data": ...}}`.
#[derive(Debug, Serialize)]
pub struct RpcResponse<T> {
    result: RpcResult<T>,
}

#[derive(Debug, Serialize)]
struct RpcResult<T> {
    data: T,
}

impl<T> RpcResponse<T> {
    fn new(data: T) -> Json<Self> {
        Json(Self {
            result: RpcResult { data },
        })
    }
}

type RpcReply<T> = Result<Json<RpcResponse<T>>, ProcedureError>;

fn lock_connection(state: &RpcState) -> Result<MutexGuard<'_, Connection>, ProcedureError> {
    state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| ProcedureError::Internal(Error::DatabaseLockError))
}

/// Handles `GET /rpc/getTransactions`.
pub async fn get_transactions(State(state): State<RpcState>) -> RpcReply<Vec<Transaction>> {
    let connection = lock_connection(&state)?;

    procedures::get_transactions(&connection).map(RpcResponse::new)
}

/// Handles `GET /rpc/getTransaction?id=<id>`.
pub async fn get_transaction(
    State(state): State<RpcState>,
    input: Result<Query<TransactionIdInput>, QueryRejection>,
) -> RpcReply<Option<Transaction>> {
    let Query(input) = input?;
    let connection = lock_connection(&state)?;

    procedures::get_transaction(input.id, &connection).map(RpcResponse::new)
}

/// Handles `POST /rpc/addTransaction`.
pub async fn add_transaction(
    State(state): State<RpcState>,
    input: Result<Json<NewTransactionInput>, JsonRejection>,
) -> RpcReply<Transaction> {
    let Json(input) = input?;
    let connection = lock_connection(&state)?;

    procedures::add_transaction(input, OffsetDateTime::now_utc(), &connection).map(RpcResponse::new)
}

/// Handles `POST /rpc/updateTransaction`.
pub async fn update_transaction(
    State(state): State<RpcState>,
    input: Result<Json<TransactionPatchInput>, JsonRejection>,
) -> RpcReply<Transaction> {
    let Json(input) = input?;
    let connection = lock_connection(&state)?;

    procedures::update_transaction(input, &connection).map(RpcResponse::new)
}

/// Handles `POST /rpc/deleteTransaction`.
pub async fn delete_transaction(
    State(state): State<RpcState>,
    input: Result<Json<TransactionIdInput>, JsonRejection>,
) -> RpcReply<Transaction> {
    let Json(input) = input?;
    let connection = lock_connection(&state)?;

    procedures::delete_transaction(input.id, &connection).map(RpcResponse::new)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, build_router, endpoints, locale::Locale, pagination::PaginationConfig};

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        let state = AppState::new(
            connection,
            "Etc/UTC",
            Locale::Hungarian,
            PaginationConfig::default(),
        )
        .unwrap();

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    async fn add_groceries(server: &TestServer) -> Value {
        let response = server
            .post(endpoints::RPC_ADD_TRANSACTION)
            .json(&json!({
                "type": "outflow",
                "amount": 1250,
                "date": "2024-05-20T00:00:00Z",
                "category": "  Groceries  ",
                "description": ""
            }))
            .await;
        response.assert_status_ok();

        response.json::<Value>()["result"]["data"].clone()
    }

    #[tokio::test]
    async fn add_transaction_returns_normalized_row() {
        let server = get_test_server();

        let data = add_groceries(&server).await;

        assert_eq!(data["id"], json!(1));
        assert_eq!(data["type"], json!("outflow"));
        assert_eq!(data["amount"], json!(1250));
        assert_eq!(data["date"], json!("2024-05-20T00:00:00Z"));
        assert_eq!(data["category"], json!("groceries"));
        assert_eq!(data["description"], Value::Null);
    }

    #[tokio::test]
    async fn get_transactions_wraps_rows_in_envelope() {
        let server = get_test_server();
        let added = add_groceries(&server).await;

        let response = server.get(endpoints::RPC_GET_TRANSACTIONS).await;

        response.assert_status_ok();
        response.assert_json(&json!({ "result": { "data": [added] } }));
    }

    #[tokio::test]
    async fn get_unknown_transaction_returns_null() {
        let server = get_test_server();

        let response = server
            .get(endpoints::RPC_GET_TRANSACTION)
            .add_query_param("id", 99)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "result": { "data": null } }));
    }

    #[tokio::test]
    async fn get_transaction_without_id_is_bad_request() {
        let server = get_test_server();

        let response = server.get(endpoints::RPC_GET_TRANSACTION).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"]["code"], json!("BAD_REQUEST"));
    }

    #[tokio::test]
    async fn negative_amount_is_bad_request_with_issue() {
        let server = get_test_server();

        let response = server
            .post(endpoints::RPC_ADD_TRANSACTION)
            .json(&json!({ "type": "inflow", "amount": -5 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["error"]["code"], json!("BAD_REQUEST"));
        assert_eq!(body["error"]["issues"][0]["path"], json!("amount"));
        assert_eq!(body["error"]["issues"][0]["code"], json!("too_small"));
    }

    #[tokio::test]
    async fn unknown_type_is_bad_request() {
        let server = get_test_server();

        let response = server
            .post(endpoints::RPC_ADD_TRANSACTION)
            .json(&json!({ "type": "transfer", "amount": 5 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_type_is_bad_request() {
        let server = get_test_server();

        let response = server
            .post(endpoints::RPC_ADD_TRANSACTION)
            .json(&json!({ "amount": 5 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn whitespace_category_is_bad_request() {
        let server = get_test_server();

        let response = server
            .post(endpoints::RPC_ADD_TRANSACTION)
            .json(&json!({ "type": "inflow", "amount": 5, "category": "   " }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["error"]["issues"][0]["code"],
            json!("whitespace_only")
        );
    }

    #[tokio::test]
    async fn update_keeps_absent_fields() {
        let server = get_test_server();
        let added = add_groceries(&server).await;

        let response = server
            .post(endpoints::RPC_UPDATE_TRANSACTION)
            .json(&json!({ "id": added["id"], "amount": 800 }))
            .await;

        response.assert_status_ok();
        let data = response.json::<Value>()["result"]["data"].clone();
        assert_eq!(data["amount"], json!(800));
        assert_eq!(data["category"], added["category"]);
        assert_eq!(data["date"], added["date"]);
    }

    #[tokio::test]
    async fn update_unknown_transaction_is_not_found() {
        let server = get_test_server();

        let response = server
            .post(endpoints::RPC_UPDATE_TRANSACTION)
            .json(&json!({ "id": 12, "amount": 800 }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"]["code"], json!("NOT_FOUND"));
    }

    #[tokio::test]
    async fn delete_returns_row_then_not_found() {
        let server = get_test_server();
        let added = add_groceries(&server).await;

        let response = server
            .post(endpoints::RPC_DELETE_TRANSACTION)
            .json(&json!({ "id": added["id"] }))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "result": { "data": added } }));

        server
            .post(endpoints::RPC_DELETE_TRANSACTION)
            .json(&json!({ "id": added["id"] }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
