//! Defines the endpoints for validating and creating a new transaction from the form.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error, endpoints, rpc,
    timezone::local_offset_or_error,
    transaction::{
        form::{field_error, transaction_form},
        form_state::{Submission, TransactionFormState},
        validation::{Field, NewTransactionInput, TransactionForm},
    },
};

/// The state needed to validate or create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Budapest".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Selects the form field to validate.
#[derive(Debug, Deserialize)]
pub struct ValidateFieldQuery {
    pub field: Field,
}

/// A route handler that validates one field when it loses focus.
///
/// Responds with the error slot of that field, which is empty if the value is valid.
pub async fn validate_transaction_field_endpoint(
    State(state): State<CreateTransactionState>,
    Query(query): Query<ValidateFieldQuery>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let local_offset = match local_offset_or_error(&state.local_timezone) {
        Ok(offset) => offset,
        Err(error) => return error.into_alert_response(),
    };

    let mut form_state = TransactionFormState::from_values(form);
    form_state.on_blur(query.field, local_offset);

    field_error(
        query.field,
        form_state.error_message(query.field).as_deref(),
    )
    .into_response()
}

/// A route handler for creating a new transaction, redirects to transactions view on success.
///
/// If any field is invalid the form is sent back with an error under each bad field.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let local_offset = match local_offset_or_error(&state.local_timezone) {
        Ok(offset) => offset,
        Err(error) => return error.into_alert_response(),
    };

    let mut form_state = TransactionFormState::from_values(form);

    let new_transaction = match form_state.submit(local_offset) {
        Submission::Ready(new_transaction) => new_transaction,
        Submission::Invalid | Submission::InFlight => {
            return transaction_form(&form_state).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = rpc::add_transaction(
        NewTransactionInput::from(new_transaction),
        OffsetDateTime::now_utc(),
        &connection,
    );

    match result {
        Ok(_) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            error.into_alert_response()
        }
    }
}
