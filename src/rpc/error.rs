//! The error kinds of the remote procedures and their JSON envelope.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{Error, alert::Alert, transaction::validation::ValidationErrors};

/// Why a remote procedure failed.
///
/// Callers branch on the kind to decide what to tell the user, so bad input
/// and a missing transaction are kept apart from everything else.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ProcedureError {
    /// The input was well formed but broke a validation rule.
    #[error("invalid input: {0}")]
    BadRequest(ValidationErrors),

    /// The input could not be parsed, e.g. a missing field or the wrong type.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The transaction referenced by the input does not exist.
    #[error("the transaction could not be found")]
    NotFound,

    /// Anything else, e.g. a SQL error.
    #[error("internal error: {0}")]
    Internal(Error),
}

impl ProcedureError {
    /// The HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProcedureError::BadRequest(_) | ProcedureError::MalformedInput(_) => {
                StatusCode::BAD_REQUEST
            }
            ProcedureError::NotFound => StatusCode::NOT_FOUND,
            ProcedureError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The error code in the JSON envelope.
    pub fn code(&self) -> &'static str {
        match self {
            ProcedureError::BadRequest(_) | ProcedureError::MalformedInput(_) => "BAD_REQUEST",
            ProcedureError::NotFound => "NOT_FOUND",
            ProcedureError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// The message shown to a user whose transaction could not be added.
    pub fn user_message(&self) -> &'static str {
        match self {
            ProcedureError::BadRequest(_) | ProcedureError::MalformedInput(_) => {
                "Validation failed. Please check your inputs and try again."
            }
            _ => "Failed to add transaction. Please try again.",
        }
    }

    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let status_code = self.status_code();
        let alert = Alert::Error {
            message: self.user_message().to_owned(),
            details: String::new(),
        };

        (status_code, alert.into_html()).into_response()
    }
}

impl From<Error> for ProcedureError {
    fn from(error: Error) -> Self {
        match error {
            Error::NotFound | Error::UpdateMissingTransaction | Error::DeleteMissingTransaction => {
                ProcedureError::NotFound
            }
            error => ProcedureError::Internal(error),
        }
    }
}

impl From<ValidationErrors> for ProcedureError {
    fn from(errors: ValidationErrors) -> Self {
        ProcedureError::BadRequest(errors)
    }
}

impl From<JsonRejection> for ProcedureError {
    fn from(rejection: JsonRejection) -> Self {
        ProcedureError::MalformedInput(rejection.body_text())
    }
}

impl From<QueryRejection> for ProcedureError {
    fn from(rejection: QueryRejection) -> Self {
        ProcedureError::MalformedInput(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    issues: Vec<Issue>,
}

/// One failed field of a rejected input.
#[derive(Debug, Serialize)]
struct Issue {
    path: &'static str,
    code: &'static str,
    message: String,
}

impl IntoResponse for ProcedureError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let code = self.code();

        let (message, issues) = match self {
            ProcedureError::BadRequest(errors) => {
                let issues = errors
                    .iter()
                    .map(|(field, error)| Issue {
                        path: field.as_str(),
                        code: error.code(),
                        message: error.message(field),
                    })
                    .collect();

                (errors.to_string(), issues)
            }
            ProcedureError::MalformedInput(message) => (message, Vec::new()),
            ProcedureError::NotFound => ("The transaction could not be found.".to_owned(), vec![]),
            ProcedureError::Internal(error) => {
                tracing::error!("An unexpected error occurred in a procedure: {error}");
                (
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                    Vec::new(),
                )
            }
        };

        let body = ErrorEnvelope {
            error: ErrorBody {
                code,
                message,
                issues,
            },
        };

        (status_code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{
        Error,
        transaction::validation::{Field, FieldError, ValidationErrors},
    };

    use super::ProcedureError;

    #[test]
    fn missing_transactions_are_not_found() {
        for error in [
            Error::NotFound,
            Error::UpdateMissingTransaction,
            Error::DeleteMissingTransaction,
        ] {
            assert_eq!(ProcedureError::from(error), ProcedureError::NotFound);
        }
    }

    #[test]
    fn lock_error_is_internal() {
        assert_eq!(
            ProcedureError::from(Error::DatabaseLockError),
            ProcedureError::Internal(Error::DatabaseLockError)
        );
    }

    #[test]
    fn bad_input_asks_user_to_check_inputs() {
        let error =
            ProcedureError::BadRequest(ValidationErrors::single(Field::Amount, FieldError::TooSmall));

        assert_eq!(
            error.user_message(),
            "Validation failed. Please check your inputs and try again."
        );
        assert_eq!(
            ProcedureError::MalformedInput("missing field `type`".to_owned()).user_message(),
            "Validation failed. Please check your inputs and try again."
        );
    }

    #[test]
    fn other_errors_suggest_retry() {
        for error in [
            ProcedureError::NotFound,
            ProcedureError::Internal(Error::DatabaseLockError),
        ] {
            assert_eq!(
                error.user_message(),
                "Failed to add transaction. Please try again."
            );
        }
    }

    #[test]
    fn status_codes_match_kind() {
        let bad_request =
            ProcedureError::BadRequest(ValidationErrors::single(Field::Category, FieldError::Required));

        assert_eq!(bad_request.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ProcedureError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ProcedureError::Internal(Error::DatabaseLockError)
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn alert_response_keeps_status() {
        let response = ProcedureError::NotFound.into_alert_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
