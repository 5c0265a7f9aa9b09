//! The state machine behind the new transaction form.
//!
//! Fields are validated when they lose focus and again, all together, when
//! the form is submitted. Editing a field that shows an error clears that
//! error straight away without validating anything else.

use time::{Date, UtcOffset};

use crate::transaction::{
    NewTransaction, TransactionType,
    validation::{
        Field, TransactionForm, ValidationErrors, validate_amount, validate_category,
        validate_date, validate_transaction_form, validate_type,
    },
};

/// The outcome of submitting the form.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// At least one field is invalid, the errors are stored in the form.
    Invalid,
    /// An earlier submission has not settled yet, nothing was sent.
    InFlight,
    /// The form is valid and this payload should be sent.
    Ready(NewTransaction),
}

/// The values, errors and submission status of the new transaction form.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFormState {
    pub values: TransactionForm,
    pub errors: ValidationErrors,
    submitting: bool,
}

impl TransactionFormState {
    /// An empty form for an inflow dated `today`.
    pub fn new(today: Date) -> Self {
        Self::from_values(TransactionForm {
            type_: TransactionType::Inflow.as_str().to_owned(),
            date: today.to_string(),
            ..Default::default()
        })
    }

    /// A form holding the values the user entered and no errors.
    pub fn from_values(values: TransactionForm) -> Self {
        Self {
            values,
            errors: ValidationErrors::new(),
            submitting: false,
        }
    }

    /// The text currently in `field`.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Type => &self.values.type_,
            Field::Amount => &self.values.amount,
            Field::Date => &self.values.date,
            Field::Category => &self.values.category,
            Field::Description => &self.values.description,
        }
    }

    /// The message to show under `field`, if it has an error.
    pub fn error_message(&self, field: Field) -> Option<String> {
        self.errors.get(field).map(|error| error.message(field))
    }

    /// Whether a submission is waiting for a response.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Replace the text of `field` and clear any error it had.
    #[allow(dead_code)]
    pub fn on_change(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();

        match field {
            Field::Type => self.values.type_ = value,
            Field::Amount => self.values.amount = value,
            Field::Date => self.values.date = value,
            Field::Category => self.values.category = value,
            Field::Description => self.values.description = value,
        }

        self.errors.remove(field);
    }

    /// Validate only `field`, setting or clearing its error.
    pub fn on_blur(&mut self, field: Field, local_offset: UtcOffset) {
        let value = self.value(field);

        let result = match field {
            Field::Type => validate_type(value).map(drop),
            Field::Amount => validate_amount(value).map(drop),
            Field::Date => validate_date(value, local_offset).map(drop),
            Field::Category => validate_category(value).map(drop),
            Field::Description => Ok(()),
        };

        match result {
            Ok(()) => {
                self.errors.remove(field);
            }
            Err(error) => self.errors.insert(field, error),
        }
    }

    /// Validate every field and, if all are valid, start a submission.
    ///
    /// Fields are checked whether or not the user has visited them.
    pub fn submit(&mut self, local_offset: UtcOffset) -> Submission {
        if self.submitting {
            return Submission::InFlight;
        }

        match validate_transaction_form(&self.values, local_offset) {
            Ok(transaction) => {
                self.errors = ValidationErrors::new();
                self.submitting = true;
                Submission::Ready(transaction)
            }
            Err(errors) => {
                self.errors = errors;
                Submission::Invalid
            }
        }
    }

    /// Mark the current submission as finished so the form can be sent again.
    #[allow(dead_code)]
    pub fn settle(&mut self) {
        self.submitting = false;
    }
}
