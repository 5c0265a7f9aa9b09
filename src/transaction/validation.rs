//! Validation and normalization rules for transaction input.
//!
//! The same rules are used by the HTML form and by the remote procedures so
//! that both accept and reject exactly the same input. Validation never
//! panics: failures are returned as [FieldError] values collected into
//! [ValidationErrors].

use std::{collections::BTreeMap, fmt::Display};

use serde::{Deserialize, Deserializer, Serialize};
use time::{OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::{
    database_id::TransactionId,
    format::parse_date_text,
    transaction::{NewTransaction, TransactionPatch, TransactionType},
};

/// A transaction field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Type,
    Amount,
    Date,
    Category,
    Description,
}

impl Field {
    /// The name used in forms and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Type => "type",
            Field::Amount => "amount",
            Field::Date => "date",
            Field::Category => "category",
            Field::Description => "description",
        }
    }

    /// The human readable name.
    pub fn label(self) -> &'static str {
        match self {
            Field::Type => "Type",
            Field::Amount => "Amount",
            Field::Date => "Date",
            Field::Category => "Category",
            Field::Description => "Description",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// The field was empty.
    Required,
    /// The amount was not made up of only the digits 0-9.
    NotAWholeNumber,
    /// The amount does not fit in a 64-bit integer.
    TooLarge,
    /// The amount was negative.
    TooSmall,
    /// The field contained only whitespace.
    WhitespaceOnly,
    /// The transaction type was neither "inflow" nor "outflow".
    InvalidType,
    /// The date could not be read.
    InvalidDate,
}

impl FieldError {
    /// A short machine readable code, e.g. "too_small".
    pub fn code(self) -> &'static str {
        match self {
            FieldError::Required => "required",
            FieldError::NotAWholeNumber => "not_a_whole_number",
            FieldError::TooLarge => "too_big",
            FieldError::TooSmall => "too_small",
            FieldError::WhitespaceOnly => "whitespace_only",
            FieldError::InvalidType => "invalid_enum_value",
            FieldError::InvalidDate => "invalid_date",
        }
    }

    /// The message shown next to `field` in the form.
    pub fn message(self, field: Field) -> String {
        let label = field.label();

        match self {
            FieldError::Required => format!("{label} is required"),
            FieldError::NotAWholeNumber => format!("{label} must be a positive whole number"),
            FieldError::TooLarge => format!("{label} is too large"),
            FieldError::TooSmall => format!("{label} must be zero or more"),
            FieldError::WhitespaceOnly => format!("{label} cannot be only whitespace"),
            FieldError::InvalidType => {
                format!("{label} must be either \"inflow\" or \"outflow\"")
            }
            FieldError::InvalidDate => format!("{label} is not a valid date"),
        }
    }
}

/// The errors for each field that failed validation, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the errors for a single failing field.
    pub fn single(field: Field, error: FieldError) -> Self {
        let mut errors = Self::new();
        errors.insert(field, error);
        errors
    }

    /// Record `error` for `field`, replacing any earlier error for that field.
    pub fn insert(&mut self, field: Field, error: FieldError) {
        self.0.insert(field, error);
    }

    pub fn remove(&mut self, field: Field) -> Option<FieldError> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.0.iter().map(|(field, error)| (*field, *error))
    }

    /// Store the result of validating one field, returning the valid value if any.
    fn check<T>(&mut self, field: Field, result: Result<T, FieldError>) -> Option<T> {
        result.inspect_err(|error| self.insert(field, *error)).ok()
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (field, error)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {} ({})", error.message(field), error.code())?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// FIELD RULES
// ============================================================================

/// Check that `raw` is a whole, non-negative number of minor units.
///
/// Only the digits 0-9 are accepted: no sign, no decimal point and no
/// thousands separators. Surrounding whitespace is not accepted either.
pub fn validate_amount(raw: &str) -> Result<i64, FieldError> {
    if raw.trim().is_empty() {
        return Err(FieldError::Required);
    }

    if !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(FieldError::NotAWholeNumber);
    }

    raw.parse().map_err(|_| FieldError::TooLarge)
}

/// Trim and lowercase a category.
///
/// An empty value is [FieldError::Required], while a value made up only of
/// whitespace is [FieldError::WhitespaceOnly].
pub fn validate_category(raw: &str) -> Result<String, FieldError> {
    if raw.is_empty() {
        return Err(FieldError::Required);
    }

    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(FieldError::WhitespaceOnly);
    }

    Ok(trimmed.to_lowercase())
}

/// Trim a description, turning blank text into `None`.
pub fn normalize_description(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|description| !description.is_empty())
        .map(ToOwned::to_owned)
}

/// Read a transaction type from its form value.
pub fn validate_type(raw: &str) -> Result<TransactionType, FieldError> {
    if raw.trim().is_empty() {
        return Err(FieldError::Required);
    }

    raw.trim().parse().map_err(|_| FieldError::InvalidType)
}

/// Read a date from a form, placing it at midnight in `local_offset`.
pub fn validate_date(raw: &str, local_offset: UtcOffset) -> Result<OffsetDateTime, FieldError> {
    if raw.trim().is_empty() {
        return Err(FieldError::Required);
    }

    let date = parse_date_text(raw, local_offset).ok_or(FieldError::InvalidDate)?;

    Ok(PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_offset(local_offset))
}

// ============================================================================
// WHOLE INPUTS
// ============================================================================

/// The raw text of the new transaction form, exactly as it was entered.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionForm {
    #[serde(rename = "type", default)]
    pub type_: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

/// Validate every field of the form, collecting an error for each bad field.
///
/// On success the normalized transaction is returned, ready to be added.
pub fn validate_transaction_form(
    form: &TransactionForm,
    local_offset: UtcOffset,
) -> Result<NewTransaction, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let type_ = errors.check(Field::Type, validate_type(&form.type_));
    let amount = errors.check(Field::Amount, validate_amount(&form.amount));
    let date = errors.check(Field::Date, validate_date(&form.date, local_offset));
    let category = errors.check(Field::Category, validate_category(&form.category));

    match (type_, amount, date, category) {
        (Some(type_), Some(amount), Some(date), Some(category)) if errors.is_empty() => {
            Ok(NewTransaction {
                type_,
                amount,
                date,
                category: Some(category),
                description: normalize_description(Some(&form.description)),
            })
        }
        _ => Err(errors),
    }
}

/// The typed input of the add transaction procedure.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewTransactionInput {
    #[serde(rename = "type")]
    pub type_: TransactionType,
    pub amount: i64,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Validate the input of the add transaction procedure.
///
/// A missing date is replaced with `now`. A missing category is allowed, but
/// a category that is given must not be blank.
pub fn validate_new_transaction(
    input: NewTransactionInput,
    now: OffsetDateTime,
) -> Result<NewTransaction, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let amount = errors.check(Field::Amount, check_non_negative(input.amount));
    let category = input
        .category
        .as_deref()
        .and_then(|category| errors.check(Field::Category, validate_category(category)));

    match amount {
        Some(amount) if errors.is_empty() => Ok(NewTransaction {
            type_: input.type_,
            amount,
            date: input.date.unwrap_or(now),
            category,
            description: normalize_description(input.description.as_deref()),
        }),
        _ => Err(errors),
    }
}

impl From<NewTransaction> for NewTransactionInput {
    fn from(transaction: NewTransaction) -> Self {
        Self {
            type_: transaction.type_,
            amount: transaction.amount,
            date: Some(transaction.date),
            category: transaction.category,
            description: transaction.description,
        }
    }
}

/// The typed input of the update transaction procedure.
///
/// Fields that are absent keep their stored value. For `description`, an
/// explicit `null` clears the stored value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionPatchInput {
    pub id: TransactionId,
    #[serde(rename = "type", default)]
    pub type_: Option<TransactionType>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub description: Option<Option<String>>,
}

/// Distinguishes a field set to `null` from a missing field.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Validate the input of the update transaction procedure.
///
/// Only the fields that are present are checked, using the same rules as
/// [validate_new_transaction]. A blank description clears it.
pub fn validate_transaction_patch(
    input: &TransactionPatchInput,
) -> Result<TransactionPatch, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let amount = input
        .amount
        .and_then(|amount| errors.check(Field::Amount, check_non_negative(amount)));
    let category = input
        .category
        .as_deref()
        .and_then(|category| errors.check(Field::Category, validate_category(category)));

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(TransactionPatch {
        type_: input.type_,
        amount,
        date: input.date,
        category,
        description: input
            .description
            .as_ref()
            .map(|description| normalize_description(description.as_deref())),
    })
}

fn check_non_negative(amount: i64) -> Result<i64, FieldError> {
    if amount < 0 {
        Err(FieldError::TooSmall)
    } else {
        Ok(amount)
    }
}
