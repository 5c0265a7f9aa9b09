//! Formatting of transaction amounts and dates for display.
//!
//! All functions here are pure: the output depends only on the arguments, so
//! the same locale and offset always produce the same string.

use icu_decimal::{DecimalFormatter, input::Decimal};
use time::{
    Date, OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::{locale::Locale, transaction::TransactionType};

/// Format an amount of minor currency units (e.g. cents) for display.
///
/// The amount is shown in major units with exactly two fraction digits,
/// using the decimal and group separators of `locale`. When `direction` is
/// given the string is prefixed with `+` for inflows and `-` for outflows,
/// otherwise no sign is shown.
///
/// ```ignore
/// assert_eq!(format_amount(123456, Some(TransactionType::Inflow), Locale::Hungarian), "+1234,56");
/// ```
pub fn format_amount(amount: i64, direction: Option<TransactionType>, locale: Locale) -> String {
    let sign = match direction {
        Some(TransactionType::Inflow) => "+",
        Some(TransactionType::Outflow) => "-",
        None if amount < 0 => "-",
        None => "",
    };

    let minor_units = amount.unsigned_abs();
    // Trailing zeros are kept by the parser, so "0.00" keeps both fraction digits.
    let major_units = format!("{}.{:02}", minor_units / 100, minor_units % 100);

    format!("{sign}{}", format_decimal(&major_units, locale))
}

fn format_decimal(decimal_text: &str, locale: Locale) -> String {
    let decimal = match decimal_text.parse::<Decimal>() {
        Ok(decimal) => decimal,
        Err(error) => {
            tracing::warn!("could not read {decimal_text:?} as a decimal: {error:?}");
            return decimal_text.replace('.', &locale.decimal_separator().to_string());
        }
    };

    match DecimalFormatter::try_new(locale.icu_locale().into(), Default::default()) {
        Ok(formatter) => formatter.format(&decimal).to_string(),
        Err(error) => {
            tracing::warn!("no number formatting data for {locale}: {error}");
            decimal_text.replace('.', &locale.decimal_separator().to_string())
        }
    }
}

/// A value that can be displayed as a date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateLike<'a> {
    /// A point in time, shown as the calendar date at the display offset.
    Instant(OffsetDateTime),
    /// A calendar date, shown as is.
    Calendar(Date),
    /// An RFC 3339 timestamp or a `YYYY-MM-DD`/`YYYY/MM/DD` date.
    Text(&'a str),
}

impl From<OffsetDateTime> for DateLike<'_> {
    fn from(value: OffsetDateTime) -> Self {
        DateLike::Instant(value)
    }
}

impl From<Date> for DateLike<'_> {
    fn from(value: Date) -> Self {
        DateLike::Calendar(value)
    }
}

impl<'a> From<&'a str> for DateLike<'a> {
    fn from(value: &'a str) -> Self {
        DateLike::Text(value)
    }
}

/// Format a date as year, abbreviated month and day in the style of `locale`.
///
/// Instants are converted to `offset` before taking the calendar date.
/// Text that cannot be read as a date is returned unchanged.
pub fn format_date<'a>(value: impl Into<DateLike<'a>>, offset: UtcOffset, locale: Locale) -> String {
    let date = match value.into() {
        DateLike::Instant(instant) => instant.to_offset(offset).date(),
        DateLike::Calendar(date) => date,
        DateLike::Text(text) => match parse_date_text(text, offset) {
            Some(date) => date,
            None => {
                tracing::debug!("could not read {text:?} as a date, displaying it verbatim");
                return text.to_owned();
            }
        },
    };

    format_calendar_date(date, locale)
}

/// Read `text` as a calendar date.
///
/// Accepts RFC 3339 timestamps, which are converted to `offset`, and plain
/// `YYYY-MM-DD` or `YYYY/MM/DD` dates.
pub fn parse_date_text(text: &str, offset: UtcOffset) -> Option<Date> {
    let text = text.trim();

    if let Ok(instant) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(instant.to_offset(offset).date());
    }

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .or_else(|_| Date::parse(text, format_description!("[year]/[month]/[day]")))
        .ok()
}

fn format_calendar_date(date: Date, locale: Locale) -> String {
    let month = locale.month_abbreviation(date.month());

    match locale {
        Locale::Hungarian => format!("{}. {month} {}.", date.year(), date.day()),
        Locale::EnglishUs => format!("{month} {}, {}", date.day(), date.year()),
    }
}

#[cfg(test)]
mod format_amount_tests {
    use crate::{locale::Locale, transaction::TransactionType};

    use super::format_amount;

    #[test]
    fn inflow_has_plus_sign() {
        assert_eq!(
            format_amount(123456, Some(TransactionType::Inflow), Locale::Hungarian),
            "+1234,56"
        );
    }

    #[test]
    fn outflow_has_minus_sign() {
        assert_eq!(
            format_amount(123456, Some(TransactionType::Outflow), Locale::Hungarian),
            "-1234,56"
        );
    }

    #[test]
    fn no_direction_has_no_sign() {
        assert_eq!(format_amount(123456, None, Locale::Hungarian), "1234,56");
    }

    #[test]
    fn zero_keeps_sign_and_two_decimals() {
        assert_eq!(
            format_amount(0, Some(TransactionType::Outflow), Locale::Hungarian),
            "-0,00"
        );
        assert_eq!(
            format_amount(0, Some(TransactionType::Inflow), Locale::Hungarian),
            "+0,00"
        );
    }

    #[test]
    fn always_shows_two_decimal_places() {
        assert_eq!(format_amount(10000, None, Locale::Hungarian), "100,00");
        assert_eq!(
            format_amount(1, Some(TransactionType::Inflow), Locale::Hungarian),
            "+0,01"
        );
        assert_eq!(format_amount(1230, None, Locale::EnglishUs), "12.30");
    }

    #[test]
    fn groups_large_amounts() {
        assert_eq!(
            format_amount(1234567890, Some(TransactionType::Outflow), Locale::Hungarian),
            "-12\u{a0}345\u{a0}678,90"
        );
        assert_eq!(format_amount(1234567890, None, Locale::EnglishUs), "12,345,678.90");
    }

    #[test]
    fn respects_minimum_grouping_digits() {
        assert_eq!(format_amount(123400, None, Locale::EnglishUs), "1,234.00");
        assert_eq!(format_amount(123400, None, Locale::Hungarian), "1234,00");
    }

    #[test]
    fn negative_amount_without_direction_is_signed() {
        assert_eq!(format_amount(-250, None, Locale::EnglishUs), "-2.50");
    }
}
