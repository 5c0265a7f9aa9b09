//! Ordering of transactions for the transactions table.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{
    locale::{Locale, TextCollator},
    transaction::Transaction,
};

/// The transaction field that the table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Type,
    Amount,
    Category,
    Description,
}

impl SortField {
    /// Every field in the order the table columns are displayed.
    pub const ALL: [SortField; 5] = [
        SortField::Date,
        SortField::Type,
        SortField::Amount,
        SortField::Category,
        SortField::Description,
    ];

    /// The value used in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Type => "type",
            SortField::Amount => "amount",
            SortField::Category => "category",
            SortField::Description => "description",
        }
    }

    /// The column heading.
    pub fn label(self) -> &'static str {
        match self {
            SortField::Date => "Date",
            SortField::Type => "Type",
            SortField::Amount => "Amount",
            SortField::Category => "Category",
            SortField::Description => "Description",
        }
    }
}

/// The direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    /// The value used in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Sort `transactions` by `field` in the direction `order`.
///
/// Text fields are collated for `locale`.
/// The input is left untouched, a new list of references is returned.
/// The sort is stable: transactions with equal keys keep their relative order
/// in both directions. Missing categories and descriptions compare as empty
/// text, so they come first when ascending and last when descending.
pub fn sort_transactions(
    transactions: &[Transaction],
    field: SortField,
    order: SortOrder,
    locale: Locale,
) -> Vec<&Transaction> {
    let collator = locale.collator();
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| order.apply(compare_by_field(a, b, field, &collator)));
    sorted
}

fn compare_by_field(
    a: &Transaction,
    b: &Transaction,
    field: SortField,
    collator: &TextCollator,
) -> Ordering {
    match field {
        SortField::Date => a.date.cmp(&b.date),
        SortField::Type => collator.compare(a.type_.as_str(), b.type_.as_str()),
        SortField::Amount => a.amount.cmp(&b.amount),
        SortField::Category => collator.compare(
            a.category.as_deref().unwrap_or_default(),
            b.category.as_deref().unwrap_or_default(),
        ),
        SortField::Description => collator.compare(
            a.description.as_deref().unwrap_or_default(),
            b.description.as_deref().unwrap_or_default(),
        ),
    }
}
