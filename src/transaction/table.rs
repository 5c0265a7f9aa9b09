//! The view-model for the transactions table.
//!
//! [TableState] holds what the user has chosen (sort and page) and each
//! `on_*` method returns the state after one user action. The state is
//! carried in the page URL, so every link on the page is the URL of the state
//! that clicking it leads to.

use serde::Deserialize;
use time::UtcOffset;

use crate::{
    database_id::TransactionId,
    format::{format_amount, format_date},
    locale::Locale,
    pagination::{PageRequest, Pagination, PaginationConfig},
    transaction::{
        Transaction, TransactionType,
        sort::{SortField, SortOrder, sort_transactions},
    },
};

/// The sort and page selected in the transactions table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableState {
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    /// The selected page, 1-based.
    pub current_page: u64,
    pub items_per_page: u64,
}

impl Default for TableState {
    fn default() -> Self {
        Self::with_page_size(PaginationConfig::default().default_page_size)
    }
}

impl TableState {
    /// The newest transactions first, on page 1.
    pub fn with_page_size(items_per_page: u64) -> Self {
        Self {
            sort_field: SortField::default(),
            sort_order: SortOrder::default(),
            current_page: 1,
            items_per_page,
        }
    }

    /// Sort by `field`.
    ///
    /// Choosing the current field again flips the direction, a new field
    /// starts ascending. Either way the table goes back to the first page.
    pub fn on_sort(self, field: SortField) -> Self {
        let sort_order = if field == self.sort_field {
            self.sort_order.toggled()
        } else {
            SortOrder::Ascending
        };

        Self {
            sort_field: field,
            sort_order,
            current_page: 1,
            ..self
        }
    }

    /// Go to `page`. Pages past the end are clamped when the table is built.
    pub fn on_page_change(self, page: u64) -> Self {
        Self {
            current_page: page.max(1),
            ..self
        }
    }

    /// Go to the first, previous, next or last page of `total_items`.
    pub fn on_navigate(self, request: PageRequest, total_items: u64) -> Self {
        let pagination = Pagination::new(total_items, self.items_per_page, self.current_page);

        self.on_page_change(pagination.navigate(request))
    }

    /// Show `items_per_page` rows per page, starting again from the first page.
    pub fn on_items_per_page_change(self, items_per_page: u64) -> Self {
        Self {
            items_per_page: items_per_page.max(1),
            current_page: 1,
            ..self
        }
    }

    /// Read the state from URL query parameters.
    ///
    /// Missing or unreadable parameters use the defaults, as does a page size
    /// that is not one of the configured options.
    pub fn from_query(query: &TableQuery, config: &PaginationConfig) -> Self {
        let sort_field = query
            .sort
            .as_deref()
            .and_then(|sort| {
                SortField::ALL
                    .into_iter()
                    .find(|field| field.as_str() == sort)
            })
            .unwrap_or_default();

        let sort_order = match query.order.as_deref() {
            Some("asc") => SortOrder::Ascending,
            Some("desc") => SortOrder::Descending,
            _ => SortOrder::default(),
        };

        let current_page = query
            .page
            .as_deref()
            .and_then(|page| page.parse().ok())
            .unwrap_or(config.default_page)
            .max(1);

        let items_per_page = config.page_size_or_default(
            query
                .per_page
                .as_deref()
                .and_then(|per_page| per_page.parse().ok()),
        );

        Self {
            sort_field,
            sort_order,
            current_page,
            items_per_page,
        }
    }

    pub fn to_query_string(self) -> String {
        format!(
            "sort={}&order={}&page={}&per_page={}",
            self.sort_field.as_str(),
            self.sort_order.as_str(),
            self.current_page,
            self.items_per_page
        )
    }

    pub fn to_url(self, route: &str) -> String {
        format!("{route}?{}", self.to_query_string())
    }
}

/// The raw query parameters of the transactions page.
///
/// Values are kept as text so that a bad value falls back to its default
/// instead of rejecting the whole request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableQuery {
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// A transaction formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: TransactionId,
    pub type_: TransactionType,
    pub date: String,
    /// Signed by direction, e.g. "+1234,56".
    pub amount: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Everything the transactions table displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    /// The state that was rendered, with the page clamped to the valid range.
    pub state: TableState,
    pub pagination: Pagination,
    /// The rows on the current page, in display order.
    pub rows: Vec<TableRow>,
}

/// Sort, paginate and format `transactions` for the table.
///
/// `locale` decides both how text columns are ordered and how values are displayed.
pub fn build_table_view(
    transactions: &[Transaction],
    state: TableState,
    local_offset: UtcOffset,
    locale: Locale,
) -> TableView {
    let sorted = sort_transactions(transactions, state.sort_field, state.sort_order, locale);
    let pagination = Pagination::new(
        sorted.len() as u64,
        state.items_per_page,
        state.current_page,
    );

    let rows = pagination
        .slice(&sorted)
        .iter()
        .map(|transaction| TableRow {
            id: transaction.id,
            type_: transaction.type_,
            date: format_date(transaction.date, local_offset, locale),
            amount: format_amount(transaction.amount, Some(transaction.type_), locale),
            category: transaction.category.clone(),
            description: transaction.description.clone(),
        })
        .collect();

    TableView {
        state: TableState {
            current_page: pagination.current_page,
            items_per_page: pagination.items_per_page,
            ..state
        },
        pagination,
        rows,
    }
}


#[cfg(test)]
mod view_tests {
    use time::{Duration, UtcOffset, macros::datetime};

    use crate::{
        locale::Locale,
        transaction::{
            Transaction, TransactionType,
            sort::{SortField, SortOrder},
        },
    };

    use super::{TableState, build_table_view};

    fn transactions(count: i64) -> Vec<Transaction> {
        (1..=count)
            .map(|id| Transaction {
                id,
                type_: TransactionType::Outflow,
                amount: id * 100,
                date: datetime!(2024-01-01 12:00 UTC) + Duration::days(id),
                category: Some("dining".to_owned()),
                description: None,
            })
            .collect()
    }

    #[test]
    fn shows_newest_page_first() {
        let transactions = transactions(25);

        let view = build_table_view(
            &transactions,
            TableState::default(),
            UtcOffset::UTC,
            Locale::Hungarian,
        );

        assert_eq!(view.pagination.total_pages, 3);
        assert_eq!(view.rows.len(), 10);
        assert_eq!(view.rows[0].id, 25);
        assert_eq!(view.rows[0].date, "2024. jan. 26.");
        assert_eq!(view.rows[0].amount, "-25,00");
    }

    #[test]
    fn last_page_is_partial() {
        let transactions = transactions(25);
        let state = TableState {
            sort_field: SortField::Amount,
            sort_order: SortOrder::Ascending,
            current_page: 3,
            items_per_page: 10,
        };

        let view = build_table_view(&transactions, state, UtcOffset::UTC, Locale::Hungarian);

        let ids: Vec<i64> = view.rows.iter().map(|row| row.id).collect();
        assert_eq!(ids, [21, 22, 23, 24, 25]);
        assert_eq!(view.pagination.first_item_number(), 21);
        assert_eq!(view.pagination.last_item_number(), 25);
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        let transactions = transactions(5);

        let view = build_table_view(
            &transactions,
            TableState::default().on_page_change(9),
            UtcOffset::UTC,
            Locale::Hungarian,
        );

        assert_eq!(view.state.current_page, 1);
        assert_eq!(view.rows.len(), 5);
    }

    #[test]
    fn category_column_is_collated_for_the_locale() {
        let categories = ["zöldség", "étterem", "autó"];
        let mut transactions = transactions(3);
        for (transaction, category) in transactions.iter_mut().zip(categories) {
            transaction.category = Some(category.to_owned());
        }
        let state = TableState::default().on_sort(SortField::Category);

        let view = build_table_view(&transactions, state, UtcOffset::UTC, Locale::Hungarian);

        let categories: Vec<&str> = view
            .rows
            .iter()
            .filter_map(|row| row.category.as_deref())
            .collect();
        assert_eq!(categories, ["autó", "étterem", "zöldség"]);
    }

    #[test]
    fn empty_list_has_no_rows_or_controls() {
        let view = build_table_view(&[], TableState::default(), UtcOffset::UTC, Locale::EnglishUs);

        assert!(view.rows.is_empty());
        assert!(view.pagination.is_empty());
        assert!(!view.pagination.show_controls());
    }
}
