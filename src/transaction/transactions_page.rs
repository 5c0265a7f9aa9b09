//! Defines the route handler for the page that lists transactions as a table.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        INFLOW_BADGE_STYLE, LINK_STYLE, OUTFLOW_BADGE_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
    },
    locale::Locale,
    navigation::NavBar,
    pagination::{PageRequest, PaginationConfig},
    timezone::local_offset_or_error,
    transaction::{
        TransactionType, get_all_transactions,
        sort::{SortField, SortOrder},
        table::{TableQuery, TableRow, TableState, TableView, build_table_view},
    },
};

/// Shown in place of a missing category or description.
const PLACEHOLDER: &str = "—";

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Budapest".
    pub local_timezone: String,
    /// The locale used to format amounts and dates.
    pub locale: Locale,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            locale: state.locale,
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Render an overview of the user's transactions.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Query(query): Query<TableQuery>,
) -> Result<Response, Error> {
    let local_offset = local_offset_or_error(&state.local_timezone)?;
    let table_state = TableState::from_query(&query, &state.pagination_config);

    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_transactions(&connection)?
    };

    let view = build_table_view(&transactions, table_state, local_offset, state.locale);

    Ok(transactions_view(&view, &state.pagination_config.page_size_options).into_response())
}

fn transactions_view(view: &TableView, page_size_options: &[u64]) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl" id="transactions-content"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Add Transaction"
                    }
                }

                @if view.pagination.is_empty() {
                    p id="empty-state" class="py-8 text-center text-gray-500 dark:text-gray-400"
                    {
                        "No transactions yet. "
                        a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                        {
                            "Add your first transaction."
                        }
                    }
                } @else {
                    (transactions_table(view))

                    div class="flex flex-wrap justify-between items-center gap-4 text-sm"
                    {
                        p id="pagination-summary"
                        {
                            "Showing "
                            (view.pagination.first_item_number())
                            "–"
                            (view.pagination.last_item_number())
                            " of "
                            (view.pagination.total_items)
                            " transactions"
                        }

                        (page_size_selector(view.state, page_size_options))
                    }

                    @if view.pagination.show_controls() {
                        (pagination_controls(view))
                    }
                }
            }
        }
    };

    base("Transactions", &content)
}

fn transactions_table(view: &TableView) -> Markup {
    html! {
        div class="overflow-x-auto rounded"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        @for field in SortField::ALL {
                            (sort_header(view.state, field))
                        }
                    }
                }

                tbody
                {
                    @for row in &view.rows {
                        (transaction_row(row))
                    }
                }
            }
        }
    }
}

fn sort_header(state: TableState, field: SortField) -> Markup {
    let is_sorted = state.sort_field == field;
    let aria_sort = match (is_sorted, state.sort_order) {
        (false, _) => "none",
        (true, SortOrder::Ascending) => "ascending",
        (true, SortOrder::Descending) => "descending",
    };
    let indicator = match (is_sorted, state.sort_order) {
        (false, _) => "",
        (true, SortOrder::Ascending) => " ▲",
        (true, SortOrder::Descending) => " ▼",
    };

    html! {
        th scope="col" class="px-6 py-3" aria-sort=(aria_sort)
        {
            a
                href=(state.on_sort(field).to_url(endpoints::TRANSACTIONS_VIEW))
                data-sort-field=(field.as_str())
                class="hover:underline"
            {
                (field.label()) (indicator)
            }
        }
    }
}

fn transaction_row(row: &TableRow) -> Markup {
    let (badge_style, amount_style) = match row.type_ {
        TransactionType::Inflow => (INFLOW_BADGE_STYLE, "text-green-700 dark:text-green-400"),
        TransactionType::Outflow => (OUTFLOW_BADGE_STYLE, "text-red-700 dark:text-red-400"),
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(row.id)
        {
            td class=(TABLE_CELL_STYLE) { (row.date) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(badge_style) { (row.type_.label()) }
            }
            td class={ "px-6 py-4 text-right tabular-nums " (amount_style) } { (row.amount) }
            td class=(TABLE_CELL_STYLE) { (row.category.as_deref().unwrap_or(PLACEHOLDER)) }
            td class=(TABLE_CELL_STYLE) { (row.description.as_deref().unwrap_or(PLACEHOLDER)) }
        }
    }
}

fn pagination_controls(view: &TableView) -> Markup {
    let total_items = view.pagination.total_items;
    let link = |request: PageRequest| {
        view.state
            .on_navigate(request, total_items)
            .to_url(endpoints::TRANSACTIONS_VIEW)
    };

    let controls = [
        ("First", PageRequest::First, view.pagination.has_previous()),
        ("Previous", PageRequest::Previous, view.pagination.has_previous()),
        ("Next", PageRequest::Next, view.pagination.has_next()),
        ("Last", PageRequest::Last, view.pagination.has_next()),
    ];

    html! {
        nav class="pagination flex justify-center" aria-label="Pagination"
        {
            ul class="flex items-center gap-2"
            {
                @for (label, request, is_enabled) in controls {
                    li
                    {
                        @if is_enabled {
                            a href=(link(request)) role="button" class="block px-3 py-2 rounded-sm text-blue-600 hover:underline"
                            { (label) }
                        } @else {
                            span aria-disabled="true" class="block px-3 py-2 text-gray-400 dark:text-gray-500"
                            { (label) }
                        }
                    }
                }

                li
                {
                    span aria-current="page" class="block px-3 py-2 font-bold text-black dark:text-white"
                    {
                        "Page " (view.pagination.current_page) " of " (view.pagination.total_pages)
                    }
                }
            }
        }
    }
}

fn page_size_selector(state: TableState, page_size_options: &[u64]) -> Markup {
    html! {
        div id="page-size" class="flex items-center gap-2"
        {
            span { "Per page:" }

            @for &size in page_size_options {
                @if size == state.items_per_page {
                    span aria-current="true" class="font-bold" { (size) }
                } @else {
                    a
                        href=(state.on_items_per_page_change(size).to_url(endpoints::TRANSACTIONS_VIEW))
                        class=(LINK_STYLE)
                    { (size) }
                }
            }
        }
    }
}
