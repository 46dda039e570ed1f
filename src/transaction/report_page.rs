//! The transaction report page, the landing page for logged in users.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{
    OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem,
    macros::format_description,
};

use crate::{
    AppState, Error, UserID,
    account::get_account_by_user_id,
    endpoints,
    html::{
        BADGE_STYLE, BUTTON_SMALL_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency, link,
    },
    navigation::NavBar,
    timezone::get_local_offset,
    transaction::{
        Transaction, TransactionType,
        report::{Report, ReportQuery, build_report},
    },
};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

/// The state needed to show an account's transactions.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for reading accounts and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl ReportState {
    pub(super) fn local_offset(&self) -> Result<UtcOffset, Error> {
        get_local_offset(&self.local_timezone).ok_or_else(|| {
            tracing::error!("Invalid timezone {}", self.local_timezone);
            Error::InvalidTimezoneError(self.local_timezone.clone())
        })
    }
}

/// Format `timestamp` in the server's local time, to the minute.
pub(super) fn format_timestamp(timestamp: OffsetDateTime, local_offset: UtcOffset) -> String {
    timestamp
        .to_offset(local_offset)
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|error| {
            tracing::error!("could not format timestamp {timestamp}: {error}");
            timestamp.to_string()
        })
}

fn date_filter_form(query: &ReportQuery, error_message: Option<&str>) -> Markup {
    let start_date = query.start_date.as_deref().unwrap_or_default();
    let end_date = query.end_date.as_deref().unwrap_or_default();

    html! {
        form
            method="get"
            action=(endpoints::REPORT_VIEW)
            class="w-full flex flex-wrap items-end gap-4 mb-4"
        {
            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "From" }
                input
                    name="start_date"
                    id="start_date"
                    type="date"
                    value=(start_date)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "To" }
                input
                    name="end_date"
                    id="end_date"
                    type="date"
                    value=(end_date)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_SMALL_STYLE) { "Filter" }

            @if let Some(error_message) = error_message
            {
                p class="w-full text-red-500 text-base" { (error_message) }
            }
        }
    }
}

fn status_badge(transaction: &Transaction) -> Markup {
    match transaction.transaction_type {
        TransactionType::Loan if transaction.loan_approve => {
            html!(span class=(BADGE_STYLE) { "Approved" })
        }
        TransactionType::Loan => html!(span class=(BADGE_STYLE) { "Pending" }),
        _ => html!(),
    }
}

fn transaction_table(transactions: &[Transaction], local_offset: UtcOffset) -> Markup {
    html! {
        div class="relative overflow-x-auto shadow-md sm:rounded-lg w-full"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Balance After" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                (format_timestamp(transaction.timestamp, local_offset))
                            }
                            td class=(TABLE_CELL_STYLE) { (transaction.transaction_type) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                (format_currency(transaction.balance_after_transaction))
                            }
                            td class=(TABLE_CELL_STYLE) { (status_badge(transaction)) }
                        }
                    }

                    @if transactions.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="5" class="px-6 py-4 text-center"
                            {
                                "No transactions found."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn report_view(
    report: &Report,
    query: &ReportQuery,
    error_message: Option<&str>,
    local_offset: UtcOffset,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORT_VIEW).into_html();
    let balance_label = if report.range.is_some() {
        "Total for selected dates"
    } else {
        "Balance"
    };
    let query_string = query.to_query_string();
    let statement_url = if query_string.is_empty() {
        endpoints::STATEMENT_CSV.to_owned()
    } else {
        format!("{}?{query_string}", endpoints::STATEMENT_CSV)
    };

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-lg"
            {
                h2 class="text-xl font-bold mb-4" { "Transactions" }

                (date_filter_form(query, error_message))

                div class="flex justify-between items-center mb-4"
                {
                    span class="text-lg"
                    {
                        (balance_label) ": "
                        span id="balance" class="font-semibold" { (format_currency(report.balance)) }
                    }

                    (link(&statement_url, "Download CSV"))
                }

                (transaction_table(&report.transactions, local_offset))
            }
        }
    };

    base("Report", &[], &content)
}

/// Renders the account's transactions, optionally limited to a date range.
pub async fn get_report_page(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let local_offset = state.local_offset()?;

    // An invalid date shows the full report along with the error.
    let (range, error_message) = match query.date_range() {
        Ok(range) => (range, None),
        Err(message) => (None, Some(message)),
    };

    let report = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let account = get_account_by_user_id(user_id, &connection)
            .inspect_err(|error| tracing::error!("could not get account for {user_id}: {error}"))?;

        build_report(&account, range, local_offset, &connection)
            .inspect_err(|error| tracing::error!("could not build report: {error}"))?
    };

    Ok(report_view(&report, &query, error_message.as_deref(), local_offset).into_response())
}
