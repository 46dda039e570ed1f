//! The page listing the account's loans, with a button to pay off approved ones.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::UtcOffset;

use crate::{
    Error, UserID,
    account::get_account_by_user_id,
    endpoints::{self, format_endpoint},
    html::{
        BADGE_STYLE, BUTTON_SMALL_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, link,
    },
    navigation::NavBar,
    transaction::{
        Transaction,
        core::get_loans,
        report_page::{ReportState, format_timestamp},
    },
};

fn loan_row(loan: &Transaction, local_offset: UtcOffset) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE) data-loan-id=(loan.id)
        {
            td class=(TABLE_CELL_STYLE) { (format_timestamp(loan.timestamp, local_offset)) }
            td class=(TABLE_CELL_STYLE) { (format_currency(loan.amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                @if loan.loan_approve {
                    span class=(BADGE_STYLE) { "Approved" }
                } @else {
                    span class=(BADGE_STYLE) { "Pending approval" }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                @if loan.loan_approve {
                    button
                        type="button"
                        hx-post=(format_endpoint(endpoints::PAY_LOAN, loan.id))
                        hx-target-error="#alert-container"
                        class=(BUTTON_SMALL_STYLE)
                    {
                        "Pay"
                    }
                }
            }
        }
    }
}

fn loans_view(loans: &[Transaction], local_offset: UtcOffset) -> Markup {
    let nav_bar = NavBar::new(endpoints::LOANS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-lg"
            {
                div class="flex justify-between items-center mb-4"
                {
                    h2 class="text-xl font-bold" { "Loans" }

                    (link(endpoints::LOAN_REQUEST_VIEW, "Request a loan"))
                }

                div class="relative overflow-x-auto shadow-md sm:rounded-lg"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Requested" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for loan in loans {
                                (loan_row(loan, local_offset))
                            }

                            @if loans.is_empty() {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td colspan="4" class="px-6 py-4 text-center"
                                    {
                                        "You have no loans."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Loans", &[], &content)
}

/// Renders the caller's loans, oldest first.
pub async fn get_loans_page(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let local_offset = state.local_offset()?;

    let loans = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let account = get_account_by_user_id(user_id, &connection)
            .inspect_err(|error| tracing::error!("could not get account for {user_id}: {error}"))?;

        get_loans(account.id, &connection)
            .inspect_err(|error| tracing::error!("could not get loans: {error}"))?
    };

    Ok(loans_view(&loans, local_offset).into_response())
}
