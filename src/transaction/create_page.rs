//! The pages with the deposit, withdraw and loan request forms.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        dollar_input_styles, loading_spinner,
    },
    navigation::NavBar,
    transaction::command::TransactionKind,
};

/// The page a form lives on and the endpoint it posts to.
fn form_endpoints(kind: TransactionKind) -> (&'static str, &'static str) {
    match kind {
        TransactionKind::Deposit => (endpoints::DEPOSIT_VIEW, endpoints::DEPOSIT_API),
        TransactionKind::Withdrawal => (endpoints::WITHDRAW_VIEW, endpoints::WITHDRAW_API),
        TransactionKind::LoanRequest => (endpoints::LOAN_REQUEST_VIEW, endpoints::LOANS_API),
    }
}

/// The form for a single amount.
///
/// The create endpoints swap a copy of this form in place of the old one when
/// a request breaks a ledger rule, with `error_message` shown under the input.
pub(super) fn amount_form(kind: TransactionKind, amount: &str, error_message: Option<&str>) -> Markup {
    let (_, api_endpoint) = form_endpoints(kind);
    let spinner = loading_spinner();

    html! {
        form
            hx-post=(api_endpoint)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label
                    for="amount"
                    class=(FORM_LABEL_STYLE)
                {
                    "Amount"
                }

                // w-full needed to ensure input takes the full width when prefilled with a value
                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        placeholder="0.00"
                        required
                        autofocus
                        value=(amount)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                @if let Some(error_message) = error_message
                {
                    p class="text-red-500 text-base" { (error_message) }
                }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span
                    id="indicator"
                    class="inline htmx-indicator"
                {
                    (spinner)
                }
                " " (kind.title())
            }
        }
    }
}

fn amount_page(kind: TransactionKind) -> Markup {
    let (view_endpoint, _) = form_endpoints(kind);
    let nav_bar = NavBar::new(view_endpoint).into_html();
    let form = amount_form(kind, "", None);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { (kind.title()) }

            (form)
        }
    };

    base(kind.title(), &[dollar_input_styles()], &content)
}

/// Renders the deposit form.
pub async fn get_deposit_page() -> Response {
    amount_page(TransactionKind::Deposit).into_response()
}

/// Renders the withdraw form.
pub async fn get_withdraw_page() -> Response {
    amount_page(TransactionKind::Withdrawal).into_response()
}

/// Renders the loan request form.
pub async fn get_loan_request_page() -> Response {
    amount_page(TransactionKind::LoanRequest).into_response()
}

#[cfg(test)]
mod create_page_tests {
    use scraper::Selector;

    use crate::{
        endpoints,
        test_utils::{
            assert_amount_input, assert_content_type, assert_form_error_message,
            assert_form_submit_button_with_text, assert_hx_endpoint, assert_status_ok,
            assert_valid_html, must_get_form, parse_html_document, parse_html_fragment,
        },
        transaction::{
            command::TransactionKind,
            create_page::{
                amount_form, get_deposit_page, get_loan_request_page, get_withdraw_page,
            },
        },
    };

    #[tokio::test]
    async fn deposit_page_posts_to_deposit_api() {
        let response = get_deposit_page().await;

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::DEPOSIT_API, "hx-post");
        assert_amount_input(&form);
        assert_form_submit_button_with_text(&form, "Deposit");
    }

    #[tokio::test]
    async fn withdraw_page_posts_to_withdraw_api() {
        let response = get_withdraw_page().await;

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::WITHDRAW_API, "hx-post");
        assert_amount_input(&form);
        assert_form_submit_button_with_text(&form, "Withdraw");
    }

    #[tokio::test]
    async fn loan_request_page_posts_to_loans_api() {
        let response = get_loan_request_page().await;

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::LOANS_API, "hx-post");
        assert_amount_input(&form);
        assert_form_submit_button_with_text(&form, "Request Loan");
    }

    #[tokio::test]
    async fn form_only_asks_for_amount() {
        let document = parse_html_document(get_deposit_page().await).await;
        let form = must_get_form(&document);

        let inputs = form
            .select(&Selector::parse("input").unwrap())
            .collect::<Vec<_>>();

        assert_eq!(inputs.len(), 1, "want only the amount input");
    }

    #[tokio::test]
    async fn form_shows_error_message() {
        let markup = amount_form(
            TransactionKind::Withdrawal,
            "100",
            Some("You can withdraw at least 500 $"),
        );
        let response = axum::response::IntoResponse::into_response(markup);

        let fragment = parse_html_fragment(response).await;
        assert_valid_html(&fragment);
        let form = must_get_form(&fragment);
        assert_form_error_message(&form, "You can withdraw at least 500 $");
    }
}
