//! Alert fragments for showing error messages to users.
//!
//! HTMX forms swap these into the page's alert container when a request fails.

use axum::response::{Html, IntoResponse, Response};
use maud::html;

/// An alert message with a short summary and a longer explanation.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// Something went wrong, `details` should tell the user how to fix it.
    Error { message: String, details: String },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Html<String> {
        let Alert::Error { message, details } = self;

        let markup = html! {
            div
                role="alert"
                class="flex items-start gap-3 p-4 mb-4 text-sm rounded-lg shadow \
                    text-red-800 bg-red-50 border border-red-300 \
                    dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
            {
                div class="flex-1"
                {
                    span class="font-semibold" { (message) }

                    @if !details.is_empty() {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    onclick="this.closest('[role=alert]').remove()"
                    class="ms-auto font-bold"
                {
                    "×"
                }
            }
        };

        Html(markup.into_string())
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

#[cfg(test)]
mod alert_tests {
    use scraper::{Html, Selector};

    use crate::alert::Alert;

    #[test]
    fn renders_message_and_details() {
        let alert = Alert::Error {
            message: "Transaction rejected".to_owned(),
            details: "You have crossed the loan limit".to_owned(),
        };

        let html = Html::parse_fragment(&alert.into_html().0);

        let selector = Selector::parse("div[role=alert]").unwrap();
        let text = html
            .select(&selector)
            .next()
            .expect("No alert found")
            .text()
            .collect::<String>();
        assert!(text.contains("Transaction rejected"));
        assert!(text.contains("You have crossed the loan limit"));
    }
}
