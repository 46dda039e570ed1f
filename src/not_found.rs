//! The 404 page.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// Renders the 404 page with a 404 status code.
pub struct NotFoundError;

impl IntoResponse for NotFoundError {
    fn into_response(self) -> Response {
        let page = error_view(
            "Not Found",
            "404",
            "Page not found.",
            "Sorry, we can't find that page. Check the address or head back home.",
        );

        (StatusCode::NOT_FOUND, Html(page.into_string())).into_response()
    }
}

/// Fallback route handler for requests that match no route.
pub async fn get_404_not_found() -> Response {
    NotFoundError.into_response()
}
