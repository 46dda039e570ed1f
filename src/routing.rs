//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_register_page, post_log_in,
        register_user,
    },
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::{
        create_deposit_endpoint, create_loan_request_endpoint, create_withdrawal_endpoint,
        get_deposit_page, get_loan_request_page, get_loans_page, get_report_page,
        get_statement_csv, get_withdraw_page, pay_loan_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::REPORT_VIEW, get(get_report_page))
        .route(endpoints::DEPOSIT_VIEW, get(get_deposit_page))
        .route(endpoints::WITHDRAW_VIEW, get(get_withdraw_page))
        .route(endpoints::LOAN_REQUEST_VIEW, get(get_loan_request_page))
        .route(endpoints::LOANS_VIEW, get(get_loans_page))
        .route(endpoints::STATEMENT_CSV, get(get_statement_csv))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::DEPOSIT_API, post(create_deposit_endpoint))
            .route(endpoints::WITHDRAW_API, post(create_withdrawal_endpoint))
            .route(endpoints::LOANS_API, post(create_loan_request_endpoint))
            .route(endpoints::PAY_LOAN, post(pay_loan_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the report page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::REPORT_VIEW)
}
