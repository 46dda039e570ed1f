//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/loans/{loan_id}/pay', use [format_endpoint].

/// The root route which redirects to the report page or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users, lists the account's transactions.
pub const REPORT_VIEW: &str = "/transactions/report";
/// The page for depositing money.
pub const DEPOSIT_VIEW: &str = "/transactions/deposit";
/// The page for withdrawing money.
pub const WITHDRAW_VIEW: &str = "/transactions/withdraw";
/// The page for requesting a loan.
pub const LOAN_REQUEST_VIEW: &str = "/transactions/loan_request";
/// The page listing the account's loans.
pub const LOANS_VIEW: &str = "/loans";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to register users.
pub const USERS: &str = "/api/users";
/// The route to deposit money.
pub const DEPOSIT_API: &str = "/api/transactions/deposit";
/// The route to withdraw money.
pub const WITHDRAW_API: &str = "/api/transactions/withdraw";
/// The route to request a loan.
pub const LOANS_API: &str = "/api/loans";
/// The route to pay off an approved loan.
pub const PAY_LOAN: &str = "/api/loans/{loan_id}/pay";
/// The route to download the transaction report as CSV.
pub const STATEMENT_CSV: &str = "/api/statement.csv";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/loans/{loan_id}/pay', '{loan_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::REPORT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::DEPOSIT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::WITHDRAW_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOAN_REQUEST_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOANS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::REGISTER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::LOG_IN_API);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::USERS);
        assert_endpoint_is_valid_uri(endpoints::DEPOSIT_API);
        assert_endpoint_is_valid_uri(endpoints::WITHDRAW_API);
        assert_endpoint_is_valid_uri(endpoints::LOANS_API);
        assert_endpoint_is_valid_uri(endpoints::PAY_LOAN);
        assert_endpoint_is_valid_uri(endpoints::STATEMENT_CSV);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint(endpoints::PAY_LOAN, 7);

        assert_eq!(formatted_path, "/api/loans/7/pay");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_at_end() {
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
    }
}
