//! Defines the endpoint for paying off an approved loan.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    Error, UserID,
    account::get_account_by_user_id,
    endpoints,
    transaction::{
        TransactionId,
        create_endpoint::LedgerState,
        ledger::{PayLoanOutcome, pay_loan},
    },
};

/// A route handler for paying off a loan, redirects to the loan list.
///
/// Paying a loan that has not been approved changes nothing.
pub async fn pay_loan_endpoint(
    State(state): State<LedgerState>,
    Extension(user_id): Extension<UserID>,
    Path(loan_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let outcome = get_account_by_user_id(user_id, &connection)
        .and_then(|account| pay_loan(account.id, loan_id, &connection));

    match outcome {
        Ok(PayLoanOutcome::Paid(loan)) => {
            tracing::info!(
                "loan {loan_id} paid, balance is now {:.2}",
                loan.balance_after_transaction
            );
        }
        Ok(PayLoanOutcome::NotApproved) => {
            tracing::info!("ignored payment for loan {loan_id}: not approved");
        }
        Err(error) => {
            if !matches!(error, Error::RuleViolation(_) | Error::NotFound) {
                tracing::error!("could not pay loan {loan_id}: {error}");
            }

            return error.into_alert_response();
        }
    }

    (
        HxRedirect(endpoints::LOANS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
