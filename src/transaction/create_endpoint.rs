//! Defines the endpoints for depositing, withdrawing and requesting loans.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    account::get_account_by_user_id,
    endpoints,
    transaction::{
        command::{AmountForm, TransactionCommand, TransactionKind},
        create_page::amount_form,
        ledger::execute,
    },
};

/// The state needed to change an account's balance.
#[derive(Debug, Clone)]
pub struct LedgerState {
    /// The database connection for managing accounts and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LedgerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for depositing money, redirects to the report on success.
pub async fn create_deposit_endpoint(
    State(state): State<LedgerState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<AmountForm>,
) -> Response {
    create_transaction(TransactionKind::Deposit, &state, user_id, &form)
}

/// A route handler for withdrawing money, redirects to the report on success.
pub async fn create_withdrawal_endpoint(
    State(state): State<LedgerState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<AmountForm>,
) -> Response {
    create_transaction(TransactionKind::Withdrawal, &state, user_id, &form)
}

/// A route handler for requesting a loan, redirects to the report on success.
pub async fn create_loan_request_endpoint(
    State(state): State<LedgerState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<AmountForm>,
) -> Response {
    create_transaction(TransactionKind::LoanRequest, &state, user_id, &form)
}

fn create_transaction(
    kind: TransactionKind,
    state: &LedgerState,
    user_id: UserID,
    form: &AmountForm,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let account = match get_account_by_user_id(user_id, &connection) {
        Ok(account) => account,
        Err(error) => {
            tracing::error!("could not get account for user {user_id}: {error}");
            return error.into_alert_response();
        }
    };

    let result = TransactionCommand::new(kind, account.id, form)
        .map_err(Error::from)
        .and_then(|command| execute(&command, &connection));

    match result {
        Ok(transaction) => {
            tracing::info!(
                "account {}: {}",
                account.id,
                kind.success_message(transaction.amount)
            );

            (
                HxRedirect(endpoints::REPORT_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::RuleViolation(violation)) => {
            tracing::debug!("account {} refused {kind:?}: {violation}", account.id);

            amount_form(kind, &form.amount, Some(&violation.to_string())).into_response()
        }
        Err(error) => {
            tracing::error!("could not record {kind:?} for account {}: {error}", account.id);
            error.into_alert_response()
        }
    }
}
