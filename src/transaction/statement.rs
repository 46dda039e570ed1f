//! Exports the transaction report as a CSV file.

use axum::{
    Extension,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;

use crate::{
    Error, UserID,
    account::get_account_by_user_id,
    transaction::{
        Transaction, TransactionId,
        report::{ReportQuery, build_report},
        report_page::ReportState,
    },
};

/// One line of the statement. Field order sets the column order.
#[derive(Debug, Serialize)]
struct StatementRow {
    id: TransactionId,
    timestamp: String,
    transaction_type: String,
    amount: String,
    balance_after_transaction: String,
    loan_approve: bool,
}

impl TryFrom<&Transaction> for StatementRow {
    type Error = Error;

    fn try_from(transaction: &Transaction) -> Result<Self, Self::Error> {
        let timestamp = transaction
            .timestamp
            .format(&Rfc3339)
            .map_err(|error| Error::CsvError(error.to_string()))?;

        Ok(Self {
            id: transaction.id,
            timestamp,
            transaction_type: transaction.transaction_type.to_string(),
            amount: format!("{:.2}", transaction.amount),
            balance_after_transaction: format!("{:.2}", transaction.balance_after_transaction),
            loan_approve: transaction.loan_approve,
        })
    }
}

/// Write `transactions` as CSV with a header row.
fn write_statement(transactions: &[Transaction]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if transactions.is_empty() {
        writer
            .write_record([
                "id",
                "timestamp",
                "transaction_type",
                "amount",
                "balance_after_transaction",
                "loan_approve",
            ])
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    for transaction in transactions {
        writer
            .serialize(StatementRow::try_from(transaction)?)
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))
}

/// Download the account's transactions as `statement.csv`.
///
/// Takes the same date range query as the report page.
pub async fn get_statement_csv(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let range = match query.date_range() {
        Ok(range) => range,
        Err(message) => return (StatusCode::BAD_REQUEST, message).into_response(),
    };

    let local_offset = match state.local_offset() {
        Ok(offset) => offset,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let statement = get_account_by_user_id(user_id, &connection)
        .and_then(|account| build_report(&account, range, local_offset, &connection))
        .and_then(|report| write_statement(&report.transactions));

    match statement {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"statement.csv\"",
                ),
            ],
            body,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not create statement for {user_id}: {error}");
            error.into_response()
        }
    }
}
