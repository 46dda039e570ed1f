//! Defines the core data models and database queries for transactions.

use std::fmt::Display;

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{
    Error,
    account::AccountId,
    money::{get_money, money_to_sql},
};

/// The database id of a [Transaction].
pub type TransactionId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// What kind of money movement a [Transaction] records.
///
/// Stored in the database as an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    /// Money paid into the account.
    Deposit,
    /// Money taken out of the account.
    Withdrawal,
    /// A loan the account holder asked for. Credited once approved.
    Loan,
    /// A loan that has been paid back.
    LoanPaid,
}

impl TransactionType {
    /// The integer stored in the database.
    pub fn code(self) -> i64 {
        match self {
            TransactionType::Deposit => 1,
            TransactionType::Withdrawal => 2,
            TransactionType::Loan => 3,
            TransactionType::LoanPaid => 4,
        }
    }

    /// The type stored as `code`, if any.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(TransactionType::Deposit),
            2 => Some(TransactionType::Withdrawal),
            3 => Some(TransactionType::Loan),
            4 => Some(TransactionType::LoanPaid),
            _ => None,
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdrawal => "Withdrawal",
            TransactionType::Loan => "Loan",
            TransactionType::LoanPaid => "Loan Paid",
        };

        f.write_str(label)
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = i64::column_result(value)?;

        TransactionType::from_code(code).ok_or(FromSqlError::OutOfRange(code))
    }
}

/// A single entry in an account's history.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The account the money moved in or out of.
    pub account_id: AccountId,
    /// How much money moved, in whole cents.
    ///
    /// Deposits and withdrawals are at least their minimum. A loan request
    /// takes whatever amount was asked for.
    pub amount: Decimal,
    /// What kind of movement this was.
    pub transaction_type: TransactionType,
    /// The account balance right after this transaction was recorded.
    pub balance_after_transaction: Decimal,
    /// When the transaction was recorded, in UTC.
    pub timestamp: OffsetDateTime,
    /// Whether a loan has been approved. Always false for other types.
    pub loan_approve: bool,
}

/// The fields of a transaction that is about to be recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub account_id: AccountId,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub balance_after_transaction: Decimal,
    pub timestamp: OffsetDateTime,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                amount TEXT NOT NULL,
                transaction_type INTEGER NOT NULL,
                balance_after_transaction TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                loan_approve INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // The report and loan list always filter by account and sort by time.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_account_timestamp
            ON \"transaction\"(account_id, timestamp);",
        (),
    )?;

    Ok(())
}

const SELECT_COLUMNS: &str = "SELECT id, account_id, amount, transaction_type, \
    balance_after_transaction, timestamp, loan_approve FROM \"transaction\"";

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        account_id: row.get(1)?,
        amount: get_money(row, 2)?,
        transaction_type: row.get(3)?,
        balance_after_transaction: get_money(row, 4)?,
        timestamp: row.get(5)?,
        loan_approve: row.get(6)?,
    })
}

/// Record a new, unapproved transaction.
///
/// # Errors
/// This function will return an [Error::SqlError] if the account does not
/// exist or there is some other SQL error.
pub fn insert_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "INSERT INTO \"transaction\"
                (account_id, amount, transaction_type, balance_after_transaction, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, account_id, amount, transaction_type,
                balance_after_transaction, timestamp, loan_approve",
        )?
        .query_row(
            (
                new_transaction.account_id,
                money_to_sql(new_transaction.amount),
                new_transaction.transaction_type,
                money_to_sql(new_transaction.balance_after_transaction),
                new_transaction.timestamp,
            ),
            map_transaction_row,
        )
        .map_err(Error::from)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_transaction_row)
        .map_err(Error::from)
}

/// Retrieve the transaction `id` only if it belongs to `account_id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not exist or belongs to another account.
pub fn get_account_transaction(
    id: TransactionId,
    account_id: AccountId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE id = :id AND account_id = :account_id"
        ))?
        .query_row(
            &[(":id", &id), (":account_id", &account_id)],
            map_transaction_row,
        )
        .map_err(Error::from)
}

/// All transactions of `account_id`, oldest first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_account_transactions(
    account_id: AccountId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE account_id = :account_id ORDER BY timestamp ASC, id ASC"
        ))?
        .query_map(&[(":account_id", &account_id)], map_transaction_row)?
        .map(|row| row.map_err(Error::from))
        .collect()
}

/// All loan requests of `account_id`, approved or not, oldest first.
///
/// Paid off loans are not included.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_loans(account_id: AccountId, connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE account_id = ?1 AND transaction_type = ?2
             ORDER BY timestamp ASC, id ASC"
        ))?
        .query_map((account_id, TransactionType::Loan), map_transaction_row)?
        .map(|row| row.map_err(Error::from))
        .collect()
}

/// Loans waiting for approval across every account, oldest first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_pending_loans(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE transaction_type = ?1 AND loan_approve = 0
             ORDER BY timestamp ASC, id ASC"
        ))?
        .query_map((TransactionType::Loan,), map_transaction_row)?
        .map(|row| row.map_err(Error::from))
        .collect()
}

/// Count the approved, unpaid loans of `account_id`.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn count_approved_loans(account_id: AccountId, connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\"
             WHERE account_id = ?1 AND transaction_type = ?2 AND loan_approve = 1",
            (account_id, TransactionType::Loan),
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Overwrite the mutable fields of a loan: its type, snapshot balance and approval flag.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not exist.
pub fn update_loan(
    id: TransactionId,
    transaction_type: TransactionType,
    balance_after_transaction: Decimal,
    loan_approve: bool,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET transaction_type = ?1, balance_after_transaction = ?2, loan_approve = ?3
         WHERE id = ?4",
        (
            transaction_type,
            money_to_sql(balance_after_transaction),
            loan_approve,
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
