//! Applies transactions to account balances.
//!
//! Each operation reads the balance, checks the rules, updates the balance and
//! records the transaction inside one SQLite transaction. Callers hold the
//! connection mutex for the whole call, so no other request can change the
//! balance between the check and the write.

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    account::{AccountId, get_account, set_balance},
    transaction::{
        Transaction, TransactionId, TransactionType,
        command::{TransactionCommand, TransactionKind},
        core::{
            NewTransaction, count_approved_loans, get_account_transaction, get_transaction,
            insert_transaction, update_loan,
        },
        rules::{
            RuleViolation, check_deposit, check_loan_payoff, check_loan_request, check_withdrawal,
        },
    },
};

/// Run a deposit, withdrawal or loan request against the command's account.
///
/// Returns the recorded transaction. Its `balance_after_transaction` is the
/// account balance once the command has been applied.
///
/// # Errors
///
/// Returns a:
/// - [Error::RuleViolation] if the command breaks a ledger rule,
/// - [Error::NotFound] if the account does not exist,
/// - [Error::SqlError] if the database could not be read or written.
///
/// Nothing is written when an error is returned.
pub fn execute(command: &TransactionCommand, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection.unchecked_transaction()?;
    let account = get_account(command.account_id, &transaction)?;

    let new_balance = match command.kind {
        TransactionKind::Deposit => {
            check_deposit(command.amount)?;
            account
                .balance
                .checked_add(command.amount)
                .ok_or(RuleViolation::InvalidAmount)?
        }
        TransactionKind::Withdrawal => {
            check_withdrawal(command.amount, account.balance)?;
            account.balance - command.amount
        }
        // Loans are only credited once approved.
        TransactionKind::LoanRequest => {
            let approved_loans = count_approved_loans(account.id, &transaction)?;
            check_loan_request(approved_loans)?;
            account.balance
        }
    };

    if new_balance != account.balance {
        set_balance(account.id, new_balance, &transaction)?;
    }

    let recorded = insert_transaction(
        NewTransaction {
            account_id: account.id,
            amount: command.amount,
            transaction_type: command.kind.transaction_type(),
            balance_after_transaction: new_balance,
            timestamp: OffsetDateTime::now_utc(),
        },
        &transaction,
    )?;

    transaction.commit()?;

    Ok(recorded)
}

/// What happened when a user asked to pay off a loan.
#[derive(Debug, Clone, PartialEq)]
pub enum PayLoanOutcome {
    /// The loan was paid and the balance debited.
    Paid(Transaction),
    /// The loan has not been approved, so nothing changed.
    NotApproved,
}

/// Pay off loan `loan_id` from the balance of `account_id`.
///
/// # Errors
///
/// Returns a:
/// - [Error::NotFound] if the loan does not exist or belongs to another account,
/// - [Error::RuleViolation] if the loan is not strictly smaller than the balance,
/// - [Error::SqlError] if the database could not be read or written.
pub fn pay_loan(
    account_id: AccountId,
    loan_id: TransactionId,
    connection: &Connection,
) -> Result<PayLoanOutcome, Error> {
    let transaction = connection.unchecked_transaction()?;
    let loan = get_account_transaction(loan_id, account_id, &transaction)?;

    if loan.transaction_type != TransactionType::Loan || !loan.loan_approve {
        return Ok(PayLoanOutcome::NotApproved);
    }

    let account = get_account(account_id, &transaction)?;
    check_loan_payoff(loan.amount, account.balance)?;

    let new_balance = account
        .balance
        .checked_sub(loan.amount)
        .ok_or(RuleViolation::InvalidAmount)?;
    set_balance(account.id, new_balance, &transaction)?;
    update_loan(
        loan.id,
        TransactionType::LoanPaid,
        new_balance,
        false,
        &transaction,
    )?;

    transaction.commit()?;

    Ok(PayLoanOutcome::Paid(Transaction {
        transaction_type: TransactionType::LoanPaid,
        balance_after_transaction: new_balance,
        loan_approve: false,
        ..loan
    }))
}

/// Approve the pending loan `loan_id` and credit it to its account.
///
/// # Errors
///
/// Returns a:
/// - [Error::NotFound] if there is no transaction `loan_id`,
/// - [Error::NotAPendingLoan] if it is not a loan or is already approved,
/// - [Error::SqlError] if the database could not be read or written.
pub fn approve_loan(loan_id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection.unchecked_transaction()?;
    let loan = get_transaction(loan_id, &transaction)?;

    if loan.transaction_type != TransactionType::Loan || loan.loan_approve {
        return Err(Error::NotAPendingLoan(loan_id));
    }

    let account = get_account(loan.account_id, &transaction)?;
    let new_balance = account
        .balance
        .checked_add(loan.amount)
        .ok_or(RuleViolation::InvalidAmount)?;
    set_balance(account.id, new_balance, &transaction)?;
    update_loan(loan.id, TransactionType::Loan, new_balance, true, &transaction)?;

    transaction.commit()?;

    Ok(Transaction {
        balance_after_transaction: new_balance,
        loan_approve: true,
        ..loan
    })
}
