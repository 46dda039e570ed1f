//! The account ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and its database functions
//! - The rules deposits, withdrawals and loans must follow
//! - The ledger operations that apply transactions to account balances
//! - View handlers for the report, statement, transaction forms and loans

mod command;
mod core;
mod create_endpoint;
mod create_page;
mod ledger;
mod loans_page;
mod pay_loan_endpoint;
mod report;
mod report_page;
mod rules;
mod statement;

#[cfg(test)]
mod test_utils;

pub use core::{
    Transaction, TransactionId, TransactionType, create_transaction_table, get_pending_loans,
};
pub use create_endpoint::{
    create_deposit_endpoint, create_loan_request_endpoint, create_withdrawal_endpoint,
};
pub use create_page::{get_deposit_page, get_loan_request_page, get_withdraw_page};
pub use ledger::approve_loan;
pub use loans_page::get_loans_page;
pub use pay_loan_endpoint::pay_loan_endpoint;
pub use report_page::get_report_page;
pub use rules::RuleViolation;
pub use statement::get_statement_csv;
