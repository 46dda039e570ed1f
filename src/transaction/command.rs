//! Turns untrusted form input into a command the ledger can execute.
//!
//! The form only carries an amount. The transaction kind comes from the route
//! and the account from the session, so a client cannot choose either.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    account::AccountId,
    transaction::{
        TransactionType,
        rules::{RuleViolation, check_amount},
    },
};

/// The fields submitted by the deposit, withdraw and loan request forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountForm {
    /// The amount as typed by the user.
    #[serde(default)]
    pub amount: String,
}

/// The money movements a user can start from the web interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    LoanRequest,
}

impl TransactionKind {
    /// The type of the record this kind of request creates.
    pub fn transaction_type(self) -> TransactionType {
        match self {
            TransactionKind::Deposit => TransactionType::Deposit,
            TransactionKind::Withdrawal => TransactionType::Withdrawal,
            TransactionKind::LoanRequest => TransactionType::Loan,
        }
    }

    /// The heading of the form page.
    pub fn title(self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdrawal => "Withdraw",
            TransactionKind::LoanRequest => "Request Loan",
        }
    }

    /// The confirmation logged once the ledger has recorded the request.
    pub fn success_message(self, amount: Decimal) -> String {
        match self {
            TransactionKind::Deposit => {
                format!("{amount:.2}$ was deposited to your account successfully")
            }
            TransactionKind::Withdrawal => {
                format!("Successfully withdrawn {amount:.2}$ from your account")
            }
            TransactionKind::LoanRequest => {
                format!("Loan request for {amount:.2}$ submitted successfully")
            }
        }
    }
}

/// A validated request to move money in or out of one account.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionCommand {
    pub kind: TransactionKind,
    pub account_id: AccountId,
    pub amount: Decimal,
}

impl TransactionCommand {
    /// Bind `form` to `account_id` as a request of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [RuleViolation::InvalidAmount] if the amount is not a decimal number,
    /// or [RuleViolation::TooManyDecimalPlaces] if it has fractions of a cent.
    pub fn new(
        kind: TransactionKind,
        account_id: AccountId,
        form: &AmountForm,
    ) -> Result<Self, RuleViolation> {
        let amount = form
            .amount
            .trim()
            .parse::<Decimal>()
            .map_err(|_| RuleViolation::InvalidAmount)
            .and_then(check_amount)?;

        Ok(Self {
            kind,
            account_id,
            amount,
        })
    }
}
