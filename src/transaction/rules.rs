//! The checks a transaction must pass before the ledger records it.
//!
//! Every check is a pure function of the amount and the account state, so the
//! ledger can run them while it holds the database lock.

use rust_decimal::Decimal;

use crate::money::MONEY_DECIMAL_PLACES;

/// The smallest deposit accepted.
pub const MIN_DEPOSIT: Decimal = Decimal::ONE_HUNDRED;
/// The smallest withdrawal accepted.
pub const MIN_WITHDRAWAL: Decimal = Decimal::from_parts(500, 0, 0, false, 0);
/// The largest withdrawal accepted.
pub const MAX_WITHDRAWAL: Decimal = Decimal::from_parts(20_000, 0, 0, false, 0);
/// How many approved loans an account may hold at once.
pub const MAX_APPROVED_LOANS: u32 = 3;

/// Why a transaction was refused. Nothing is written when one of these occurs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleViolation {
    /// The amount was missing or not a number.
    #[error("Enter a valid amount")]
    InvalidAmount,

    /// The amount had fractions of a cent.
    #[error("Enter an amount with at most 2 decimal places")]
    TooManyDecimalPlaces,

    /// The deposit was below [MIN_DEPOSIT].
    #[error("You need to deposit at least 100 $")]
    DepositTooSmall,

    /// The withdrawal was below [MIN_WITHDRAWAL].
    #[error("You can withdraw at least 500 $")]
    WithdrawalTooSmall,

    /// The withdrawal was above [MAX_WITHDRAWAL].
    #[error("You can withdraw at most 20000 $")]
    WithdrawalTooLarge,

    /// The withdrawal was more than the account holds.
    #[error(
        "You have {balance:.2} $ in your account. \
        You can not withdraw more than your account balance"
    )]
    InsufficientFunds {
        /// The balance at the time of the request.
        balance: Decimal,
    },

    /// The account already has [MAX_APPROVED_LOANS] approved loans.
    #[error("You have crossed the loan limit")]
    LoanLimitReached,

    /// Paying off the loan would use up the whole balance or more.
    #[error("Loan amount is greater than available balance")]
    LoanExceedsBalance,
}

/// Accept amounts in whole cents.
///
/// Trailing zeros do not count, so "100.500" is accepted as 100.50.
pub fn check_amount(amount: Decimal) -> Result<Decimal, RuleViolation> {
    if amount.normalize().scale() > MONEY_DECIMAL_PLACES {
        return Err(RuleViolation::TooManyDecimalPlaces);
    }

    Ok(amount.round_dp(MONEY_DECIMAL_PLACES))
}

pub fn check_deposit(amount: Decimal) -> Result<(), RuleViolation> {
    if amount < MIN_DEPOSIT {
        return Err(RuleViolation::DepositTooSmall);
    }

    Ok(())
}

/// The first failing check wins: minimum, then maximum, then balance.
pub fn check_withdrawal(amount: Decimal, balance: Decimal) -> Result<(), RuleViolation> {
    if amount < MIN_WITHDRAWAL {
        Err(RuleViolation::WithdrawalTooSmall)
    } else if amount > MAX_WITHDRAWAL {
        Err(RuleViolation::WithdrawalTooLarge)
    } else if amount > balance {
        Err(RuleViolation::InsufficientFunds { balance })
    } else {
        Ok(())
    }
}

pub fn check_loan_request(approved_loans: u32) -> Result<(), RuleViolation> {
    if approved_loans >= MAX_APPROVED_LOANS {
        return Err(RuleViolation::LoanLimitReached);
    }

    Ok(())
}

/// The loan must be strictly smaller than the balance.
pub fn check_loan_payoff(loan_amount: Decimal, balance: Decimal) -> Result<(), RuleViolation> {
    if loan_amount < balance {
        Ok(())
    } else {
        Err(RuleViolation::LoanExceedsBalance)
    }
}
