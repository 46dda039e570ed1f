use rusqlite::Connection;
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{
    PasswordHash,
    account::{Account, create_account, set_balance},
    auth::create_user,
    db::initialize,
    transaction::{
        Transaction, TransactionType,
        core::{NewTransaction, insert_transaction, update_loan},
    },
};

/// An in-memory database with one user who owns one empty account.
pub fn get_test_connection_with_account() -> (Connection, Account) {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize(&connection).expect("Could not initialize database");
    let account = create_test_account("alice", &connection);

    (connection, account)
}

/// Register `username` and open their account.
pub fn create_test_account(username: &str, connection: &Connection) -> Account {
    let user = create_user(username, PasswordHash::new_unchecked("hunter2"), connection)
        .expect("Could not create test user");

    create_account(user.id, connection).expect("Could not create test account")
}

/// Set the balance of `account` directly, bypassing the ledger rules.
pub fn set_test_balance(account: &Account, balance: Decimal, connection: &Connection) {
    set_balance(account.id, balance, connection).expect("Could not set test balance");
}

/// Record a transaction directly, bypassing the ledger rules.
pub fn insert_test_transaction(
    account: &Account,
    transaction_type: TransactionType,
    amount: Decimal,
    timestamp: OffsetDateTime,
    connection: &Connection,
) -> Transaction {
    insert_transaction(
        NewTransaction {
            account_id: account.id,
            amount,
            transaction_type,
            balance_after_transaction: Decimal::ZERO,
            timestamp,
        },
        connection,
    )
    .expect("Could not insert test transaction")
}

/// Record a loan for `account` that has already been approved.
pub fn insert_approved_loan(account: &Account, amount: Decimal, connection: &Connection) -> Transaction {
    let loan = insert_test_transaction(
        account,
        TransactionType::Loan,
        amount,
        OffsetDateTime::now_utc(),
        connection,
    );
    update_loan(loan.id, TransactionType::Loan, Decimal::ZERO, true, connection)
        .expect("Could not approve test loan");

    Transaction {
        loan_approve: true,
        ..loan
    }
}
