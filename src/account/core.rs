use rusqlite::{Connection, Row};
use rust_decimal::Decimal;

use crate::{
    Error,
    auth::UserID,
    money::{get_money, money_to_sql},
};

/// The database id of an [Account].
pub type AccountId = i64;

/// A user's bank account.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The user who owns the account. Each user has exactly one account.
    pub user_id: UserID,
    /// The money currently held in the account.
    pub balance: Decimal,
}

/// Create the account table.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL UNIQUE,
            balance TEXT NOT NULL DEFAULT '0.00',
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        balance: get_money(row, 2)?,
    })
}

/// Open an account with a zero balance for `user_id`.
///
/// # Errors
/// Returns [Error::SqlError] if the user does not exist or already has an account.
pub fn create_account(user_id: UserID, connection: &Connection) -> Result<Account, Error> {
    connection.execute(
        "INSERT INTO account (user_id, balance) VALUES (?1, ?2)",
        (user_id.as_i64(), money_to_sql(Decimal::ZERO)),
    )?;

    Ok(Account {
        id: connection.last_insert_rowid(),
        user_id,
        balance: Decimal::ZERO,
    })
}

/// Get the account owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the user has no account.
pub fn get_account_by_user_id(user_id: UserID, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare("SELECT id, user_id, balance FROM account WHERE user_id = :user_id")?
        .query_row(&[(":user_id", &user_id.as_i64())], map_row_to_account)
        .map_err(Error::from)
}

/// Get the account with the id `account_id`.
///
/// # Errors
/// Returns [Error::NotFound] if no account has the id `account_id`.
pub fn get_account(account_id: AccountId, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare("SELECT id, user_id, balance FROM account WHERE id = :id")?
        .query_row(&[(":id", &account_id)], map_row_to_account)
        .map_err(Error::from)
}

/// Overwrite the balance of `account_id`.
///
/// # Errors
/// Returns [Error::NotFound] if no account has the id `account_id`.
pub fn set_balance(
    account_id: AccountId,
    balance: Decimal,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE account SET balance = ?1 WHERE id = ?2",
        (money_to_sql(balance), account_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}
