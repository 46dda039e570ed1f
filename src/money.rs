//! Money is kept as exact decimals with whole cents.
//!
//! SQLite has no decimal type, so balances and amounts are stored as TEXT and
//! parsed back into a [Decimal] when read.

use rusqlite::{Row, types::Type};
use rust_decimal::Decimal;

/// How many digits an amount may have after the decimal point.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// The text stored in the database for `amount`.
pub fn money_to_sql(amount: Decimal) -> String {
    amount.to_string()
}

/// Read the amount stored in column `index` of `row`.
///
/// # Errors
/// Returns [rusqlite::Error::FromSqlConversionFailure] if the column does not
/// hold a decimal number.
pub fn get_money(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let text: String = row.get(index)?;

    text.parse::<Decimal>().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
    })
}
