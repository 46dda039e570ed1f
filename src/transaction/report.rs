//! Builds the transaction report for one account.

use std::collections::HashSet;

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, UtcOffset, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    account::Account,
    transaction::{Transaction, core::get_account_transactions},
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The query string of the report page and the CSV statement.
///
/// Browsers submit empty date inputs as empty strings, so both fields are
/// plain strings and are parsed by [ReportQuery::date_range].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportQuery {
    /// The first day of the range, e.g. "2025-03-01".
    pub start_date: Option<String>,
    /// The last day of the range, inclusive.
    pub end_date: Option<String>,
}

/// An inclusive range of local calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    /// Whether `date` falls on or between the start and end dates.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

impl ReportQuery {
    /// The date range to filter by.
    ///
    /// Returns `Ok(None)` unless both dates are given.
    ///
    /// # Errors
    ///
    /// Returns a message for the user if a given date is not of the form YYYY-MM-DD.
    pub fn date_range(&self) -> Result<Option<DateRange>, String> {
        let start = parse_date(self.start_date.as_deref())?;
        let end = parse_date(self.end_date.as_deref())?;

        match (start, end) {
            (Some(start), Some(end)) => Ok(Some(DateRange { start, end })),
            _ => Ok(None),
        }
    }

    /// The query as a URL query string, without the leading '?'.
    pub fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(self).unwrap_or_default()
    }
}

fn parse_date(text: Option<&str>) -> Result<Option<Date>, String> {
    match text.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => Date::parse(text, DATE_FORMAT)
            .map(Some)
            .map_err(|_| format!("\"{text}\" is not a valid date, use the format YYYY-MM-DD")),
    }
}

/// The transactions shown in a report and the figure shown next to them.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// The matching transactions, oldest first.
    pub transactions: Vec<Transaction>,
    /// The sum of the transaction amounts if a range was applied, otherwise
    /// the account's live balance.
    pub balance: Decimal,
    /// The range the transactions were filtered by, if any.
    pub range: Option<DateRange>,
}

/// Build the report for `account`.
///
/// Transaction timestamps are converted to `local_offset` before comparing
/// their dates against `range`.
///
/// # Errors
///
/// Returns an [Error::SqlError] if the transactions could not be read.
pub fn build_report(
    account: &Account,
    range: Option<DateRange>,
    local_offset: UtcOffset,
    connection: &Connection,
) -> Result<Report, Error> {
    let mut seen = HashSet::new();
    let transactions: Vec<Transaction> = get_account_transactions(account.id, connection)?
        .into_iter()
        .filter(|transaction| seen.insert(transaction.id))
        .filter(|transaction| match range {
            Some(range) => range.contains(transaction.timestamp.to_offset(local_offset).date()),
            None => true,
        })
        .collect();

    let balance = match range {
        Some(_) => transactions
            .iter()
            .fold(Decimal::ZERO, |total, transaction| {
                total.saturating_add(transaction.amount)
            }),
        None => account.balance,
    };

    Ok(Report {
        transactions,
        balance,
        range,
    })
}


#[cfg(test)]
mod build_report_tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{
        UtcOffset,
        macros::{date, datetime},
    };

    use crate::transaction::{
        TransactionType,
        report::{DateRange, build_report},
        test_utils::{
            create_test_account, get_test_connection_with_account, insert_test_transaction,
            set_test_balance,
        },
    };

    #[test]
    fn no_range_returns_everything_and_live_balance() {
        let (conn, mut account) = get_test_connection_with_account();
        let first = insert_test_transaction(
            &account,
            TransactionType::Deposit,
            dec!(1000),
            datetime!(2025-03-01 10:00 UTC),
            &conn,
        );
        let second = insert_test_transaction(
            &account,
            TransactionType::Withdrawal,
            dec!(500),
            datetime!(2025-03-05 10:00 UTC),
            &conn,
        );
        set_test_balance(&account, dec!(500), &conn);
        account.balance = dec!(500);

        let report = build_report(&account, None, UtcOffset::UTC, &conn).unwrap();

        assert_eq!(report.transactions, vec![first, second]);
        assert_eq!(report.balance, dec!(500));
        assert_eq!(report.range, None);
    }

    #[test]
    fn range_filters_inclusively_and_sums_amounts() {
        let (conn, account) = get_test_connection_with_account();
        insert_test_transaction(
            &account,
            TransactionType::Deposit,
            dec!(100),
            datetime!(2025-02-28 23:59 UTC),
            &conn,
        );
        let start = insert_test_transaction(
            &account,
            TransactionType::Deposit,
            dec!(200),
            datetime!(2025-03-01 00:00 UTC),
            &conn,
        );
        let end = insert_test_transaction(
            &account,
            TransactionType::Withdrawal,
            dec!(500),
            datetime!(2025-03-02 23:59 UTC),
            &conn,
        );
        insert_test_transaction(
            &account,
            TransactionType::Deposit,
            dec!(400),
            datetime!(2025-03-03 00:00 UTC),
            &conn,
        );
        let range = DateRange {
            start: date!(2025 - 03 - 01),
            end: date!(2025 - 03 - 02),
        };

        let report = build_report(&account, Some(range), UtcOffset::UTC, &conn).unwrap();

        assert_eq!(report.transactions, vec![start, end]);
        assert_eq!(report.balance, dec!(700));
    }

    #[test]
    fn range_sum_is_exact_in_cents() {
        let (conn, account) = get_test_connection_with_account();
        for amount in [dec!(0.10), dec!(0.20)] {
            insert_test_transaction(
                &account,
                TransactionType::Deposit,
                amount,
                datetime!(2025-03-01 12:00 UTC),
                &conn,
            );
        }
        let range = DateRange {
            start: date!(2025 - 03 - 01),
            end: date!(2025 - 03 - 01),
        };

        let report = build_report(&account, Some(range), UtcOffset::UTC, &conn).unwrap();

        assert_eq!(report.balance, dec!(0.30));
    }

    #[test]
    fn empty_range_sums_to_zero() {
        let (conn, account) = get_test_connection_with_account();
        set_test_balance(&account, dec!(900), &conn);
        insert_test_transaction(
            &account,
            TransactionType::Deposit,
            dec!(900),
            datetime!(2025-03-01 12:00 UTC),
            &conn,
        );
        let range = DateRange {
            start: date!(2024 - 01 - 01),
            end: date!(2024 - 12 - 31),
        };

        let report = build_report(&account, Some(range), UtcOffset::UTC, &conn).unwrap();

        assert!(report.transactions.is_empty());
        assert_eq!(report.balance, Decimal::ZERO);
    }

    #[test]
    fn dates_are_compared_in_local_time() {
        let (conn, account) = get_test_connection_with_account();
        // 2025-03-01 22:00 UTC is already 2025-03-02 in UTC+13.
        let transaction = insert_test_transaction(
            &account,
            TransactionType::Deposit,
            dec!(100),
            datetime!(2025-03-01 22:00 UTC),
            &conn,
        );
        let range = DateRange {
            start: date!(2025 - 03 - 02),
            end: date!(2025 - 03 - 02),
        };
        let offset = UtcOffset::from_hms(13, 0, 0).unwrap();

        let local = build_report(&account, Some(range), offset, &conn).unwrap();
        let utc = build_report(&account, Some(range), UtcOffset::UTC, &conn).unwrap();

        assert_eq!(local.transactions, vec![transaction]);
        assert!(utc.transactions.is_empty());
    }

    #[test]
    fn other_accounts_are_excluded() {
        let (conn, account) = get_test_connection_with_account();
        let other_account = create_test_account("bob", &conn);
        insert_test_transaction(
            &other_account,
            TransactionType::Deposit,
            dec!(100),
            datetime!(2025-03-01 12:00 UTC),
            &conn,
        );

        let report = build_report(&account, None, UtcOffset::UTC, &conn).unwrap();

        assert!(report.transactions.is_empty());
    }
}
