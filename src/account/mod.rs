//! The bank account each user owns and its running balance.

mod core;

pub use core::{
    Account, AccountId, create_account, create_account_table, get_account, get_account_by_user_id,
    set_balance,
};
