//! Accounts that hold a user's money, e.g. a bank account or cash.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::{
    Account, AccountType, create_account_table, get_account, get_total_account_balance,
};
pub use create_endpoint::{NewAccount, create_account, create_account_endpoint};
pub use delete_endpoint::{delete_account, delete_account_endpoint};
pub use edit_endpoint::edit_account_endpoint;
pub use list_endpoint::{get_account_endpoint, list_accounts_endpoint};
