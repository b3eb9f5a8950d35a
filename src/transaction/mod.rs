//! Incomes and expenses, the money a user earns and spends.
//!
//! Both kinds share one table and one set of queries. The route handlers come in pairs, one for
//! each [TransactionKind].

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod query;

pub use core::{
    NewTransaction, Transaction, TransactionKind, TransactionUpdate, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, update_transaction,
};
pub use create_endpoint::{create_expense_endpoint, create_income_endpoint};
pub use delete_endpoint::{delete_expense_endpoint, delete_income_endpoint};
pub use edit_endpoint::{edit_expense_endpoint, edit_income_endpoint};
pub use list_endpoint::{
    TransactionsState, get_expense_endpoint, get_income_endpoint, list_expenses_endpoint,
    list_incomes_endpoint, recent_transactions_endpoint,
};
pub use query::{DateRange, get_amounts_by_date, sum_transactions};
