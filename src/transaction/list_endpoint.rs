//! The endpoints for listing incomes and expenses, getting one, and recent activity.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    calendar_date::deserialize_optional_date,
    category::CategoryType,
    db::lock_connection,
    extract::QueryParams,
    list_filter::Sort,
    pagination::{PageRequest, PaginationConfig},
    response::{DataResponse, data, listing},
    transaction::{
        Transaction, TransactionKind, get_transaction,
        query::{
            DateRange, TRANSACTION_SORT_FIELDS, TransactionFilter, get_recent_transactions,
            list_transactions,
        },
    },
    user::UserId,
};

/// The state needed to list and get incomes and expenses.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The default page and page size.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters for listing incomes or expenses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListParams {
    sort: Option<String>,
    keyword: Option<String>,
    /// Category types, may be repeated.
    #[serde(default, rename = "type")]
    types: Vec<String>,
    /// A category ID.
    category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    start_date: Option<Date>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    end_date: Option<Date>,
    page: Option<u64>,
    limit: Option<u64>,
}

impl TransactionListParams {
    fn into_filter(self) -> Result<TransactionFilter, Error> {
        // A half-open range is ignored.
        let date_range = match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(DateRange { start, end }),
            _ => None,
        };

        Ok(TransactionFilter {
            keyword: self.keyword,
            category_types: CategoryType::parse_codes(&self.types)?,
            category_id: self.category.filter(|category| !category.trim().is_empty()),
            date_range,
            sort: Sort::parse_optional(self.sort.as_deref(), TRANSACTION_SORT_FIELDS)?,
        })
    }
}

async fn list_transactions_endpoint(
    kind: TransactionKind,
    state: TransactionsState,
    user_id: UserId,
    params: TransactionListParams,
) -> Result<Json<DataResponse<Vec<Transaction>>>, Error> {
    let page = PageRequest::optional(params.page, params.limit, &state.pagination_config)?;
    let filter = params.into_filter()?;

    let connection = lock_connection(&state.db_connection)?;

    list_transactions(kind, &user_id, &filter, page, &connection).map(listing)
}

/// List the acting user's incomes.
pub async fn list_incomes_endpoint(
    State(state): State<TransactionsState>,
    Extension(user_id): Extension<UserId>,
    QueryParams(params): QueryParams<TransactionListParams>,
) -> Result<Json<DataResponse<Vec<Transaction>>>, Error> {
    list_transactions_endpoint(TransactionKind::Income, state, user_id, params).await
}

/// List the acting user's expenses.
pub async fn list_expenses_endpoint(
    State(state): State<TransactionsState>,
    Extension(user_id): Extension<UserId>,
    QueryParams(params): QueryParams<TransactionListParams>,
) -> Result<Json<DataResponse<Vec<Transaction>>>, Error> {
    list_transactions_endpoint(TransactionKind::Expense, state, user_id, params).await
}

fn get_transaction_endpoint(
    kind: TransactionKind,
    state: &TransactionsState,
    user_id: &UserId,
    id: &str,
) -> Result<Json<DataResponse<Transaction>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_transaction(kind, id, user_id, &connection).map(data)
}

pub async fn get_income_endpoint(
    State(state): State<TransactionsState>,
    Extension(user_id): Extension<UserId>,
    Path(income_id): Path<String>,
) -> Result<Json<DataResponse<Transaction>>, Error> {
    get_transaction_endpoint(TransactionKind::Income, &state, &user_id, &income_id)
}

pub async fn get_expense_endpoint(
    State(state): State<TransactionsState>,
    Extension(user_id): Extension<UserId>,
    Path(expense_id): Path<String>,
) -> Result<Json<DataResponse<Transaction>>, Error> {
    get_transaction_endpoint(TransactionKind::Expense, &state, &user_id, &expense_id)
}

/// The acting user's latest incomes and expenses, ordered by date.
pub async fn recent_transactions_endpoint(
    State(state): State<TransactionsState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<DataResponse<Vec<Transaction>>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_recent_transactions(&user_id, &connection).map(data)
}
