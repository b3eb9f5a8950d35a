//! Defines the endpoints for deleting an income or expense.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    Error,
    db::lock_connection,
    response::{DataResponse, deleted},
    transaction::{TransactionKind, TransactionsState, delete_transaction},
    user::UserId,
};

fn delete_transaction_endpoint(
    kind: TransactionKind,
    state: &TransactionsState,
    user_id: &UserId,
    id: &str,
) -> Result<Json<DataResponse<&'static str>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_transaction(kind, id, user_id, &connection).map(|_| deleted())
}

pub async fn delete_income_endpoint(
    State(state): State<TransactionsState>,
    Extension(user_id): Extension<UserId>,
    Path(income_id): Path<String>,
) -> Result<Json<DataResponse<&'static str>>, Error> {
    delete_transaction_endpoint(TransactionKind::Income, &state, &user_id, &income_id)
}

pub async fn delete_expense_endpoint(
    State(state): State<TransactionsState>,
    Extension(user_id): Extension<UserId>,
    Path(expense_id): Path<String>,
) -> Result<Json<DataResponse<&'static str>>, Error> {
    delete_transaction_endpoint(TransactionKind::Expense, &state, &user_id, &expense_id)
}
