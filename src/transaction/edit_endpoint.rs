//! Defines the endpoints for changing an income or expense.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    Error,
    db::lock_connection,
    extract::JsonBody,
    response::{DataResponse, data},
    transaction::{
        Transaction, TransactionKind, TransactionUpdate, TransactionsState, update_transaction,
    },
    user::UserId,
};

fn edit_transaction_endpoint(
    kind: TransactionKind,
    state: &TransactionsState,
    user_id: &UserId,
    id: &str,
    update: TransactionUpdate,
) -> Result<Json<DataResponse<Transaction>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    update_transaction(kind, id, update, user_id, &connection).map(data)
}

pub async fn edit_income_endpoint(
    State(state): State<TransactionsState>,
    Extension(user_id): Extension<UserId>,
    Path(income_id): Path<String>,
    JsonBody(update): JsonBody<TransactionUpdate>,
) -> Result<Json<DataResponse<Transaction>>, Error> {
    edit_transaction_endpoint(TransactionKind::Income, &state, &user_id, &income_id, update)
}

pub async fn edit_expense_endpoint(
    State(state): State<TransactionsState>,
    Extension(user_id): Extension<UserId>,
    Path(expense_id): Path<String>,
    JsonBody(update): JsonBody<TransactionUpdate>,
) -> Result<Json<DataResponse<Transaction>>, Error> {
    edit_transaction_endpoint(TransactionKind::Expense, &state, &user_id, &expense_id, update)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{USER_HEADER, must_create_test_app},
        transaction::{NewTransaction, TransactionKind, create_transaction},
    };

    #[tokio::test]
    async fn updates_only_given_fields() {
        let app = must_create_test_app();
        let expense_id = {
            let connection = app.state.db_connection.lock().unwrap();
            create_transaction(
                TransactionKind::Expense,
                NewTransaction {
                    title: "Lunch".to_owned(),
                    amount: 15.0,
                    description: "Noodles".to_owned(),
                    category_id: None,
                    account_id: None,
                    date: date!(2025 - 03 - 04),
                    recurring: false,
                },
                &app.user_id,
                &connection,
            )
            .unwrap()
            .id
        };

        let response = app
            .server
            .patch(&format_endpoint(endpoints::EXPENSE, &expense_id))
            .add_header(USER_HEADER, app.user_id.as_str())
            .json(&json!({ "amount": 20, "date": "2025-03-05", "title": null }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["title"], "Lunch");
        assert_eq!(body["data"]["amount"], 20.0);
        assert_eq!(body["data"]["description"], "Noodles");
        assert_eq!(body["data"]["date"], "2025-03-05");

        // The expense is not reachable as an income.
        app.server
            .patch(&format_endpoint(endpoints::INCOME, &expense_id))
            .add_header(USER_HEADER, app.user_id.as_str())
            .json(&json!({ "amount": 20 }))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn rejects_unknown_account() {
        let app = must_create_test_app();
        let income_id = {
            let connection = app.state.db_connection.lock().unwrap();
            create_transaction(
                TransactionKind::Income,
                NewTransaction {
                    title: "Pay".to_owned(),
                    amount: 1000.0,
                    description: String::new(),
                    category_id: None,
                    account_id: None,
                    date: date!(2025 - 03 - 04),
                    recurring: true,
                },
                &app.user_id,
                &connection,
            )
            .unwrap()
            .id
        };

        app.server
            .patch(&format_endpoint(endpoints::INCOME, &income_id))
            .add_header(USER_HEADER, app.user_id.as_str())
            .json(&json!({ "accountId": "no-such-account" }))
            .await
            .assert_status_bad_request();
    }
}
