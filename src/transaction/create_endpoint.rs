//! Defines the endpoints for recording a new income or expense.

use axum::{
    Extension,
    extract::State,
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    db::lock_connection,
    endpoints::{self, format_endpoint},
    extract::JsonBody,
    response::added,
    transaction::{NewTransaction, TransactionKind, TransactionsState, create_transaction},
    user::UserId,
};

fn create_transaction_endpoint(
    kind: TransactionKind,
    state: &TransactionsState,
    user_id: &UserId,
    new_transaction: NewTransaction,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let transaction = create_transaction(kind, new_transaction, user_id, &connection)?;

    let endpoint = match kind {
        TransactionKind::Income => endpoints::INCOME,
        TransactionKind::Expense => endpoints::EXPENSE,
    };

    Ok((
        StatusCode::CREATED,
        [(LOCATION, format_endpoint(endpoint, &transaction.id))],
        added(),
    )
        .into_response())
}

/// A route handler for recording an income for the acting user.
pub async fn create_income_endpoint(
    State(state): State<TransactionsState>,
    Extension(user_id): Extension<UserId>,
    JsonBody(new_income): JsonBody<NewTransaction>,
) -> Result<Response, Error> {
    create_transaction_endpoint(TransactionKind::Income, &state, &user_id, new_income)
}

/// A route handler for recording an expense for the acting user.
pub async fn create_expense_endpoint(
    State(state): State<TransactionsState>,
    Extension(user_id): Extension<UserId>,
    JsonBody(new_expense): JsonBody<NewTransaction>,
) -> Result<Response, Error> {
    create_transaction_endpoint(TransactionKind::Expense, &state, &user_id, new_expense)
}

#[cfg(test)]
mod tests {
    use axum::http::{StatusCode, header::LOCATION};
    use serde_json::{Value, json};

    use crate::{
        category::{CategoryName, CategoryType, NewCategory, create_categories},
        endpoints,
        test_utils::{USER_HEADER, must_create_test_app},
    };

    #[tokio::test]
    async fn creates_expense() {
        let app = must_create_test_app();

        let response = app
            .server
            .post(endpoints::EXPENSES)
            .add_header(USER_HEADER, app.user_id.as_str())
            .json(&json!({
                "title": "Lunch",
                "amount": 15.5,
                "date": "2025-03-04T10:00:00.000Z"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        response.assert_json(&json!({ "data": "Successfully added data" }));
        let location = response.header(LOCATION);
        let location = location.to_str().unwrap();
        assert!(location.starts_with("/api/expenses/"));

        let body: Value = app
            .server
            .get(location)
            .add_header(USER_HEADER, app.user_id.as_str())
            .await
            .json();
        assert_eq!(body["data"]["title"], "Lunch");
        assert_eq!(body["data"]["amount"], 15.5);
        assert_eq!(body["data"]["date"], "2025-03-04");
        assert_eq!(body["data"]["description"], "");
        assert_eq!(body["data"]["recurring"], false);
    }

    #[tokio::test]
    async fn rejects_category_of_other_kind() {
        let app = must_create_test_app();
        let salary_id = {
            let connection = app.state.db_connection.lock().unwrap();
            create_categories(
                vec![NewCategory {
                    name: CategoryName::new_unchecked("Salary"),
                    category_type: CategoryType::Income,
                }],
                &connection,
            )
            .unwrap()
            .remove(0)
            .id
        };

        let response = app
            .server
            .post(endpoints::EXPENSES)
            .add_header(USER_HEADER, app.user_id.as_str())
            .json(&json!({
                "title": "Lunch",
                "amount": 15,
                "date": "2025-03-04",
                "categoryId": salary_id
            }))
            .await;

        response.assert_status_bad_request();

        let response = app
            .server
            .post(endpoints::INCOMES)
            .add_header(USER_HEADER, app.user_id.as_str())
            .json(&json!({
                "title": "March pay",
                "amount": 1000,
                "date": "2025-03-04",
                "categoryId": salary_id
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn rejects_missing_title() {
        let app = must_create_test_app();

        let response = app
            .server
            .post(endpoints::INCOMES)
            .add_header(USER_HEADER, app.user_id.as_str())
            .json(&json!({ "amount": 1000, "date": "2025-03-04" }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn requires_acting_user() {
        let app = must_create_test_app();

        let response = app
            .server
            .post(endpoints::INCOMES)
            .json(&json!({ "title": "Pay", "amount": 1000, "date": "2025-03-04" }))
            .await;

        response.assert_status_unauthorized();
    }
}
