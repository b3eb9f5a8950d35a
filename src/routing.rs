//! Application router configuration with user-scoped and unscoped route definitions.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    AppState, Error,
    account::{
        create_account_endpoint, delete_account_endpoint, edit_account_endpoint,
        get_account_endpoint, list_accounts_endpoint,
    },
    acting_user::user_guard,
    category::{
        create_categories_endpoint, delete_category_endpoint, get_category_endpoint,
        list_categories_endpoint, update_category_endpoint,
    },
    dashboard::{get_dashboard_chart, get_dashboard_summary},
    default_data::default_data_endpoint,
    endpoints,
    role::{
        create_role_endpoint, delete_role_endpoint, edit_role_endpoint, get_role_endpoint,
        list_roles_endpoint,
    },
    setting::{
        delete_setting_endpoint, get_setting_endpoint, list_settings_endpoint,
        put_setting_endpoint,
    },
    transaction::{
        create_expense_endpoint, create_income_endpoint, delete_expense_endpoint,
        delete_income_endpoint, edit_expense_endpoint, edit_income_endpoint, get_expense_endpoint,
        get_income_endpoint, list_expenses_endpoint, list_incomes_endpoint,
        recent_transactions_endpoint,
    },
    user::{
        create_user_endpoint, delete_user_endpoint, edit_user_endpoint, get_user_endpoint,
        list_users_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unscoped_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::DEFAULT_DATA, get(default_data_endpoint))
        .route(
            endpoints::USERS,
            get(list_users_endpoint).post(create_user_endpoint),
        )
        .route(
            endpoints::USER,
            get(get_user_endpoint)
                .patch(edit_user_endpoint)
                .delete(delete_user_endpoint),
        )
        .route(
            endpoints::ROLES,
            get(list_roles_endpoint).post(create_role_endpoint),
        )
        .route(
            endpoints::ROLE,
            get(get_role_endpoint)
                .patch(edit_role_endpoint)
                .delete(delete_role_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_categories_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .patch(update_category_endpoint)
                .delete(delete_category_endpoint),
        );

    let user_scoped_routes = Router::new()
        .route(
            endpoints::ACCOUNTS,
            get(list_accounts_endpoint).post(create_account_endpoint),
        )
        .route(
            endpoints::ACCOUNT,
            get(get_account_endpoint)
                .patch(edit_account_endpoint)
                .delete(delete_account_endpoint),
        )
        .route(
            endpoints::INCOMES,
            get(list_incomes_endpoint).post(create_income_endpoint),
        )
        .route(
            endpoints::INCOME,
            get(get_income_endpoint)
                .patch(edit_income_endpoint)
                .delete(delete_income_endpoint),
        )
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            get(get_expense_endpoint)
                .patch(edit_expense_endpoint)
                .delete(delete_expense_endpoint),
        )
        .route(endpoints::TRANSACTIONS, get(recent_transactions_endpoint))
        .route(endpoints::DASHBOARD_SUMMARY, get(get_dashboard_summary))
        .route(endpoints::DASHBOARD_CHART, get(get_dashboard_chart))
        .route(endpoints::SETTINGS, get(list_settings_endpoint))
        .route(
            endpoints::SETTING,
            get(get_setting_endpoint)
                .put(put_setting_endpoint)
                .delete(delete_setting_endpoint),
        )
        .layer(middleware::from_fn_with_state(state.clone(), user_guard));

    user_scoped_routes
        .merge(unscoped_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, "I'm a teapot").into_response()
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        test_utils::{USER_HEADER, must_create_test_app},
    };

    #[tokio::test]
    async fn coffee_is_a_teapot() {
        let app = must_create_test_app();

        app.server
            .get(endpoints::COFFEE)
            .await
            .assert_status(StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let app = must_create_test_app();

        let response = app.server.get("/api/nothing-here").await;

        response.assert_status_not_found();
        let body: Value = response.json();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn user_scoped_routes_need_acting_user() {
        let app = must_create_test_app();

        for path in [
            endpoints::ACCOUNTS,
            endpoints::INCOMES,
            endpoints::EXPENSES,
            endpoints::TRANSACTIONS,
            endpoints::DASHBOARD_SUMMARY,
            endpoints::DASHBOARD_CHART,
            endpoints::SETTINGS,
        ] {
            app.server.get(path).await.assert_status_unauthorized();
            app.server
                .get(path)
                .add_header(USER_HEADER, app.user_id.as_str())
                .await
                .assert_status_ok();
        }
    }

    #[tokio::test]
    async fn unscoped_routes_are_open() {
        let app = must_create_test_app();

        for path in [endpoints::USERS, endpoints::ROLES, endpoints::CATEGORIES] {
            app.server.get(path).await.assert_status_ok();
        }
    }

    #[tokio::test]
    async fn huge_page_returns_empty_page() {
        let app = must_create_test_app();
        let max = u64::MAX.to_string();

        let response = app
            .server
            .get(endpoints::CATEGORIES)
            .add_query_param("page", &max)
            .add_query_param("limit", &max)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"], json!([]));

        app.server
            .get(endpoints::CATEGORIES)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn record_flow_across_modules() {
        let app = must_create_test_app();

        app.server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "categories": [{ "name": "Salary", "type": "income" }] }))
            .await
            .assert_status(StatusCode::CREATED);
        let categories: Value = app.server.get(endpoints::CATEGORIES).await.json();
        let category_id = categories["data"][0]["id"].as_str().unwrap().to_owned();

        app.server
            .post(endpoints::ACCOUNTS)
            .add_header(USER_HEADER, app.user_id.as_str())
            .json(&json!({ "name": "Bank", "type": "BANK", "balance": 100 }))
            .await
            .assert_status(StatusCode::CREATED);
        let accounts: Value = app
            .server
            .get(endpoints::ACCOUNTS)
            .add_header(USER_HEADER, app.user_id.as_str())
            .await
            .json();
        let account_id = accounts["data"][0]["id"].as_str().unwrap().to_owned();

        app.server
            .post(endpoints::INCOMES)
            .add_header(USER_HEADER, app.user_id.as_str())
            .json(&json!({
                "title": "Pay",
                "amount": 1000,
                "date": "2025-03-01",
                "categoryId": category_id,
                "accountId": account_id
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let incomes: Value = app
            .server
            .get(endpoints::INCOMES)
            .add_header(USER_HEADER, app.user_id.as_str())
            .await
            .json();
        assert_eq!(incomes["data"][0]["category"]["name"], "Salary");
        assert_eq!(incomes["data"][0]["accountId"], account_id.as_str());

        // The account balance is not touched by incomes.
        let accounts: Value = app
            .server
            .get(endpoints::ACCOUNTS)
            .add_header(USER_HEADER, app.user_id.as_str())
            .await
            .json();
        assert_eq!(accounts["data"][0]["balance"], 100.0);
    }
}
