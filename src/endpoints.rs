//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/accounts/{account_id}', use [format_endpoint].

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route that seeds the default roles and users.
pub const DEFAULT_DATA: &str = "/api/default";
/// The route to list and create accounts.
pub const ACCOUNTS: &str = "/api/accounts";
/// The route to access a single account.
pub const ACCOUNT: &str = "/api/accounts/{account_id}";
/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to access a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route to list and create incomes.
pub const INCOMES: &str = "/api/incomes";
/// The route to access a single income.
pub const INCOME: &str = "/api/incomes/{income_id}";
/// The route to list and create expenses.
pub const EXPENSES: &str = "/api/expenses";
/// The route to access a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route for the latest incomes and expenses.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for the dashboard's balance and monthly totals.
pub const DASHBOARD_SUMMARY: &str = "/api/dashboard/summary";
/// The route for the dashboard's income and expense chart.
pub const DASHBOARD_CHART: &str = "/api/dashboard/chart";
/// The route to list and create users.
pub const USERS: &str = "/api/users";
/// The route to access a single user.
pub const USER: &str = "/api/users/{user_id}";
/// The route to list and create roles.
pub const ROLES: &str = "/api/roles";
/// The route to access a single role.
pub const ROLE: &str = "/api/roles/{role_id}";
/// The route to list the acting user's settings.
pub const SETTINGS: &str = "/api/settings";
/// The route to access a single setting by its key.
pub const SETTING: &str = "/api/settings/{key}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let param_start = match endpoint_path.find('{') {
        Some(start) => start,
        None => return endpoint_path.to_owned(),
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
