//! Route handlers for the dashboard widgets and chart.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    account::get_total_account_balance,
    calendar_date::{first_of_month, first_of_month_before, first_of_next_month},
    dashboard::aggregation::{MonthlyTotals, monthly_income_expense},
    db::lock_connection,
    extract::QueryParams,
    response::{DataResponse, data},
    setting::{CURRENCY_KEY, DEFAULT_CURRENCY, get_setting_value},
    timezone::get_local_today,
    transaction::{DateRange, TransactionKind, get_amounts_by_date, sum_transactions},
    user::UserId,
};

/// The number of months shown on the chart when none is requested.
const DEFAULT_CHART_MONTHS: u32 = 6;
/// The most months the chart can span.
const MAX_CHART_MONTHS: u32 = 24;

/// The state needed for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading accounts and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl DashboardState {
    fn today(&self) -> Result<Date, Error> {
        get_local_today(&self.local_timezone)
            .ok_or_else(|| Error::InvalidTimezone(self.local_timezone.clone()))
    }
}

/// The figures shown in the dashboard widgets.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// The sum of the balances of all the user's accounts.
    pub total_balance: f64,
    /// The total income dated this month.
    pub income: f64,
    /// The total expense dated this month.
    pub expense: f64,
    /// The code of the currency amounts are displayed in.
    pub currency: String,
}

/// A route handler for the dashboard widgets of the acting user.
pub async fn get_dashboard_summary(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<DataResponse<DashboardSummary>>, Error> {
    let today = state.today()?;
    let this_month = DateRange {
        start: first_of_month(today),
        end: first_of_next_month(today).previous_day().unwrap_or(today),
    };

    let connection = lock_connection(&state.db_connection)?;

    let summary = DashboardSummary {
        total_balance: get_total_account_balance(&user_id, &connection)?,
        income: sum_transactions(TransactionKind::Income, &user_id, this_month, &connection)?,
        expense: sum_transactions(TransactionKind::Expense, &user_id, this_month, &connection)?,
        currency: get_setting_value(&user_id, CURRENCY_KEY, &connection)?
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned()),
    };

    Ok(data(summary))
}

/// The query parameters for the dashboard chart.
#[derive(Debug, Deserialize)]
pub struct ChartParams {
    /// How many months to show, ending with the current month.
    months: Option<u32>,
}

/// A route handler for the acting user's monthly income and expense totals.
pub async fn get_dashboard_chart(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserId>,
    QueryParams(params): QueryParams<ChartParams>,
) -> Result<Json<DataResponse<Vec<MonthlyTotals>>>, Error> {
    let months = params.months.unwrap_or(DEFAULT_CHART_MONTHS);

    if !(1..=MAX_CHART_MONTHS).contains(&months) {
        return Err(Error::InvalidMonthCount(MAX_CHART_MONTHS));
    }

    let today = state.today()?;
    let window = DateRange {
        start: first_of_month_before(today, months - 1),
        end: first_of_next_month(today).previous_day().unwrap_or(today),
    };

    let connection = lock_connection(&state.db_connection)?;
    let incomes = get_amounts_by_date(TransactionKind::Income, &user_id, window, &connection)?;
    let expenses = get_amounts_by_date(TransactionKind::Expense, &user_id, window, &connection)?;

    Ok(data(monthly_income_expense(
        window.start,
        months,
        &incomes,
        &expenses,
    )))
}
