//! Reduces incomes and expenses into the monthly totals shown on the dashboard chart.

use serde::Serialize;
use time::Date;

/// The income and expense totals of one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotals {
    /// The full English name of the month, e.g. "January".
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

/// Total `incomes` and `expenses` per month over `months` months starting with the month of
/// `first_month`.
///
/// There is one entry per month in chronological order, including months with no transactions.
/// Amounts dated outside of the window are ignored.
pub fn monthly_income_expense(
    first_month: Date,
    months: u32,
    incomes: &[(Date, f64)],
    expenses: &[(Date, f64)],
) -> Vec<MonthlyTotals> {
    let mut totals: Vec<MonthlyTotals> = (0..months)
        .map(|offset| MonthlyTotals {
            month: first_month.month().nth_next((offset % 12) as u8).to_string(),
            income: 0.0,
            expense: 0.0,
        })
        .collect();

    for (date, amount) in incomes {
        if let Some(entry) = window_slot(first_month, *date, &mut totals) {
            entry.income += amount;
        }
    }

    for (date, amount) in expenses {
        if let Some(entry) = window_slot(first_month, *date, &mut totals) {
            entry.expense += amount;
        }
    }

    totals
}

fn month_index(date: Date) -> i32 {
    date.year() * 12 + i32::from(u8::from(date.month()))
}

fn window_slot<'a>(
    first_month: Date,
    date: Date,
    totals: &'a mut [MonthlyTotals],
) -> Option<&'a mut MonthlyTotals> {
    let offset = month_index(date) - month_index(first_month);

    usize::try_from(offset)
        .ok()
        .and_then(|offset| totals.get_mut(offset))
}
