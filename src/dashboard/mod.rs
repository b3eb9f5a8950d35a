//! The dashboard: balance and monthly totals widgets, and the income and expense chart.

mod aggregation;
mod handlers;

pub use handlers::{get_dashboard_chart, get_dashboard_summary};
