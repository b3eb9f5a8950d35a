//! Per-user settings, e.g. the display currency.

mod core;
mod endpoints;

pub use core::{
    CURRENCY_KEY, DEFAULT_CURRENCY, Setting, create_setting_table, delete_setting, get_setting,
    get_setting_value, list_settings, put_setting,
};
pub use endpoints::{
    delete_setting_endpoint, get_setting_endpoint, list_settings_endpoint, put_setting_endpoint,
};
