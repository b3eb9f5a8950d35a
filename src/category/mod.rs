//! Categories for classifying incomes and expenses.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::create_categories_endpoint;
pub use db::{
    CATEGORY_COLUMNS, create_categories, create_category_table, delete_category, get_category,
    map_row_to_category, update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryName, CategoryType, CategoryUpdate, NewCategory};
pub use edit::update_category_endpoint;
pub use list::{get_category_endpoint, list_categories_endpoint};
