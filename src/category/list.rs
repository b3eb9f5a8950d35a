//! Category listing and lookup endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::{
        Category, CategoryType,
        db::{CATEGORY_SORT_FIELDS, CategoryFilter, get_category, list_categories},
    },
    db::lock_connection,
    extract::QueryParams,
    list_filter::Sort,
    pagination::{PageRequest, PaginationConfig},
    response::{DataResponse, data, listing},
};

/// The state needed for listing categories.
#[derive(Debug, Clone)]
pub struct CategoriesState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for CategoriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryListParams {
    sort: Option<String>,
    keyword: Option<String>,
    /// May be repeated, e.g. `?type=income&type=expense`.
    #[serde(default, rename = "type")]
    types: Vec<String>,
    page: Option<u64>,
    limit: Option<u64>,
}

/// List categories. Filtering by type always includes general categories.
pub async fn list_categories_endpoint(
    State(state): State<CategoriesState>,
    QueryParams(params): QueryParams<CategoryListParams>,
) -> Result<Json<DataResponse<Vec<Category>>>, Error> {
    let filter = CategoryFilter {
        keyword: params.keyword,
        types: CategoryType::parse_filter(&params.types)?,
        sort: Sort::parse_optional(params.sort.as_deref(), CATEGORY_SORT_FIELDS)?,
    };
    let page = PageRequest::optional(params.page, params.limit, &state.pagination_config)?;

    let connection = lock_connection(&state.db_connection)?;

    list_categories(&filter, page, &connection).map(listing)
}

pub async fn get_category_endpoint(
    State(state): State<CategoriesState>,
    Path(category_id): Path<String>,
) -> Result<Json<DataResponse<Category>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_category(&category_id, &connection).map(data)
}

#[cfg(test)]
mod list_categories_endpoint_tests {
    use serde_json::Value;

    use crate::{
        category::{CategoryName, CategoryType, NewCategory, create_categories},
        endpoints::{self, format_endpoint},
        test_utils::{TestApp, must_create_test_app},
    };

    fn must_create_categories(app: &TestApp) -> Vec<String> {
        let connection = app.state.db_connection.lock().unwrap();

        create_categories(
            [
                ("Salary", CategoryType::Income),
                ("Food", CategoryType::Expense),
                ("Gifts", CategoryType::General),
                ("Fuel", CategoryType::Expense),
            ]
            .into_iter()
            .map(|(name, category_type)| NewCategory {
                name: CategoryName::new_unchecked(name),
                category_type,
            })
            .collect(),
            &connection,
        )
        .unwrap()
        .into_iter()
        .map(|category| category.id)
        .collect()
    }

    fn names(body: &Value) -> Vec<&str> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|category| category["name"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn type_filter_includes_general() {
        let app = must_create_test_app();
        must_create_categories(&app);

        let body: Value = app
            .server
            .get("/api/categories?type=income")
            .await
            .json();

        assert_eq!(names(&body), vec!["Salary", "Gifts"]);
    }

    #[tokio::test]
    async fn keyword_and_sort() {
        let app = must_create_test_app();
        must_create_categories(&app);

        let body: Value = app
            .server
            .get("/api/categories?keyword=f&sort=name,desc")
            .await
            .json();

        assert_eq!(names(&body), vec!["Gifts", "Fuel", "Food"]);
    }

    #[tokio::test]
    async fn get_single_category() {
        let app = must_create_test_app();
        let ids = must_create_categories(&app);

        let response = app
            .server
            .get(&format_endpoint(endpoints::CATEGORY, &ids[2]))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["name"], "Gifts");
        assert_eq!(body["data"]["type"], "general");
    }
}
