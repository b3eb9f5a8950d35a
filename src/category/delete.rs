//! Category deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::delete_category,
    db::lock_connection,
    response::{DataResponse, deleted},
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle category deletion.
pub async fn delete_category_endpoint(
    State(state): State<DeleteCategoryEndpointState>,
    Path(category_id): Path<String>,
) -> Result<Json<DataResponse<&'static str>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    match delete_category(&category_id, &connection) {
        Ok(()) => Ok(deleted()),
        Err(Error::NotFound) => Err(Error::NotFound),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting category {category_id}: {error}"
            );
            Err(error)
        }
    }
}

#[cfg(test)]
mod delete_category_endpoint_tests {
    use serde_json::json;

    use crate::{
        category::{CategoryName, CategoryType, NewCategory, create_categories},
        endpoints::{self, format_endpoint},
        test_utils::must_create_test_app,
    };

    #[tokio::test]
    async fn deletes_category() {
        let app = must_create_test_app();
        let category = {
            let connection = app.state.db_connection.lock().unwrap();
            create_categories(
                vec![NewCategory {
                    name: CategoryName::new_unchecked("Food"),
                    category_type: CategoryType::Expense,
                }],
                &connection,
            )
            .unwrap()
            .remove(0)
        };
        let path = format_endpoint(endpoints::CATEGORY, &category.id);

        let response = app.server.delete(&path).await;

        response.assert_status_ok();
        response.assert_json(&json!({ "data": "Successfully deleted data" }));
        app.server.get(&path).await.assert_status_not_found();
        app.server.delete(&path).await.assert_status_not_found();
    }
}
