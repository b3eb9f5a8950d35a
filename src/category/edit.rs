//! Category editing endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, CategoryUpdate, update_category},
    db::lock_connection,
    extract::JsonBody,
    response::{DataResponse, data},
};

/// The state needed for updating a category.
#[derive(Debug, Clone)]
pub struct UpdateCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

pub async fn update_category_endpoint(
    State(state): State<UpdateCategoryEndpointState>,
    Path(category_id): Path<String>,
    JsonBody(update): JsonBody<CategoryUpdate>,
) -> Result<Json<DataResponse<Category>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    update_category(&category_id, update, &connection).map(data)
}
