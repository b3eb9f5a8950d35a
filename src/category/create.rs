//! Category creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::{NewCategory, create_categories},
    db::lock_connection,
    extract::JsonBody,
    response::added,
};

/// The state needed for creating categories.
#[derive(Debug, Clone)]
pub struct CreateCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The rows of the category form.
#[derive(Debug, Deserialize)]
pub struct CreateCategoriesRequest {
    categories: Vec<NewCategory>,
}

/// Create every category in the request, or none of them if one fails.
pub async fn create_categories_endpoint(
    State(state): State<CreateCategoryEndpointState>,
    JsonBody(request): JsonBody<CreateCategoriesRequest>,
) -> Result<Response, Error> {
    if request.categories.is_empty() {
        return Err(Error::EmptyField("categories"));
    }

    let connection = lock_connection(&state.db_connection)?;
    let categories = create_categories(request.categories, &connection)?;
    tracing::debug!("Created {} categories", categories.len());

    Ok((StatusCode::CREATED, added()).into_response())
}
