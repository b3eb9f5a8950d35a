//! The endpoints for managing roles.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    db::lock_connection,
    endpoints::{self, format_endpoint},
    extract::{JsonBody, QueryParams},
    list_filter::Sort,
    pagination::{PageRequest, PaginationConfig},
    response::{DataResponse, added, data, deleted, listing},
    role::{
        NewRole, ROLE_SORT_FIELDS, Role, RoleUpdate, create_role, delete_role, get_role,
        list_roles, update_role,
    },
};

/// The state needed by the role endpoints.
#[derive(Debug, Clone)]
pub struct RoleState {
    /// The database connection for managing roles.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The default page and page size.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for RoleState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters for listing roles.
#[derive(Debug, Default, Deserialize)]
pub struct RoleListParams {
    sort: Option<String>,
    keyword: Option<String>,
    page: Option<u64>,
    limit: Option<u64>,
}

/// List roles, optionally filtered, sorted and paginated.
pub async fn list_roles_endpoint(
    State(state): State<RoleState>,
    QueryParams(params): QueryParams<RoleListParams>,
) -> Result<Json<DataResponse<Vec<Role>>>, Error> {
    let sort = Sort::parse_optional(params.sort.as_deref(), ROLE_SORT_FIELDS)?;
    let page = PageRequest::optional(params.page, params.limit, &state.pagination_config)?;

    let connection = lock_connection(&state.db_connection)?;
    let roles = list_roles(params.keyword.as_deref(), sort, page, &connection)?;

    Ok(listing(roles))
}

/// Create a role.
pub async fn create_role_endpoint(
    State(state): State<RoleState>,
    JsonBody(new_role): JsonBody<NewRole>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let role = create_role(new_role, &connection)?;
    tracing::debug!("Created role {}", role.id);

    Ok((
        StatusCode::CREATED,
        [(LOCATION, format_endpoint(endpoints::ROLE, &role.id))],
        added(),
    )
        .into_response())
}

/// Get a single role.
pub async fn get_role_endpoint(
    State(state): State<RoleState>,
    Path(role_id): Path<String>,
) -> Result<Json<DataResponse<Role>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_role(&role_id, &connection).map(data)
}

/// Change some fields of a role.
pub async fn edit_role_endpoint(
    State(state): State<RoleState>,
    Path(role_id): Path<String>,
    JsonBody(update): JsonBody<RoleUpdate>,
) -> Result<Json<DataResponse<Role>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    update_role(&role_id, update, &connection).map(data)
}

/// Delete a role.
pub async fn delete_role_endpoint(
    State(state): State<RoleState>,
    Path(role_id): Path<String>,
) -> Result<Json<DataResponse<&'static str>>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_role(&role_id, &connection)?;

    Ok(deleted())
}
