//! The endpoints for listing, viewing, changing and deleting users.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, PasswordHash,
    database_id::DatabaseId,
    db::lock_connection,
    extract::{JsonBody, QueryParams},
    list_filter::Sort,
    pagination::{PageRequest, PaginationConfig},
    response::{DataResponse, data, deleted, listing},
    user::{
        USER_SORT_FIELDS, UserId, UserUpdate, UserWithRole, delete_user, get_user_with_role,
        list_users, update_user,
    },
};

/// The state needed by the user endpoints.
#[derive(Debug, Clone)]
pub struct UserState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The default page and page size.
    pub pagination_config: PaginationConfig,
    /// The bcrypt cost for hashing new passwords.
    pub password_cost: u32,
}

impl FromRef<AppState> for UserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
            password_cost: state.password_cost,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserListParams {
    sort: Option<String>,
    keyword: Option<String>,
    page: Option<u64>,
    limit: Option<u64>,
}

/// List one page of users with their roles.
///
/// Users are always paginated, falling back to the configured page and page size.
pub async fn list_users_endpoint(
    State(state): State<UserState>,
    QueryParams(params): QueryParams<UserListParams>,
) -> Result<Json<DataResponse<Vec<UserWithRole>>>, Error> {
    let sort = Sort::parse_optional(params.sort.as_deref(), USER_SORT_FIELDS)?;
    let page = PageRequest::new(params.page, params.limit, &state.pagination_config)?;

    let connection = lock_connection(&state.db_connection)?;

    list_users(params.keyword.as_deref(), sort, page, &connection).map(listing)
}

pub async fn get_user_endpoint(
    State(state): State<UserState>,
    Path(user_id): Path<String>,
) -> Result<Json<DataResponse<UserWithRole>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_user_with_role(&UserId::new(user_id), &connection).map(data)
}

/// The request body for changing a user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditUserRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role_id: Option<DatabaseId>,
    system_admin: Option<bool>,
}

/// Change some fields of a user. A new password is hashed before it is stored.
pub async fn edit_user_endpoint(
    State(state): State<UserState>,
    Path(user_id): Path<String>,
    JsonBody(request): JsonBody<EditUserRequest>,
) -> Result<Json<DataResponse<UserWithRole>>, Error> {
    let password = match request.password.as_deref() {
        Some(raw_password) if !raw_password.is_empty() => Some(PasswordHash::from_raw_password(
            raw_password,
            state.password_cost,
        )?),
        _ => None,
    };

    let user_id = UserId::new(user_id);
    let connection = lock_connection(&state.db_connection)?;
    update_user(
        &user_id,
        UserUpdate {
            name: request.name,
            email: request.email,
            password,
            role_id: request.role_id,
            system_admin: request.system_admin,
        },
        &connection,
    )?;

    get_user_with_role(&user_id, &connection).map(data)
}

pub async fn delete_user_endpoint(
    State(state): State<UserState>,
    Path(user_id): Path<String>,
) -> Result<Json<DataResponse<&'static str>>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_user(&UserId::new(user_id), &connection)?;

    Ok(deleted())
}
