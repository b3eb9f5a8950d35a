//! Defines the endpoint for creating a user.

use axum::{
    extract::State,
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    Error, PasswordHash,
    database_id::DatabaseId,
    db::lock_connection,
    endpoints::{self, format_endpoint},
    extract::JsonBody,
    response::added,
    user::{NewUser, UserState, create_user},
};

/// The request body for creating a user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    name: String,
    email: String,
    password: Option<String>,
    role_id: Option<DatabaseId>,
    #[serde(default)]
    system_admin: bool,
}

/// Create a user, hashing their password if one is given.
///
/// Responds with 409 Conflict if the email address is taken.
pub async fn create_user_endpoint(
    State(state): State<UserState>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> Result<Response, Error> {
    let password = match request.password.as_deref() {
        Some(raw_password) if !raw_password.is_empty() => Some(PasswordHash::from_raw_password(
            raw_password,
            state.password_cost,
        )?),
        _ => None,
    };

    let connection = lock_connection(&state.db_connection)?;
    let user = create_user(
        NewUser {
            name: request.name,
            email: request.email,
            password,
            role_id: request.role_id,
            system_admin: request.system_admin,
        },
        &connection,
    )?;
    tracing::info!("Created user {}", user.id);

    Ok((
        StatusCode::CREATED,
        [(LOCATION, format_endpoint(endpoints::USER, user.id.as_str()))],
        added(),
    )
        .into_response())
}
