//! Middleware that works out which user a request is acting for.
//!
//! Logging in is handled upstream, which passes the user's ID along in the
//! [USER_ID_HEADER] header.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::lock_connection,
    user::{UserId, user_exists},
};

/// The request header that holds the ID of the acting user.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The state needed for the user guard.
#[derive(Debug, Clone)]
pub struct UserGuardState {
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UserGuardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Middleware function that checks the request names an existing user.
///
/// The user ID is placed into the request and then the request executed normally if the user
/// exists, otherwise a 401 Unauthorized response is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserId>`
/// to receive the user ID.
pub async fn user_guard(
    State(state): State<UserGuardState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user_id = match get_acting_user(&state, &request) {
        Ok(user_id) => user_id,
        Err(error) => return error.into_response(),
    };

    request.extensions_mut().insert(user_id);

    next.run(request).await
}

fn get_acting_user(state: &UserGuardState, request: &Request) -> Result<UserId, Error> {
    let raw_user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(Error::MissingActingUser)?;

    let user_id = UserId::new(raw_user_id);
    let connection = lock_connection(&state.db_connection)?;

    if user_exists(&user_id, &connection)? {
        Ok(user_id)
    } else {
        tracing::warn!("Request made for unknown user {user_id}");
        Err(Error::UnknownActingUser)
    }
}
