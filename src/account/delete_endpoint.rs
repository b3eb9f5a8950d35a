//! Defines the endpoint for deleting an account.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
};
use rusqlite::{Connection, params};

use crate::{
    AppState, Error,
    db::lock_connection,
    response::{DataResponse, deleted},
    user::UserId,
};

/// The state needed to delete an account.
#[derive(Debug, Clone)]
pub struct DeleteAccountState {
    /// The database connection for managing account.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an account.
///
/// Incomes and expenses that referred to the account are kept, without an account.
pub async fn delete_account_endpoint(
    State(state): State<DeleteAccountState>,
    Extension(user_id): Extension<UserId>,
    Path(account_id): Path<String>,
) -> Result<Json<DataResponse<&'static str>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    match delete_account(&account_id, &user_id, &connection)? {
        0 => Err(Error::NotFound),
        _ => Ok(deleted()),
    }
}

type RowsAffected = usize;

/// Delete one of `user_id`'s accounts.
pub fn delete_account(
    id: &str,
    user_id: &UserId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM account WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )
        .map_err(|error| error.into())
}
