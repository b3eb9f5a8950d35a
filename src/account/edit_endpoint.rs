//! Defines the endpoint for updating an account
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
};
use rusqlite::{Connection, params};
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::{Account, AccountType, get_account},
    db::lock_connection,
    extract::JsonBody,
    response::{DataResponse, data},
    timestamp::Timestamp,
    user::UserId,
};

/// The state needed to edit an account.
#[derive(Debug, Clone)]
pub struct EditAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The fields of an account to change. Missing fields are left as is.
#[derive(Debug, Default, Deserialize)]
pub struct AccountUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    pub balance: Option<f64>,
}

pub async fn edit_account_endpoint(
    State(state): State<EditAccountState>,
    Extension(user_id): Extension<UserId>,
    Path(account_id): Path<String>,
    JsonBody(update): JsonBody<AccountUpdate>,
) -> Result<Json<DataResponse<Account>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    update_account(&account_id, &user_id, update, &connection).map(data)
}

/// Apply `update` to the account and return the changed account.
///
/// # Errors
/// Returns [Error::NotFound] if `user_id` has no account with `id`.
pub fn update_account(
    id: &str,
    user_id: &UserId,
    update: AccountUpdate,
    connection: &Connection,
) -> Result<Account, Error> {
    let mut account = get_account(id, user_id, connection)?;

    if let Some(name) = update.name {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::EmptyField("name"));
        }

        account.name = name.to_owned();
    }

    if let Some(account_type) = update.account_type {
        account.account_type = account_type;
        account.type_label = account_type.label();
    }

    if let Some(balance) = update.balance {
        account.balance = balance;
    }

    account.updated_at = Timestamp::now();

    connection.execute(
        "UPDATE account
        SET \
            name = ?1, \
            type = ?2, \
            balance = ?3, \
            updated_at = ?4 \
        WHERE id = ?5 AND user_id = ?6;",
        params![
            account.name,
            account.account_type,
            account.balance,
            account.updated_at,
            account.id,
            account.user_id,
        ],
    )?;

    Ok(account)
}
