//! Defines the endpoint for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, params};
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::{Account, AccountType},
    database_id::new_database_id,
    db::lock_connection,
    endpoints::{self, format_endpoint},
    extract::JsonBody,
    response::added,
    timestamp::Timestamp,
    user::UserId,
};

/// The state needed to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The data for creating an account.
#[derive(Debug, Deserialize)]
pub struct NewAccount {
    /// The account name.
    pub name: String,
    /// Where the money is held.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// The starting balance.
    #[serde(default)]
    pub balance: f64,
}

/// A route handler for creating a new account for the acting user.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    Extension(user_id): Extension<UserId>,
    JsonBody(new_account): JsonBody<NewAccount>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let account = create_account(new_account, &user_id, &connection)?;

    Ok((
        StatusCode::CREATED,
        [(LOCATION, format_endpoint(endpoints::ACCOUNT, &account.id))],
        added(),
    )
        .into_response())
}

/// Create an account owned by `user_id`.
///
/// # Errors
/// Returns [Error::EmptyField] if the name is blank.
pub fn create_account(
    new_account: NewAccount,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Account, Error> {
    let name = new_account.name.trim();

    if name.is_empty() {
        return Err(Error::EmptyField("name"));
    }

    let now = Timestamp::now();
    let account = Account {
        id: new_database_id(),
        user_id: user_id.clone(),
        name: name.to_owned(),
        account_type: new_account.account_type,
        type_label: new_account.account_type.label(),
        balance: new_account.balance,
        created_at: now,
        updated_at: now,
    };

    connection.execute(
        "INSERT INTO account (id, user_id, name, type, balance, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            account.id,
            account.user_id,
            account.name,
            account.account_type,
            account.balance,
            account.created_at,
            account.updated_at,
        ],
    )?;

    Ok(account)
}
