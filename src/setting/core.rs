use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;

use crate::{
    Error,
    database_id::{DatabaseId, new_database_id},
    timestamp::Timestamp,
    user::UserId,
};

/// The key of the setting that holds the display currency.
pub const CURRENCY_KEY: &str = "currency";
/// The display currency used when a user has not picked one.
pub const DEFAULT_CURRENCY: &str = "IDR";

/// A key-value setting that belongs to one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub id: DatabaseId,
    pub user_id: UserId,
    pub key: String,
    pub value: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

const SETTING_COLUMNS: &str = "id, user_id, key, value, created_at, updated_at";

pub fn create_setting_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS setting (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            UNIQUE(user_id, key)
        )",
        (),
    )?;

    Ok(())
}

fn map_row_to_setting(row: &Row) -> Result<Setting, rusqlite::Error> {
    Ok(Setting {
        id: row.get(0)?,
        user_id: row.get(1)?,
        key: row.get(2)?,
        value: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

/// Get all of a user's settings, ordered by key.
pub fn list_settings(user_id: &UserId, connection: &Connection) -> Result<Vec<Setting>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SETTING_COLUMNS} FROM setting WHERE user_id = ?1 ORDER BY key ASC"
        ))?
        .query_map(params![user_id], map_row_to_setting)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

/// Get the user's setting called `key`.
///
/// # Errors
/// Returns [Error::NotFound] if the user has no such setting.
pub fn get_setting(user_id: &UserId, key: &str, connection: &Connection) -> Result<Setting, Error> {
    connection
        .query_one(
            &format!("SELECT {SETTING_COLUMNS} FROM setting WHERE user_id = ?1 AND key = ?2"),
            params![user_id, key],
            map_row_to_setting,
        )
        .map_err(Error::from)
}

/// Get the value of the user's setting called `key`, if they have set it.
pub fn get_setting_value(
    user_id: &UserId,
    key: &str,
    connection: &Connection,
) -> Result<Option<String>, Error> {
    connection
        .query_row(
            "SELECT value FROM setting WHERE user_id = ?1 AND key = ?2",
            params![user_id, key],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
}

/// Set the user's setting called `key` to `value`, creating it if needed.
///
/// # Errors
/// Returns [Error::EmptyField] if `key` is blank.
pub fn put_setting(
    user_id: &UserId,
    key: &str,
    value: &str,
    connection: &Connection,
) -> Result<Setting, Error> {
    let key = key.trim();

    if key.is_empty() {
        return Err(Error::EmptyField("key"));
    }

    let now = Timestamp::now();
    connection.execute(
        "INSERT INTO setting (id, user_id, key, value, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        ON CONFLICT(user_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![new_database_id(), user_id, key, value, now],
    )?;

    get_setting(user_id, key, connection)
}

/// Delete the user's setting called `key`.
///
/// # Errors
/// Returns [Error::NotFound] if the user has no such setting.
pub fn delete_setting(user_id: &UserId, key: &str, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM setting WHERE user_id = ?1 AND key = ?2",
        params![user_id, key],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}
