use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::{DatabaseId, new_database_id},
    list_filter::{ListQuery, Listing, Sort, SortableFields},
    pagination::PageRequest,
    timestamp::Timestamp,
};

/// A role that groups users, e.g. system administrators.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// The ID of the role.
    pub id: DatabaseId,
    /// The display name, e.g. "System Admin".
    pub name: String,
    /// The machine readable code, e.g. "systemadmin".
    pub code: String,
    /// When the role was created.
    pub created_at: Timestamp,
    /// When the role was last changed.
    pub updated_at: Timestamp,
}

/// The data needed to create a role.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRole {
    /// The display name.
    pub name: String,
    /// The machine readable code.
    pub code: String,
}

/// The fields of a role to change. Missing fields are left as is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleUpdate {
    /// The new display name.
    pub name: Option<String>,
    /// The new code.
    pub code: Option<String>,
}

/// The columns selected by [map_row_to_role], in order.
pub const ROLE_COLUMNS: &str = "role.id, role.name, role.code, role.created_at, role.updated_at";

/// The fields roles can be sorted by.
pub const ROLE_SORT_FIELDS: &SortableFields = &[
    ("name", "role.name"),
    ("code", "role.code"),
    ("createdAt", "role.created_at"),
    ("updatedAt", "role.updated_at"),
];

pub fn create_role_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS role (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            code TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Map a row selected with [ROLE_COLUMNS], starting at column `offset`.
pub fn map_row_to_role(row: &Row, offset: usize) -> Result<Role, rusqlite::Error> {
    Ok(Role {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        code: row.get(offset + 2)?,
        created_at: row.get(offset + 3)?,
        updated_at: row.get(offset + 4)?,
    })
}

fn require_text(value: &str, field: &'static str) -> Result<String, Error> {
    let value = value.trim();

    if value.is_empty() {
        return Err(Error::EmptyField(field));
    }

    Ok(value.to_owned())
}

/// Create a role and return it.
///
/// # Errors
/// Returns [Error::EmptyField] if the name or code is blank, or an
/// [Error::SqlError] if the insert failed.
pub fn create_role(role: NewRole, connection: &Connection) -> Result<Role, Error> {
    let now = Timestamp::now();
    let role = Role {
        id: new_database_id(),
        name: require_text(&role.name, "name")?,
        code: require_text(&role.code, "code")?,
        created_at: now,
        updated_at: now,
    };

    connection.execute(
        "INSERT INTO role (id, name, code, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![role.id, role.name, role.code, role.created_at, role.updated_at],
    )?;

    Ok(role)
}

/// Get the role with `id`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such role.
pub fn get_role(id: &str, connection: &Connection) -> Result<Role, Error> {
    connection
        .query_one(
            &format!("SELECT {ROLE_COLUMNS} FROM role WHERE id = ?1"),
            params![id],
            |row| map_row_to_role(row, 0),
        )
        .map_err(Error::from)
}

/// Apply `update` to the role with `id` and return the changed role.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such role, or [Error::EmptyField]
/// if a field would become blank.
pub fn update_role(id: &str, update: RoleUpdate, connection: &Connection) -> Result<Role, Error> {
    let mut role = get_role(id, connection)?;

    if let Some(name) = update.name {
        role.name = require_text(&name, "name")?;
    }

    if let Some(code) = update.code {
        role.code = require_text(&code, "code")?;
    }

    role.updated_at = Timestamp::now();

    connection.execute(
        "UPDATE role SET name = ?1, code = ?2, updated_at = ?3 WHERE id = ?4",
        params![role.name, role.code, role.updated_at, role.id],
    )?;

    Ok(role)
}

/// Delete the role with `id`. Users with the role are left without one.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such role.
pub fn delete_role(id: &str, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM role WHERE id = ?1", params![id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// List the roles whose name or code contains `keyword`.
pub fn list_roles(
    keyword: Option<&str>,
    sort: Option<Sort>,
    page: Option<PageRequest>,
    connection: &Connection,
) -> Result<Listing<Role>, Error> {
    ListQuery::new("FROM role", "role.created_at ASC, role.rowid ASC")
        .keyword(&["role.name", "role.code"], keyword)
        .sort(sort)
        .fetch(ROLE_COLUMNS, page, connection, |row| map_row_to_role(row, 0))
}

/// Get the number of roles in the database.
pub fn count_roles(connection: &Connection) -> Result<u64, Error> {
    ListQuery::new("FROM role", "role.rowid ASC").count(connection)
}
