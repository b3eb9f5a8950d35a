//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use email_address::EmailAddress;
use rusqlite::{
    Connection, Row, params,
    types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error, PasswordHash,
    database_id::{DatabaseId, new_database_id},
    list_filter::{ListQuery, Listing, Sort, SortableFields},
    pagination::PageRequest,
    role::{ROLE_COLUMNS, Role, map_row_to_role},
    timestamp::Timestamp,
};

/// A newtype wrapper for user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, e.g. when passing an account ID where the owner's ID is expected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ToSql for UserId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for UserId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        String::column_result(value).map(Self)
    }
}

/// A user of the application.
///
/// The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The user's role, if any.
    pub role_id: Option<DatabaseId>,
    /// The user's display name.
    pub name: String,
    /// The user's email address, unique across users.
    pub email: String,
    /// The user's password hash.
    #[serde(skip)]
    pub password: Option<PasswordHash>,
    /// Whether the user administers the whole system.
    pub system_admin: bool,
    /// When the user was created.
    pub created_at: Timestamp,
    /// When the user was last changed.
    pub updated_at: Timestamp,
}

/// A user along with their role, as sent in user lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserWithRole {
    /// The user.
    #[serde(flatten)]
    pub user: User,
    /// The user's role, if they have one.
    pub role: Option<Role>,
}

/// The data needed to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// The display name.
    pub name: String,
    /// The email address.
    pub email: String,
    /// The hashed password, if the user can log in with a password.
    pub password: Option<PasswordHash>,
    /// The user's role.
    pub role_id: Option<DatabaseId>,
    /// Whether the user administers the whole system.
    pub system_admin: bool,
}

/// The fields of a user to change. Missing fields are left as is.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// The new display name.
    pub name: Option<String>,
    /// The new email address.
    pub email: Option<String>,
    /// The new password hash.
    pub password: Option<PasswordHash>,
    /// The new role.
    pub role_id: Option<DatabaseId>,
    /// The new admin flag.
    pub system_admin: Option<bool>,
}

const USER_COLUMNS: &str = "user.id, user.role_id, user.name, user.email, user.password, \
    user.system_admin, user.created_at, user.updated_at";

/// The fields users can be sorted by.
pub const USER_SORT_FIELDS: &SortableFields = &[
    ("name", "user.name"),
    ("email", "user.email"),
    ("createdAt", "user.created_at"),
    ("updatedAt", "user.updated_at"),
];

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id TEXT PRIMARY KEY,
                role_id TEXT REFERENCES role(id) ON DELETE SET NULL,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT,
                system_admin INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
                )",
        (),
    )?;

    Ok(())
}

fn map_row_to_user(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_password_hash: Option<String> = row.get(4)?;

    Ok(User {
        id: row.get(0)?,
        role_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        password: raw_password_hash.as_deref().map(PasswordHash::new_unchecked),
        system_admin: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn map_row_to_user_with_role(row: &Row) -> Result<UserWithRole, rusqlite::Error> {
    let user = map_row_to_user(row)?;
    let role_id: Option<String> = row.get(8)?;
    let role = match role_id {
        Some(_) => Some(map_row_to_role(row, 8)?),
        None => None,
    };

    Ok(UserWithRole { user, role })
}

fn validate_name(name: &str) -> Result<String, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyField("name"));
    }

    Ok(name.to_owned())
}

fn validate_email(email: &str) -> Result<String, Error> {
    let email = email.trim();

    if !EmailAddress::is_valid(email) {
        return Err(Error::InvalidEmail(email.to_owned()));
    }

    Ok(email.to_owned())
}

fn check_role_exists(role_id: &str, connection: &Connection) -> Result<(), Error> {
    let exists: bool = connection.query_row(
        "SELECT EXISTS (SELECT 1 FROM role WHERE id = ?1)",
        params![role_id],
        |row| row.get(0),
    )?;

    if exists {
        Ok(())
    } else {
        Err(Error::InvalidReference("role"))
    }
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns:
/// - [Error::EmptyField] or [Error::InvalidEmail] if the name or email is unusable,
/// - [Error::InvalidReference] if the role does not exist,
/// - [Error::DuplicateEmail] if another user has the same email,
/// - [Error::SqlError] if another SQL related error occurred.
pub fn create_user(user: NewUser, connection: &Connection) -> Result<User, Error> {
    if let Some(role_id) = &user.role_id {
        check_role_exists(role_id, connection)?;
    }

    let now = Timestamp::now();
    let user = User {
        id: UserId::new(new_database_id()),
        role_id: user.role_id,
        name: validate_name(&user.name)?,
        email: validate_email(&user.email)?,
        password: user.password,
        system_admin: user.system_admin,
        created_at: now,
        updated_at: now,
    };

    connection.execute(
        "INSERT INTO user (id, role_id, name, email, password, system_admin, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user.id,
            user.role_id,
            user.name,
            user.email,
            user.password.as_ref().map(|hash| hash.as_ref()),
            user.system_admin,
            user.created_at,
            user.updated_at,
        ],
    )?;

    Ok(user)
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: &UserId, connection: &Connection) -> Result<User, Error> {
    connection
        .query_one(
            &format!("SELECT {USER_COLUMNS} FROM user WHERE id = ?1"),
            params![user_id],
            map_row_to_user,
        )
        .map_err(Error::from)
}

/// Get the user whose email address is `email`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has that email address.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .query_one(
            &format!("SELECT {USER_COLUMNS} FROM user WHERE email = ?1"),
            params![email.trim()],
            map_row_to_user,
        )
        .map_err(Error::from)
}

/// Get a user along with their role.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such user.
pub fn get_user_with_role(
    user_id: &UserId,
    connection: &Connection,
) -> Result<UserWithRole, Error> {
    connection
        .query_one(
            &format!(
                "SELECT {USER_COLUMNS}, {ROLE_COLUMNS} FROM user \
                LEFT JOIN role ON role.id = user.role_id WHERE user.id = ?1"
            ),
            params![user_id],
            map_row_to_user_with_role,
        )
        .map_err(Error::from)
}

/// Check whether a user with `user_id` exists.
pub fn user_exists(user_id: &UserId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS (SELECT 1 FROM user WHERE id = ?1)",
            params![user_id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Apply `update` to the user with `user_id` and return the changed user.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such user, and the same
/// validation errors as [create_user].
pub fn update_user(
    user_id: &UserId,
    update: UserUpdate,
    connection: &Connection,
) -> Result<User, Error> {
    let mut user = get_user_by_id(user_id, connection)?;

    if let Some(name) = update.name {
        user.name = validate_name(&name)?;
    }

    if let Some(email) = update.email {
        user.email = validate_email(&email)?;
    }

    if let Some(password) = update.password {
        user.password = Some(password);
    }

    if let Some(role_id) = update.role_id {
        check_role_exists(&role_id, connection)?;
        user.role_id = Some(role_id);
    }

    if let Some(system_admin) = update.system_admin {
        user.system_admin = system_admin;
    }

    user.updated_at = Timestamp::now();

    connection.execute(
        "UPDATE user SET role_id = ?1, name = ?2, email = ?3, password = ?4, system_admin = ?5, \
        updated_at = ?6 WHERE id = ?7",
        params![
            user.role_id,
            user.name,
            user.email,
            user.password.as_ref().map(|hash| hash.as_ref()),
            user.system_admin,
            user.updated_at,
            user.id,
        ],
    )?;

    Ok(user)
}

/// Replace the password hash of the user with `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such user.
pub fn set_user_password(
    user_id: &UserId,
    password: PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1, updated_at = ?2 WHERE id = ?3",
        params![password.as_ref(), Timestamp::now(), user_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete the user with `user_id`, along with their accounts, transactions and settings.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such user.
pub fn delete_user(user_id: &UserId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM user WHERE id = ?1", params![user_id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// List one page of the users whose name or email contains `keyword`.
///
/// The pagination total counts only the users matching `keyword`.
pub fn list_users(
    keyword: Option<&str>,
    sort: Option<Sort>,
    page: PageRequest,
    connection: &Connection,
) -> Result<Listing<UserWithRole>, Error> {
    ListQuery::new(
        "FROM user LEFT JOIN role ON role.id = user.role_id",
        "user.created_at ASC, user.rowid ASC",
    )
    .keyword(&["user.name", "user.email"], keyword)
    .sort(sort)
    .fetch(
        &format!("{USER_COLUMNS}, {ROLE_COLUMNS}"),
        Some(page),
        connection,
        map_row_to_user_with_role,
    )
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<u64, Error> {
    ListQuery::new("FROM user", "user.rowid ASC").count(connection)
}
