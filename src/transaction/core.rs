//! Defines the core data models and database queries for incomes and expenses.

use rusqlite::{
    Connection, OptionalExtension, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    calendar_date::{deserialize_date, deserialize_optional_date, iso_date},
    category::{CATEGORY_COLUMNS, Category, CategoryType, map_row_to_category},
    database_id::{DatabaseId, new_database_id},
    timestamp::Timestamp,
    user::UserId,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Whether a category of `category_type` may be used for this kind of transaction.
    pub fn accepts(self, category_type: CategoryType) -> bool {
        matches!(
            (self, category_type),
            (_, CategoryType::General)
                | (TransactionKind::Income, CategoryType::Income)
                | (TransactionKind::Expense, CategoryType::Expense)
        )
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown transaction kind {other}").into(),
            )),
        }
    }
}

/// An income or expense, i.e. an event where money was either earned or spent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseId,
    /// Whether this is an income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The user that recorded the transaction.
    pub user_id: UserId,
    /// The account the money went into or came out of.
    pub account_id: Option<DatabaseId>,
    /// The ID of the category the transaction belongs to.
    pub category_id: Option<DatabaseId>,
    /// The category the transaction belongs to.
    pub category: Option<Category>,
    /// A short name for the transaction, e.g. "Groceries".
    pub title: String,
    /// The amount of money earned or spent. Always given as a positive number for both kinds.
    pub amount: f64,
    /// A longer description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Whether the transaction repeats, e.g. a salary.
    pub recurring: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The data needed to record an income or expense.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub title: String,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    pub category_id: Option<DatabaseId>,
    pub account_id: Option<DatabaseId>,
    /// Either `YYYY-MM-DD` or an RFC 3339 date-time.
    #[serde(deserialize_with = "deserialize_date")]
    pub date: Date,
    #[serde(default)]
    pub recurring: bool,
}

/// The fields of a transaction to change. Missing fields are left as is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub category_id: Option<DatabaseId>,
    pub account_id: Option<DatabaseId>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<Date>,
    pub recurring: Option<bool>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The table, aliased to `t`, joined with the category of each row.
pub const TRANSACTION_FROM: &str =
    "FROM \"transaction\" AS t LEFT JOIN category ON category.id = t.category_id";

const TRANSACTION_COLUMN_COUNT: usize = 12;

/// The columns selected by [map_transaction_row], in order.
pub fn transaction_columns() -> String {
    format!(
        "t.id, t.kind, t.user_id, t.account_id, t.category_id, t.title, t.amount, \
        t.description, t.date, t.recurring, t.created_at, t.updated_at, {CATEGORY_COLUMNS}"
    )
}

pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id TEXT PRIMARY KEY,
            kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
            user_id TEXT NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            account_id TEXT REFERENCES account(id) ON DELETE SET NULL,
            category_id TEXT REFERENCES category(id) ON DELETE SET NULL,
            title TEXT NOT NULL,
            amount REAL NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL,
            recurring INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_kind_date
            ON \"transaction\"(user_id, kind, date);",
    )?;

    Ok(())
}

/// Map a row selected with [transaction_columns].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let category_id: Option<DatabaseId> = row.get(4)?;
    let category = match category_id {
        Some(_) => Some(map_row_to_category(row, TRANSACTION_COLUMN_COUNT)?),
        None => None,
    };

    Ok(Transaction {
        id: row.get(0)?,
        kind: row.get(1)?,
        user_id: row.get(2)?,
        account_id: row.get(3)?,
        category_id,
        category,
        title: row.get(5)?,
        amount: row.get(6)?,
        description: row.get(7)?,
        date: row.get(8)?,
        recurring: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn validate_title(title: &str) -> Result<String, Error> {
    let title = title.trim();

    if title.is_empty() {
        return Err(Error::EmptyField("title"));
    }

    Ok(title.to_owned())
}

/// Check that a category exists and suits `kind`, returning it.
fn check_category(
    category_id: &str,
    kind: TransactionKind,
    connection: &Connection,
) -> Result<Category, Error> {
    let category = connection
        .query_row(
            &format!("SELECT {CATEGORY_COLUMNS} FROM category WHERE id = ?1"),
            params![category_id],
            |row| map_row_to_category(row, 0),
        )
        .optional()?
        .ok_or(Error::InvalidReference("category"))?;

    if !kind.accepts(category.category_type) {
        return Err(Error::CategoryKindMismatch {
            category_type: category.category_type.as_str().to_owned(),
            kind: kind.as_str().to_owned(),
        });
    }

    Ok(category)
}

/// Check that an account exists and belongs to `user_id`.
fn check_account(account_id: &str, user_id: &UserId, connection: &Connection) -> Result<(), Error> {
    let exists: bool = connection.query_row(
        "SELECT EXISTS (SELECT 1 FROM account WHERE id = ?1 AND user_id = ?2)",
        params![account_id, user_id],
        |row| row.get(0),
    )?;

    if exists {
        Ok(())
    } else {
        Err(Error::InvalidReference("account"))
    }
}

/// Record a new income or expense for `user_id`.
///
/// The balance of the referenced account is not changed.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyField] if the title is blank,
/// - [Error::InvalidReference] if the category or account does not exist, or the account belongs
///   to another user,
/// - [Error::CategoryKindMismatch] if the category is for the other kind of transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    kind: TransactionKind,
    new_transaction: NewTransaction,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let title = validate_title(&new_transaction.title)?;

    let category = match &new_transaction.category_id {
        Some(category_id) => Some(check_category(category_id, kind, connection)?),
        None => None,
    };

    if let Some(account_id) = &new_transaction.account_id {
        check_account(account_id, user_id, connection)?;
    }

    let now = Timestamp::now();
    let transaction = Transaction {
        id: new_database_id(),
        kind,
        user_id: user_id.clone(),
        account_id: new_transaction.account_id,
        category_id: new_transaction.category_id,
        category,
        title,
        amount: new_transaction.amount,
        description: new_transaction.description,
        date: new_transaction.date,
        recurring: new_transaction.recurring,
        created_at: now,
        updated_at: now,
    };

    connection.execute(
        "INSERT INTO \"transaction\" (id, kind, user_id, account_id, category_id, title, amount,
            description, date, recurring, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            transaction.id,
            transaction.kind,
            transaction.user_id,
            transaction.account_id,
            transaction.category_id,
            transaction.title,
            transaction.amount,
            transaction.description,
            transaction.date,
            transaction.recurring,
            transaction.created_at,
            transaction.updated_at,
        ],
    )?;

    Ok(transaction)
}

/// Retrieve an income or expense of `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction does not exist, is of the other kind, or belongs to
/// another user.
pub fn get_transaction(
    kind: TransactionKind,
    id: &str,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .query_one(
            &format!(
                "SELECT {} {TRANSACTION_FROM} WHERE t.id = ?1 AND t.kind = ?2 AND t.user_id = ?3",
                transaction_columns()
            ),
            params![id, kind, user_id],
            map_transaction_row,
        )
        .map_err(Error::from)
}

/// Apply `update` to an income or expense and return the changed transaction.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction does not exist, and the same validation errors as
/// [create_transaction].
pub fn update_transaction(
    kind: TransactionKind,
    id: &str,
    update: TransactionUpdate,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let mut transaction = get_transaction(kind, id, user_id, connection)?;

    if let Some(title) = update.title {
        transaction.title = validate_title(&title)?;
    }

    if let Some(amount) = update.amount {
        transaction.amount = amount;
    }

    if let Some(description) = update.description {
        transaction.description = description;
    }

    if let Some(category_id) = update.category_id {
        transaction.category = Some(check_category(&category_id, kind, connection)?);
        transaction.category_id = Some(category_id);
    }

    if let Some(account_id) = update.account_id {
        check_account(&account_id, user_id, connection)?;
        transaction.account_id = Some(account_id);
    }

    if let Some(date) = update.date {
        transaction.date = date;
    }

    if let Some(recurring) = update.recurring {
        transaction.recurring = recurring;
    }

    transaction.updated_at = Timestamp::now();

    connection.execute(
        "UPDATE \"transaction\"
        SET account_id = ?1, category_id = ?2, title = ?3, amount = ?4, description = ?5,
            date = ?6, recurring = ?7, updated_at = ?8
        WHERE id = ?9 AND user_id = ?10",
        params![
            transaction.account_id,
            transaction.category_id,
            transaction.title,
            transaction.amount,
            transaction.description,
            transaction.date,
            transaction.recurring,
            transaction.updated_at,
            transaction.id,
            transaction.user_id,
        ],
    )?;

    Ok(transaction)
}

/// Delete an income or expense of `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such transaction.
pub fn delete_transaction(
    kind: TransactionKind,
    id: &str,
    user_id: &UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND kind = ?2 AND user_id = ?3",
        params![id, kind, user_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}
