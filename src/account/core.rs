use rusqlite::{
    Connection, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::DatabaseId,
    list_filter::{ListQuery, Listing, Sort, SortableFields},
    pagination::PageRequest,
    timestamp::Timestamp,
    user::UserId,
};

/// The kind of place an account's money is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Bank,
    Cash,
    EWallet,
    Crypto,
    Other,
}

impl AccountType {
    /// The code stored in the database and sent over the wire, e.g. "E_WALLET".
    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Bank => "BANK",
            AccountType::Cash => "CASH",
            AccountType::EWallet => "E_WALLET",
            AccountType::Crypto => "CRYPTO",
            AccountType::Other => "OTHER",
        }
    }

    /// The human readable name of the type, e.g. "E-Wallet".
    pub fn label(self) -> &'static str {
        match self {
            AccountType::Bank => "Bank",
            AccountType::Cash => "Cash",
            AccountType::EWallet => "E-Wallet",
            AccountType::Crypto => "Crypto",
            AccountType::Other => "Other",
        }
    }

    /// Parse a type code, e.g. "BANK".
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "BANK" => Some(AccountType::Bank),
            "CASH" => Some(AccountType::Cash),
            "E_WALLET" => Some(AccountType::EWallet),
            "CRYPTO" => Some(AccountType::Crypto),
            "OTHER" => Some(AccountType::Other),
            _ => None,
        }
    }
}

impl ToSql for AccountType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AccountType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = value.as_str()?;

        Self::from_code(code)
            .ok_or_else(|| FromSqlError::Other(format!("unknown account type {code}").into()))
    }
}

/// The amount of money held in a bank account, wallet, etc.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The id for the account.
    pub id: DatabaseId,
    /// The owner of the account.
    pub user_id: UserId,
    /// The name of the account, e.g. "Everyday".
    pub name: String,
    /// Where the money is held.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// The label to show for `account_type`.
    pub type_label: &'static str,
    /// The balance.
    pub balance: f64,
    /// When the account was created.
    pub created_at: Timestamp,
    /// When the account was last changed.
    pub updated_at: Timestamp,
}

pub const ACCOUNT_COLUMNS: &str = "account.id, account.user_id, account.name, account.type, \
    account.balance, account.created_at, account.updated_at";

/// The fields accounts can be sorted by.
pub const ACCOUNT_SORT_FIELDS: &SortableFields = &[
    ("name", "account.name"),
    ("type", "account.type"),
    ("balance", "account.balance"),
    ("createdAt", "account.created_at"),
    ("updatedAt", "account.updated_at"),
];

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('BANK', 'CASH', 'E_WALLET', 'CRYPTO', 'OTHER')),
            balance REAL NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    let account_type: AccountType = row.get(3)?;

    Ok(Account {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        account_type,
        type_label: account_type.label(),
        balance: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Get the account with `id` if it belongs to `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such account or another user owns it.
pub fn get_account(id: &str, user_id: &UserId, connection: &Connection) -> Result<Account, Error> {
    connection
        .query_one(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM account WHERE id = ?1 AND user_id = ?2"),
            params![id, user_id],
            map_row_to_account,
        )
        .map_err(Error::from)
}

/// Filters for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Only include accounts whose name contains this text.
    pub keyword: Option<String>,
    /// Only include accounts of this type.
    pub account_type: Option<AccountType>,
    pub sort: Option<Sort>,
}

/// List the accounts of `user_id` that match `filter`.
pub fn list_accounts(
    user_id: &UserId,
    filter: &AccountFilter,
    page: Option<PageRequest>,
    connection: &Connection,
) -> Result<Listing<Account>, Error> {
    let mut query = ListQuery::new("FROM account", "account.created_at ASC, account.rowid ASC")
        .filter("account.user_id = ?", [user_id.as_str().to_owned().into()])
        .keyword(&["account.name"], filter.keyword.as_deref())
        .sort(filter.sort);

    if let Some(account_type) = filter.account_type {
        query = query.any_of("account.type", [account_type.as_str().to_owned()]);
    }

    query.fetch(ACCOUNT_COLUMNS, page, connection, map_row_to_account)
}

/// Get the total balance across all of a user's accounts.
///
/// # Errors
/// Returns [Error] if:
/// - Database connection fails
/// - SQL query preparation or execution fails
pub fn get_total_account_balance(user_id: &UserId, connection: &Connection) -> Result<f64, Error> {
    let mut stmt =
        connection.prepare("SELECT COALESCE(SUM(balance), 0) FROM account WHERE user_id = ?1")?;

    let total: f64 = stmt.query_row(params![user_id], |row| row.get(0))?;

    Ok(total)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        account::{NewAccount, create_account},
        test_utils::{must_create_test_connection, must_create_test_user},
        user::UserId,
    };

    use super::{
        AccountFilter, AccountType, create_account_table, get_account, get_total_account_balance,
        list_accounts,
    };

    #[test]
    fn sql_is_valid() {
        let connection = must_create_test_connection();

        assert_eq!(Ok(()), create_account_table(&connection));
    }

    #[test]
    fn labels() {
        assert_eq!(AccountType::Bank.label(), "Bank");
        assert_eq!(AccountType::Cash.label(), "Cash");
        assert_eq!(AccountType::EWallet.label(), "E-Wallet");
        assert_eq!(AccountType::Crypto.label(), "Crypto");
        assert_eq!(AccountType::Other.label(), "Other");
    }

    #[test]
    fn serializes_type_codes() {
        assert_eq!(
            serde_json::to_string(&AccountType::EWallet).unwrap(),
            "\"E_WALLET\""
        );
        assert_eq!(
            serde_json::from_str::<AccountType>("\"CRYPTO\"").unwrap(),
            AccountType::Crypto
        );
    }

    fn must_create_account(
        name: &str,
        account_type: AccountType,
        balance: f64,
        user_id: &UserId,
        connection: &Connection,
    ) -> String {
        create_account(
            NewAccount {
                name: name.to_owned(),
                account_type,
                balance,
            },
            user_id,
            connection,
        )
        .expect("could not create test account")
        .id
    }

    #[test]
    fn accounts_of_other_users_are_not_found() {
        let connection = must_create_test_connection();
        let alice = must_create_test_user("alice@example.com", &connection);
        let bob = must_create_test_user("bob@example.com", &connection);
        let id = must_create_account("Everyday", AccountType::Bank, 10.0, &alice, &connection);

        assert!(get_account(&id, &alice, &connection).is_ok());
        assert_eq!(get_account(&id, &bob, &connection), Err(Error::NotFound));
    }

    #[test]
    fn list_filters_by_type_and_keyword() {
        let connection = must_create_test_connection();
        let user_id = must_create_test_user("alice@example.com", &connection);
        must_create_account("Everyday", AccountType::Bank, 10.0, &user_id, &connection);
        must_create_account("Savings", AccountType::Bank, 20.0, &user_id, &connection);
        must_create_account("Wallet", AccountType::Cash, 5.0, &user_id, &connection);

        let banks = list_accounts(
            &user_id,
            &AccountFilter {
                account_type: Some(AccountType::Bank),
                ..Default::default()
            },
            None,
            &connection,
        )
        .unwrap();
        assert_eq!(banks.items.len(), 2);

        let savings = list_accounts(
            &user_id,
            &AccountFilter {
                keyword: Some("sav".to_owned()),
                ..Default::default()
            },
            None,
            &connection,
        )
        .unwrap();
        assert_eq!(savings.items.len(), 1);
        assert_eq!(savings.items[0].name, "Savings");
    }

    #[test]
    fn total_balance_sums_only_own_accounts() {
        let connection = must_create_test_connection();
        let alice = must_create_test_user("alice@example.com", &connection);
        let bob = must_create_test_user("bob@example.com", &connection);
        must_create_account("Everyday", AccountType::Bank, 10.5, &alice, &connection);
        must_create_account("Wallet", AccountType::Cash, 4.5, &alice, &connection);
        must_create_account("Bob's", AccountType::Bank, 100.0, &bob, &connection);

        assert_eq!(get_total_account_balance(&alice, &connection), Ok(15.0));
    }

    #[test]
    fn total_balance_is_zero_without_accounts() {
        let connection = must_create_test_connection();
        let user_id = must_create_test_user("alice@example.com", &connection);

        assert_eq!(get_total_account_balance(&user_id, &connection), Ok(0.0));
    }
}
