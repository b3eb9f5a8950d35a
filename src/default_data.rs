//! Seeds the default roles and users, and the sample data used for trying out the app.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::{Connection, params};
use time::{Date, Duration};

use crate::{
    AppState, Error, PasswordHash,
    account::{AccountType, NewAccount, create_account},
    category::{CategoryName, CategoryType, NewCategory, create_categories},
    db::lock_connection,
    response::{DataResponse, data},
    role::count_roles,
    timestamp::Timestamp,
    transaction::{NewTransaction, TransactionKind, create_transaction},
    user::{UserId, count_users, user_exists},
};

/// The email of the default system administrator.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";

/// The email of the default regular user, who owns the sample data.
const DEFAULT_USER_EMAIL: &str = "johndoe@example.com";

const SYSTEM_ADMIN_ROLE_ID: &str = "f8d4c878-2831-40b1-a8d2-841d585fd2f9";
const USER_ROLE_ID: &str = "aed467ae-1c1c-4238-8064-96e7caf2757a";
const ADMIN_USER_ID: &str = "d514e754-652f-49e4-9a5d-fc0edf299dc9";
const DEFAULT_USER_ID: &str = "e07b6fef-2ab3-4344-891f-36bc068c2d85";

/// (id, name, code)
const DEFAULT_ROLES: [(&str, &str, &str); 2] = [
    (SYSTEM_ADMIN_ROLE_ID, "System Admin", "systemadmin"),
    (USER_ROLE_ID, "User", "user"),
];

struct DefaultUser {
    id: &'static str,
    role_id: &'static str,
    name: &'static str,
    email: &'static str,
    password: &'static str,
    system_admin: bool,
}

const DEFAULT_USERS: [DefaultUser; 2] = [
    DefaultUser {
        id: ADMIN_USER_ID,
        role_id: SYSTEM_ADMIN_ROLE_ID,
        name: "Admin Peniato",
        email: DEFAULT_ADMIN_EMAIL,
        password: "admin",
        system_admin: true,
    },
    DefaultUser {
        id: DEFAULT_USER_ID,
        role_id: USER_ROLE_ID,
        name: "John Doe",
        email: DEFAULT_USER_EMAIL,
        password: "johndoe",
        system_admin: false,
    },
];

/// Message sent after the default data was seeded.
pub const DEFAULT_DATA_MESSAGE: &str = "Successfully added default data";

/// Add the default roles if there are no roles, and the default users if there are no users.
///
/// Passwords are hashed with `password_cost`. Calling this on a seeded database does nothing.
///
/// # Errors
/// Returns an error if a password could not be hashed or there was an SQL error.
pub fn seed_default_data(connection: &Connection, password_cost: u32) -> Result<(), Error> {
    let passwords = hash_default_passwords(password_cost)?;

    insert_default_data(&passwords, connection)
}

/// Hash the passwords of [DEFAULT_USERS], in the same order.
fn hash_default_passwords(password_cost: u32) -> Result<[PasswordHash; 2], Error> {
    let [admin, user] = &DEFAULT_USERS;

    Ok([
        PasswordHash::from_raw_password(admin.password, password_cost)?,
        PasswordHash::from_raw_password(user.password, password_cost)?,
    ])
}

fn insert_default_data(
    passwords: &[PasswordHash; 2],
    connection: &Connection,
) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    if count_roles(&transaction)? == 0 {
        let now = Timestamp::now();

        for (id, name, code) in DEFAULT_ROLES {
            transaction.execute(
                "INSERT INTO role (id, name, code, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, name, code, now, now],
            )?;
        }

        tracing::info!("Default roles created");
    }

    if count_users(&transaction)? == 0 {
        let now = Timestamp::now();

        for (user, password) in DEFAULT_USERS.iter().zip(passwords) {
            // The role is left empty when the roles were seeded by someone else.
            transaction.execute(
                "INSERT INTO user (id, role_id, name, email, password, system_admin, created_at,
                    updated_at)
                VALUES (?1, (SELECT id FROM role WHERE id = ?2), ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    user.id,
                    user.role_id,
                    user.name,
                    user.email,
                    password.as_ref(),
                    user.system_admin,
                    now,
                    now,
                ],
            )?;
        }

        tracing::info!("Default users created");
    }

    transaction.commit()?;

    Ok(())
}

/// The state needed to seed the default data.
#[derive(Debug, Clone)]
pub struct DefaultDataState {
    /// The database connection for adding roles and users.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The bcrypt cost used when hashing the default passwords.
    pub password_cost: u32,
}

impl FromRef<AppState> for DefaultDataState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            password_cost: state.password_cost,
        }
    }
}

/// A route handler that seeds the default roles and users.
pub async fn default_data_endpoint(
    State(state): State<DefaultDataState>,
) -> Result<Json<DataResponse<&'static str>>, Error> {
    let passwords = hash_default_passwords(state.password_cost)?;
    let connection = lock_connection(&state.db_connection)?;

    insert_default_data(&passwords, &connection)?;

    Ok(data(DEFAULT_DATA_MESSAGE))
}

/// Give the default regular user some accounts, categories, incomes and expenses.
///
/// Transactions are dated in the months leading up to `today`, so the dashboard has something to
/// show. [seed_default_data] must be called first.
///
/// # Errors
/// Returns [Error::NotFound] if the default user does not exist, or an error if the data could not
/// be inserted.
pub fn seed_sample_data(connection: &Connection, today: Date) -> Result<(), Error> {
    let user_id = UserId::new(DEFAULT_USER_ID.to_owned());

    if !user_exists(&user_id, connection)? {
        return Err(Error::NotFound);
    }

    let transaction = connection.unchecked_transaction()?;

    let bank = create_account(
        NewAccount {
            name: "Everyday Bank".to_owned(),
            account_type: AccountType::Bank,
            balance: 5_000_000.0,
        },
        &user_id,
        &transaction,
    )?;
    create_account(
        NewAccount {
            name: "Wallet".to_owned(),
            account_type: AccountType::Cash,
            balance: 250_000.0,
        },
        &user_id,
        &transaction,
    )?;

    let categories = create_categories(
        [
            ("Salary", CategoryType::Income),
            ("Food", CategoryType::Expense),
            ("Transport", CategoryType::Expense),
            ("Gifts", CategoryType::General),
        ]
        .into_iter()
        .map(|(name, category_type)| NewCategory {
            name: CategoryName::new_unchecked(name),
            category_type,
        })
        .collect(),
        &transaction,
    )?;
    let [salary, food, transport, _gifts] = [0, 1, 2, 3].map(|i| categories[i].id.clone());

    for month in 0..6 {
        let date = today - Duration::days(30 * month);

        create_transaction(
            TransactionKind::Income,
            sample_transaction("Salary", 8_000_000.0, &salary, &bank.id, date, true),
            &user_id,
            &transaction,
        )?;
        create_transaction(
            TransactionKind::Expense,
            sample_transaction("Groceries", 1_250_000.0, &food, &bank.id, date, false),
            &user_id,
            &transaction,
        )?;
        create_transaction(
            TransactionKind::Expense,
            sample_transaction("Fuel", 300_000.0, &transport, &bank.id, date, false),
            &user_id,
            &transaction,
        )?;
    }

    transaction.commit()?;

    Ok(())
}

fn sample_transaction(
    title: &str,
    amount: f64,
    category_id: &str,
    account_id: &str,
    date: Date,
    recurring: bool,
) -> NewTransaction {
    NewTransaction {
        title: title.to_owned(),
        amount,
        description: String::new(),
        category_id: Some(category_id.to_owned()),
        account_id: Some(account_id.to_owned()),
        date,
        recurring,
    }
}
