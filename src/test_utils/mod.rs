#![allow(missing_docs)]

pub(crate) mod http;

pub(crate) use http::parse_json_body;

use axum_test::TestServer;
use rusqlite::Connection;

use crate::{
    AppState, PaginationConfig, PasswordHash, build_router, initialize_db,
    user::{NewUser, UserId, create_user},
};

/// The bcrypt cost used in tests. Any higher and the tests crawl.
pub(crate) const TEST_PASSWORD_COST: u32 = 4;

/// The header that names the acting user.
pub(crate) const USER_HEADER: &str = crate::acting_user::USER_ID_HEADER;

#[track_caller]
pub(crate) fn must_create_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("could not create in-memory SQLite database");
    initialize_db(&connection).expect("could not initialize test DB");

    connection
}

#[track_caller]
pub(crate) fn must_create_test_user(email: &str, connection: &Connection) -> UserId {
    create_user(
        NewUser {
            name: "Test User".to_owned(),
            email: email.to_owned(),
            password: Some(PasswordHash::new_unchecked("hunter2")),
            role_id: None,
            system_admin: false,
        },
        connection,
    )
    .expect("could not create test user")
    .id
}

/// A test server for the full router along with a user to act as.
pub(crate) struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub user_id: UserId,
}

#[track_caller]
pub(crate) fn must_create_test_app() -> TestApp {
    let connection =
        Connection::open_in_memory().expect("could not create in-memory SQLite database");
    let state = AppState::new(
        connection,
        "Etc/UTC",
        PaginationConfig::default(),
        TEST_PASSWORD_COST,
    )
    .expect("could not create app state");

    let user_id = {
        let connection = state.db_connection.lock().expect("could not lock database");
        must_create_test_user("test@example.com", &connection)
    };

    let server =
        TestServer::try_new(build_router(state.clone())).expect("Could not create test server.");

    TestApp {
        server,
        state,
        user_id,
    }
}
