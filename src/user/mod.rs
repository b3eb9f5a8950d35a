//! Users of the application and the endpoints for managing them.

mod core;
mod create_endpoint;
mod endpoints;

pub use core::{
    NewUser, USER_SORT_FIELDS, User, UserId, UserUpdate, UserWithRole, count_users, create_user,
    create_user_table, delete_user, get_user_by_email, get_user_with_role,
    list_users, set_user_password, update_user, user_exists,
};
pub use create_endpoint::create_user_endpoint;
pub use endpoints::{
    UserState, delete_user_endpoint, edit_user_endpoint, get_user_endpoint, list_users_endpoint,
};
