//! Roles that can be given to users, e.g. "System Admin".

mod core;
mod endpoints;

pub use core::{
    NewRole, ROLE_COLUMNS, ROLE_SORT_FIELDS, Role, RoleUpdate, count_roles, create_role,
    create_role_table, delete_role, get_role, list_roles, map_row_to_role, update_role,
};
pub use endpoints::{
    create_role_endpoint, delete_role_endpoint, edit_role_endpoint, get_role_endpoint,
    list_roles_endpoint,
};
