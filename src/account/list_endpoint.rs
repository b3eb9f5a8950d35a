//! The endpoints for listing accounts and getting a single account.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::{
        Account, AccountType,
        core::{ACCOUNT_SORT_FIELDS, AccountFilter, get_account, list_accounts},
    },
    db::lock_connection,
    extract::QueryParams,
    list_filter::Sort,
    pagination::{PageRequest, PaginationConfig},
    response::{DataResponse, data, listing},
    user::UserId,
};

/// The state needed to list accounts.
#[derive(Debug, Clone)]
pub struct AccountsState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The default page and page size.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for AccountsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct AccountListParams {
    sort: Option<String>,
    keyword: Option<String>,
    /// An account type code, or "all".
    #[serde(rename = "type")]
    account_type: Option<String>,
    page: Option<u64>,
    limit: Option<u64>,
}

fn parse_type_filter(raw: Option<&str>) -> Result<Option<AccountType>, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) if raw.eq_ignore_ascii_case("all") => Ok(None),
        Some(raw) => AccountType::from_code(raw)
            .map(Some)
            .ok_or_else(|| Error::InvalidRequest(format!("unknown account type \"{raw}\""))),
    }
}

/// List the acting user's accounts.
pub async fn list_accounts_endpoint(
    State(state): State<AccountsState>,
    Extension(user_id): Extension<UserId>,
    QueryParams(params): QueryParams<AccountListParams>,
) -> Result<Json<DataResponse<Vec<Account>>>, Error> {
    let filter = AccountFilter {
        keyword: params.keyword,
        account_type: parse_type_filter(params.account_type.as_deref())?,
        sort: Sort::parse_optional(params.sort.as_deref(), ACCOUNT_SORT_FIELDS)?,
    };
    let page = PageRequest::optional(params.page, params.limit, &state.pagination_config)?;

    let connection = lock_connection(&state.db_connection)?;

    list_accounts(&user_id, &filter, page, &connection).map(listing)
}

/// Get one of the acting user's accounts.
pub async fn get_account_endpoint(
    State(state): State<AccountsState>,
    Extension(user_id): Extension<UserId>,
    Path(account_id): Path<String>,
) -> Result<Json<DataResponse<Account>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_account(&account_id, &user_id, &connection).map(data)
}
