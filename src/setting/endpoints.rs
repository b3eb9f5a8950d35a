use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    db::lock_connection,
    extract::JsonBody,
    response::{DataResponse, data, deleted},
    setting::{Setting, delete_setting, get_setting, list_settings, put_setting},
    user::UserId,
};

/// The state needed by the setting endpoints.
#[derive(Debug, Clone)]
pub struct SettingState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PutSettingRequest {
    value: String,
}

pub async fn list_settings_endpoint(
    State(state): State<SettingState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<DataResponse<Vec<Setting>>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    list_settings(&user_id, &connection).map(data)
}

pub async fn get_setting_endpoint(
    State(state): State<SettingState>,
    Extension(user_id): Extension<UserId>,
    Path(key): Path<String>,
) -> Result<Json<DataResponse<Setting>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_setting(&user_id, &key, &connection).map(data)
}

/// Create or replace the acting user's setting called `key`.
pub async fn put_setting_endpoint(
    State(state): State<SettingState>,
    Extension(user_id): Extension<UserId>,
    Path(key): Path<String>,
    JsonBody(request): JsonBody<PutSettingRequest>,
) -> Result<Json<DataResponse<Setting>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    put_setting(&user_id, &key, &request.value, &connection).map(data)
}

pub async fn delete_setting_endpoint(
    State(state): State<SettingState>,
    Extension(user_id): Extension<UserId>,
    Path(key): Path<String>,
) -> Result<Json<DataResponse<&'static str>>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_setting(&user_id, &key, &connection)?;

    Ok(deleted())
}
