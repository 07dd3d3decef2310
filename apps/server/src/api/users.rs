//! User API endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use user_store::{NewUser, User, UserStore};

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Request body for the upsert endpoint. Fields default to empty so a
/// missing field is reported by the presence check, not a decode failure.
#[derive(Debug, Deserialize)]
pub struct UpsertUserRequest {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl UpsertUserRequest {
    /// Presence check; runs before any database access.
    fn validate(&self) -> Result<(), ServerError> {
        for (field, value) in [
            ("uid", &self.uid),
            ("name", &self.name),
            ("email", &self.email),
        ] {
            if value.trim().is_empty() {
                return Err(ServerError::InvalidRequest(format!("{field} is required")));
            }
        }
        Ok(())
    }
}

/// Upserts a user: inserts a new row, or updates `name` and `email` on the
/// existing row with the same `uid`. Returns the resulting row.
pub async fn upsert_user<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<UpsertUserRequest>,
) -> ServerResult<Json<User>> {
    request.validate()?;

    let user = state
        .store
        .upsert_user(NewUser::new(request.uid, request.name, request.email))
        .await?;

    tracing::info!(uid = %user.uid, "User upserted");

    Ok(Json(user))
}

/// Gets a user by external identifier.
pub async fn get_user<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(uid): Path<String>,
) -> ServerResult<Json<User>> {
    let user = state
        .store
        .get_user(&uid)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("user {uid} not found")))?;

    Ok(Json(user))
}

/// Lists all users.
pub async fn list_users<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<Vec<User>>> {
    let users = state.store.list_users().await?;

    Ok(Json(users))
}
