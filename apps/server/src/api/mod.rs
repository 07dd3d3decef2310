//! API endpoints.

pub mod pages;
pub mod users;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;
use user_store::UserStore;

use crate::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router<S: UserStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        // Static form
        .route("/", get(pages::index))
        // User endpoints
        .route("/users", post(users::upsert_user).get(users::list_users))
        .route("/users/:uid", get(users::get_user))
        // Health check
        .route("/health", get(health_check))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
}

/// Health check endpoint. Degraded mode is still a running state, so this
/// reports database reachability without failing the request.
async fn health_check<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<HealthResponse> {
    let database = match state.store.ping().await {
        Ok(()) => "reachable",
        Err(_) => "unreachable",
    };

    Json(HealthResponse {
        status: "ok",
        database,
    })
}
