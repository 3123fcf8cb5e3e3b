//! Administrator endpoints
//!
//! Every handler first checks the caller's stored role.

use crate::auth::CurrentUser;
use crate::blocking::run_blocking;
use crate::{ApiResult, ApiState};
use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use smeraldo_core::Account;
use smeraldo_mining::AdminStats;

const EXPORT_FILENAME: &str = "users-export.csv";

/// Register admin routes
pub fn admin_routes() -> Router<ApiState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/users", get(list_users))
        .route("/export", get(export_users))
}

async fn get_stats(
    State(state): State<ApiState>,
    CurrentUser(caller): CurrentUser,
) -> ApiResult<Json<AdminStats>> {
    ok_json!(
        run_blocking(move || {
            state.admin.authorize(caller)?;
            state.admin.stats()
        })
        .await?
    )
}

async fn list_users(
    State(state): State<ApiState>,
    CurrentUser(caller): CurrentUser,
) -> ApiResult<Json<Vec<Account>>> {
    ok_json!(
        run_blocking(move || {
            state.admin.authorize(caller)?;
            state.admin.users()
        })
        .await?
    )
}

async fn export_users(
    State(state): State<ApiState>,
    CurrentUser(caller): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    let csv = run_blocking(move || {
        state.admin.authorize(caller)?;
        state.admin.export_csv()
    })
    .await?;
    let disposition = format!("attachment; filename={}", EXPORT_FILENAME);
    Ok((
        [(CONTENT_TYPE, "text/csv".to_string()), (CONTENT_DISPOSITION, disposition)],
        csv,
    ))
}
