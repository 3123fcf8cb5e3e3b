//! Account endpoints: registration, current user, wallet

use crate::auth::CurrentUser;
use crate::blocking::run_blocking;
use crate::{ApiResult, ApiState};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use smeraldo_core::Account;
use smeraldo_mining::Registration;

/// Register account routes
pub fn user_routes() -> Router<ApiState> {
    Router::new()
        .route("/register", post(register))
        .route("/user", get(current_user))
        .route("/user/wallet", put(update_wallet))
}

async fn register(
    State(state): State<ApiState>,
    Json(registration): Json<Registration>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let account = run_blocking(move || state.registry.register(registration, Utc::now())).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

async fn current_user(
    State(state): State<ApiState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<Account>> {
    ok_json!(run_blocking(move || state.mining.account(user_id)).await?)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WalletRequest {
    #[serde(default)]
    wallet_address: Option<String>,
}

async fn update_wallet(
    State(state): State<ApiState>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<WalletRequest>,
) -> ApiResult<Json<Account>> {
    let address = request.wallet_address.unwrap_or_default();
    let outcome =
        run_blocking(move || state.mining.connect_wallet(user_id, &address, Utc::now())).await?;
    ok_json!(outcome.account)
}
