//! Coin valuation and branding endpoints

use crate::blocking::run_blocking;
use crate::{ApiResult, ApiState};
use axum::{extract::State, routing::get, Json, Router};
use economics::COIN_LOGO_URL;
use serde::Serialize;
use smeraldo_mining::CoinValue;

/// Register coin routes
pub fn coin_routes() -> Router<ApiState> {
    Router::new()
        .route("/value", get(get_coin_value))
        .route("/logo", get(get_coin_logo))
}

async fn get_coin_value(State(state): State<ApiState>) -> ApiResult<Json<CoinValue>> {
    ok_json!(run_blocking(move || state.valuation.current()).await?)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LogoResponse {
    logo_url: &'static str,
}

async fn get_coin_logo() -> Json<LogoResponse> {
    Json(LogoResponse {
        logo_url: COIN_LOGO_URL,
    })
}
