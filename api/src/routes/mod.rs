//! API routes organization
//!
//! Routes are grouped by domain, each submodule exporting a router:
//! - `mining` - click claims, passive checks, daily reset, activity history
//! - `coin` - coin valuation and branding
//! - `user` - registration, current account, wallet
//! - `admin` - statistics, user listing, CSV export

mod admin;
mod coin;
mod mining;
mod user;

use crate::ApiState;
use axum::{routing::get, Json, Router};
use serde::Serialize;

/// Create the main router with all API endpoints
pub fn create_routes() -> Router<ApiState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(mining::mining_routes())
        .merge(user::user_routes())
        .nest("/coin", coin::coin_routes())
        .nest("/admin", admin::admin_routes())
}

async fn root() -> &'static str {
    "SmeraldoCoin API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
