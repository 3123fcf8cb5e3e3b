//! SmeraldoCoin HTTP API
//!
//! JSON surface over the mining service. Caller identity arrives from an
//! upstream gateway in the `x-user-id` header.

#[macro_use]
mod response;

mod auth;
mod blocking;
mod error;
mod routes;
mod state;

pub use auth::{CurrentUser, USER_ID_HEADER};
pub use error::{ApiError, ApiResult};
pub use state::ApiState;

use axum::{
    http::{header::CONTENT_TYPE, HeaderName, Method},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Build the application router with CORS and request tracing
pub fn create_app(state: ApiState, cors_permissive: bool) -> Router {
    let cors = if cors_permissive {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT])
            .allow_headers([CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)])
    };

    routes::create_routes()
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_server(
    addr: SocketAddr,
    state: ApiState,
    cors_permissive: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_app(state, cors_permissive);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "api_listening");

    axum::serve(listener, app).await?;

    Ok(())
}
