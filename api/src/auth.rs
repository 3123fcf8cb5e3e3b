//! Caller identity
//!
//! Authentication happens upstream. The gateway forwards the authenticated
//! account id in the `x-user-id` header; anything else is a 401.

use crate::ApiError;
use axum::{extract::FromRequestParts, http::request::Parts};
use smeraldo_core::AccountId;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub AccountId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

        raw.to_str()
            .ok()
            .and_then(|value| value.trim().parse::<AccountId>().ok())
            .map(CurrentUser)
            .ok_or_else(|| ApiError::Unauthorized("Malformed user id".to_string()))
    }
}
