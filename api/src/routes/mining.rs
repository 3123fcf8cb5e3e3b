//! Mining endpoints: click claims, passive accrual, daily reset, history

use crate::auth::CurrentUser;
use crate::blocking::run_blocking;
use crate::{ApiResult, ApiState};
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smeraldo_core::{constants::DEFAULT_ACTIVITY_LIMIT, Account, Activity, PolicyViolation};
use smeraldo_mining::{whole_seconds_ceil, PassiveOutcome};

/// Register mining routes
pub fn mining_routes() -> Router<ApiState> {
    Router::new()
        .route("/claim/click", post(claim_click))
        .route("/mining/passive", get(check_passive))
        .route("/mining/reset-day", post(reset_day))
        .route("/mining/activities", get(get_activities))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClickResponse {
    user: Account,
    reward: u64,
    clicks_remaining: u32,
}

async fn claim_click(
    State(state): State<ApiState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<ClickResponse>> {
    let outcome = run_blocking(move || state.mining.claim_click(user_id, Utc::now())).await?;
    ok_json!(ClickResponse {
        user: outcome.account,
        reward: outcome.reward,
        clicks_remaining: outcome.clicks_remaining,
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PassiveGranted {
    user: Account,
    reward: u64,
    next_reward_time: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PassiveBlocked {
    user: Account,
    next_reward_time: Option<DateTime<Utc>>,
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PassivePending {
    user: Account,
    next_reward_time: DateTime<Utc>,
    time_remaining_seconds: i64,
}

#[derive(Serialize)]
#[serde(untagged)]
enum PassiveResponse {
    Granted(PassiveGranted),
    Blocked(PassiveBlocked),
    Pending(PassivePending),
}

impl From<PassiveOutcome> for PassiveResponse {
    fn from(outcome: PassiveOutcome) -> Self {
        match outcome {
            PassiveOutcome::Granted {
                account,
                reward,
                next_reward_time,
            } => PassiveResponse::Granted(PassiveGranted {
                user: account,
                reward,
                next_reward_time,
            }),
            PassiveOutcome::Blocked { account } => PassiveResponse::Blocked(PassiveBlocked {
                user: account,
                next_reward_time: None,
                message: PolicyViolation::MaxDailyCoins.to_string(),
            }),
            PassiveOutcome::Pending {
                account,
                next_reward_time,
                remaining,
            } => PassiveResponse::Pending(PassivePending {
                user: account,
                next_reward_time,
                time_remaining_seconds: whole_seconds_ceil(remaining),
            }),
        }
    }
}

async fn check_passive(
    State(state): State<ApiState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<PassiveResponse>> {
    let outcome = run_blocking(move || state.mining.check_passive(user_id, Utc::now())).await?;
    ok_json!(PassiveResponse::from(outcome))
}

#[derive(Serialize)]
struct ResetResponse {
    user: Account,
    reset: bool,
}

async fn reset_day(
    State(state): State<ApiState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<ResetResponse>> {
    let outcome =
        run_blocking(move || state.mining.ensure_daily_reset(user_id, Utc::now())).await?;
    ok_json!(ResetResponse {
        user: outcome.account,
        reset: outcome.reset,
    })
}

#[derive(Deserialize)]
struct ActivitiesQuery {
    limit: Option<usize>,
}

async fn get_activities(
    State(state): State<ApiState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<ActivitiesQuery>,
) -> ApiResult<Json<Vec<Activity>>> {
    let limit = query.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT);
    ok_json!(run_blocking(move || state.mining.recent_activities(user_id, limit)).await?)
}
