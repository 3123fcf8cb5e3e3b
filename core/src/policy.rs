//! Reward policy
//!
//! Accrual rates and caps, fixed for the lifetime of the process. The
//! defaults come from [`crate::constants`]; a node may override them once
//! at startup from its configuration file.

use crate::constants;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a grant was refused. No state is changed when one of these is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyViolation {
    #[error("Maximum clicks for today reached")]
    MaxClicks,

    #[error("Maximum daily coin limit reached")]
    MaxDailyCoins,
}

impl PolicyViolation {
    /// Machine-readable reason code exposed to clients
    pub fn reason_code(&self) -> &'static str {
        match self {
            PolicyViolation::MaxClicks => "MAX_CLICKS",
            PolicyViolation::MaxDailyCoins => "MAX_DAILY_COINS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardPolicy {
    pub passive_per_hour: u64,
    pub per_click: u64,
    pub max_clicks_per_day: u32,
    pub max_coins_per_day: u64,
    pub coin_value_eur: f64,
}

impl RewardPolicy {
    /// Minimum time between two passive rewards
    pub fn passive_interval(&self) -> Duration {
        Duration::seconds(constants::PASSIVE_INTERVAL_SECS)
    }

    /// Whether `today` coins plus `amount` would stay within the daily cap
    pub fn fits_daily_cap(&self, today: u64, amount: u64) -> bool {
        today
            .checked_add(amount)
            .map(|total| total <= self.max_coins_per_day)
            .unwrap_or(false)
    }
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            passive_per_hour: constants::PASSIVE_PER_HOUR,
            per_click: constants::PER_CLICK,
            max_clicks_per_day: constants::MAX_CLICKS_PER_DAY,
            max_coins_per_day: constants::MAX_COINS_PER_DAY,
            coin_value_eur: constants::COIN_VALUE_EUR,
        }
    }
}
