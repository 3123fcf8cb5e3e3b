//! Account ledger
//!
//! One record per registered user. Counters only change through the
//! transitions below; every grant adds to `total_coins` and to exactly one
//! of `passive_coins` / `click_coins`, so the two always sum to the total.
//!
//! Each grant is a single unit: daily reset if needed, then preconditions
//! against the post-reset counters, then the mutation. A rejected grant
//! leaves every grant field untouched.

use crate::policy::{PolicyViolation, RewardPolicy};
use crate::wallet::WalletAddress;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub type AccountId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub wallet_address: Option<WalletAddress>,
    pub role: Role,
    pub total_coins: u64,
    pub today_coins: u64,
    pub passive_coins: u64,
    pub click_coins: u64,
    pub clicks_today: u32,
    pub last_hourly_reward: Option<DateTime<Utc>>,
    pub last_click_time: Option<DateTime<Utc>>,
    pub last_day_reset: Option<DateTime<Utc>>,
}

/// Fields supplied when creating an account; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub wallet_address: Option<WalletAddress>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Result of an accepted grant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    pub amount: u64,
}

/// Passive reward timing relative to `now`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassiveEligibility {
    Eligible,
    /// Not yet; the remaining wait is attached
    Wait(Duration),
}

impl Account {
    pub fn new(id: AccountId, new: NewAccount) -> Self {
        Self {
            id,
            username: new.username,
            email: new.email,
            wallet_address: new.wallet_address,
            role: new.role,
            total_coins: 0,
            today_coins: 0,
            passive_coins: 0,
            click_coins: 0,
            clicks_today: 0,
            last_hourly_reward: None,
            last_click_time: None,
            last_day_reset: Some(new.created_at),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Zero the daily counters if `now` falls on a different UTC day than
    /// the last reset. Returns whether a reset happened.
    pub fn reset_daily_if_needed(&mut self, now: DateTime<Utc>) -> bool {
        let same_day = self
            .last_day_reset
            .map(|last| last.date_naive() == now.date_naive())
            .unwrap_or(false);

        if same_day {
            return false;
        }

        debug!(
            user_id = self.id,
            today_coins = self.today_coins,
            clicks_today = self.clicks_today,
            "daily_counters_reset"
        );
        self.today_coins = 0;
        self.clicks_today = 0;
        self.last_day_reset = Some(now);
        true
    }

    pub fn clicks_remaining(&self, policy: &RewardPolicy) -> u32 {
        policy.max_clicks_per_day.saturating_sub(self.clicks_today)
    }

    /// Check the click preconditions against the current counters
    pub fn check_click(&self, policy: &RewardPolicy) -> Result<(), PolicyViolation> {
        if self.clicks_today >= policy.max_clicks_per_day {
            return Err(PolicyViolation::MaxClicks);
        }
        if !policy.fits_daily_cap(self.today_coins, policy.per_click) {
            return Err(PolicyViolation::MaxDailyCoins);
        }
        Ok(())
    }

    /// Reset if needed, then grant one click reward
    pub fn grant_click(
        &mut self,
        policy: &RewardPolicy,
        now: DateTime<Utc>,
    ) -> Result<Grant, PolicyViolation> {
        self.reset_daily_if_needed(now);
        self.check_click(policy)?;

        let amount = policy.per_click;
        self.total_coins += amount;
        self.today_coins += amount;
        self.click_coins += amount;
        self.clicks_today += 1;
        self.last_click_time = Some(now);

        Ok(Grant { amount })
    }

    pub fn passive_eligibility(
        &self,
        policy: &RewardPolicy,
        now: DateTime<Utc>,
    ) -> PassiveEligibility {
        match self.last_hourly_reward {
            None => PassiveEligibility::Eligible,
            Some(last) => {
                let elapsed = now - last;
                let interval = policy.passive_interval();
                if elapsed >= interval {
                    PassiveEligibility::Eligible
                } else {
                    PassiveEligibility::Wait(interval - elapsed)
                }
            }
        }
    }

    /// Reset if needed, then grant one passive reward. Eligibility is the
    /// caller's concern; a cap rejection leaves `last_hourly_reward` alone so
    /// the same boundary is retried on the next check.
    pub fn grant_passive(
        &mut self,
        policy: &RewardPolicy,
        now: DateTime<Utc>,
    ) -> Result<Grant, PolicyViolation> {
        self.reset_daily_if_needed(now);

        let amount = policy.passive_per_hour;
        if !policy.fits_daily_cap(self.today_coins, amount) {
            return Err(PolicyViolation::MaxDailyCoins);
        }

        self.total_coins += amount;
        self.today_coins += amount;
        self.passive_coins += amount;
        self.last_hourly_reward = Some(now);

        Ok(Grant { amount })
    }

    /// Set the wallet. Returns true when the account had no wallet before.
    pub fn set_wallet(&mut self, address: WalletAddress) -> bool {
        let first = self.wallet_address.is_none();
        self.wallet_address = Some(address);
        first
    }
}
