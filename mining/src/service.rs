//! Accrual orchestrator
//!
//! Turns one claim (click, passive check, day sync, wallet update) into a
//! single locked read-modify-write on the caller's account, then records
//! the matching activity. Nothing here blocks or waits for eligibility;
//! callers poll using the returned next-reward time.

use crate::activity_log::ActivityLog;
use crate::error::{MiningError, Result};
use crate::locks::AccountLocks;
use chrono::{DateTime, Duration, Utc};
use smeraldo_core::{
    Account, AccountId, Activity, ActivityKind, PassiveEligibility, RewardPolicy, WalletAddress,
};
use smeraldo_storage::Store;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct ClickOutcome {
    pub account: Account,
    pub reward: u64,
    pub clicks_remaining: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PassiveOutcome {
    Granted {
        account: Account,
        reward: u64,
        next_reward_time: DateTime<Utc>,
    },
    /// Eligible, but the daily coin cap refused the grant
    Blocked { account: Account },
    /// Not eligible yet
    Pending {
        account: Account,
        next_reward_time: DateTime<Utc>,
        remaining: Duration,
    },
}

impl PassiveOutcome {
    pub fn account(&self) -> &Account {
        match self {
            PassiveOutcome::Granted { account, .. }
            | PassiveOutcome::Blocked { account }
            | PassiveOutcome::Pending { account, .. } => account,
        }
    }
}

/// Remaining wait rounded up to whole seconds
pub fn whole_seconds_ceil(remaining: Duration) -> i64 {
    let millis = remaining.num_milliseconds().max(0);
    (millis + 999) / 1000
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResetOutcome {
    pub account: Account,
    pub reset: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalletOutcome {
    pub account: Account,
    /// True when the account had no wallet before this call
    pub first_connection: bool,
}

pub struct MiningService {
    store: Arc<dyn Store>,
    policy: RewardPolicy,
    locks: AccountLocks,
    log: ActivityLog,
}

impl MiningService {
    pub fn new(store: Arc<dyn Store>, policy: RewardPolicy) -> Self {
        Self {
            log: ActivityLog::new(store.clone()),
            locks: AccountLocks::new(),
            store,
            policy,
        }
    }

    pub fn account(&self, user_id: AccountId) -> Result<Account> {
        self.store
            .get_account(user_id)?
            .ok_or(MiningError::NotFound(user_id))
    }

    pub fn recent_activities(&self, user_id: AccountId, limit: usize) -> Result<Vec<Activity>> {
        self.log.recent_for_user(user_id, limit)
    }

    /// Load the account and apply the daily reset. Must be called with the
    /// account lock held. The reset is persisted right away, independent of
    /// whatever the caller does next.
    fn load_synced(&self, user_id: AccountId, now: DateTime<Utc>) -> Result<(Account, bool)> {
        let mut account = self.account(user_id)?;
        let reset = account.reset_daily_if_needed(now);
        if reset {
            self.store.update_account(&account)?;
            info!(user_id, "daily_counters_reset");
        }
        Ok((account, reset))
    }

    pub fn claim_click(&self, user_id: AccountId, now: DateTime<Utc>) -> Result<ClickOutcome> {
        let lock = self.locks.handle(user_id);
        let _guard = lock.lock();

        let (mut account, _) = self.load_synced(user_id, now)?;
        let grant = account.grant_click(&self.policy, now).map_err(|violation| {
            debug!(user_id, reason = violation.reason_code(), "click_rejected");
            violation
        })?;

        self.store.update_account(&account)?;
        self.log
            .append(user_id, ActivityKind::Click, Some(grant.amount), now)?;

        let clicks_remaining = account.clicks_remaining(&self.policy);
        info!(user_id, reward = grant.amount, clicks_remaining, "click_reward_granted");

        Ok(ClickOutcome {
            account,
            reward: grant.amount,
            clicks_remaining,
        })
    }

    pub fn check_passive(&self, user_id: AccountId, now: DateTime<Utc>) -> Result<PassiveOutcome> {
        let lock = self.locks.handle(user_id);
        let _guard = lock.lock();

        let (mut account, _) = self.load_synced(user_id, now)?;

        if let PassiveEligibility::Wait(remaining) = account.passive_eligibility(&self.policy, now) {
            return Ok(PassiveOutcome::Pending {
                account,
                next_reward_time: now + remaining,
                remaining,
            });
        }

        match account.grant_passive(&self.policy, now) {
            Ok(grant) => {
                self.store.update_account(&account)?;
                self.log
                    .append(user_id, ActivityKind::Passive, Some(grant.amount), now)?;
                info!(user_id, reward = grant.amount, "passive_reward_granted");

                Ok(PassiveOutcome::Granted {
                    account,
                    reward: grant.amount,
                    next_reward_time: now + self.policy.passive_interval(),
                })
            }
            Err(violation) => {
                debug!(user_id, reason = violation.reason_code(), "passive_reward_blocked");
                Ok(PassiveOutcome::Blocked { account })
            }
        }
    }

    /// Sync the daily counters without granting anything
    pub fn ensure_daily_reset(&self, user_id: AccountId, now: DateTime<Utc>) -> Result<ResetOutcome> {
        let lock = self.locks.handle(user_id);
        let _guard = lock.lock();

        let (account, reset) = self.load_synced(user_id, now)?;
        Ok(ResetOutcome { account, reset })
    }

    /// Validate and store a wallet address. The first connection is logged.
    pub fn connect_wallet(
        &self,
        user_id: AccountId,
        raw_address: &str,
        now: DateTime<Utc>,
    ) -> Result<WalletOutcome> {
        let address = WalletAddress::parse(raw_address)?;

        let lock = self.locks.handle(user_id);
        let _guard = lock.lock();

        let mut account = self.account(user_id)?;
        let first_connection = account.set_wallet(address);
        self.store.update_account(&account)?;

        if first_connection {
            self.log
                .append(user_id, ActivityKind::WalletConnected, Some(0), now)?;
        }
        info!(user_id, first_connection, "wallet_updated");

        Ok(WalletOutcome {
            account,
            first_connection,
        })
    }
}
