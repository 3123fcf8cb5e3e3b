//! Coin valuation snapshot

use crate::error::Result;
use economics::{NextTier, Tier, TierTable, COIN_NAME};
use serde::Serialize;
use smeraldo_storage::Store;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinValue {
    pub name: &'static str,
    pub total_users: u64,
    pub current_value: f64,
    pub next_tier: Option<NextTier>,
    pub all_tiers: Vec<Tier>,
}

#[derive(Clone)]
pub struct CoinValuation {
    store: Arc<dyn Store>,
    tiers: TierTable,
}

impl CoinValuation {
    pub fn new(store: Arc<dyn Store>, tiers: TierTable) -> Self {
        Self { store, tiers }
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    /// Value of one coin at the current registered user count
    pub fn current(&self) -> Result<CoinValue> {
        let total_users = self.store.count_accounts()?;
        Ok(CoinValue {
            name: COIN_NAME,
            total_users,
            current_value: self.tiers.value_for_user_count(total_users),
            next_tier: self.tiers.next_tier(total_users),
            all_tiers: self.tiers.tiers().to_vec(),
        })
    }
}
