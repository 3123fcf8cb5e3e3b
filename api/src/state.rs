//! API State Management

use economics::TierTable;
use smeraldo_core::RewardPolicy;
use smeraldo_mining::{AccountRegistry, AdminReports, CoinValuation, MiningService};
use smeraldo_storage::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct ApiState {
    pub mining: Arc<MiningService>,
    pub registry: AccountRegistry,
    pub valuation: CoinValuation,
    pub admin: AdminReports,
}

impl ApiState {
    pub fn new(store: Arc<dyn Store>, policy: RewardPolicy, tiers: TierTable) -> Self {
        Self {
            mining: Arc::new(MiningService::new(store.clone(), policy)),
            registry: AccountRegistry::new(store.clone()),
            valuation: CoinValuation::new(store.clone(), tiers),
            admin: AdminReports::new(store),
        }
    }
}
