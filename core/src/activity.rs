//! Activity records
//!
//! Append-only history of reward grants and wallet connections. Records are
//! never mutated once written.

use crate::account::AccountId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type ActivityId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    Passive,
    Click,
    WalletConnected,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivityKind::Passive => "PASSIVE",
            ActivityKind::Click => "CLICK",
            ActivityKind::WalletConnected => "WALLET_CONNECTED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub user_id: AccountId,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub amount: Option<u64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewActivity {
    pub user_id: AccountId,
    pub kind: ActivityKind,
    pub amount: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    pub fn new(id: ActivityId, new: NewActivity) -> Self {
        Self {
            id,
            user_id: new.user_id,
            kind: new.kind,
            amount: new.amount,
            created_at: new.created_at,
        }
    }
}

/// Most recent first; ties on `created_at` go to the higher id.
pub fn sort_newest_first(activities: &mut [Activity]) {
    activities.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
