//! Activity log: append-only history of grants and wallet connections

use crate::error::{MiningError, Result};
use chrono::{DateTime, Utc};
use smeraldo_core::{AccountId, Activity, ActivityKind, NewActivity};
use smeraldo_storage::Store;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct ActivityLog {
    store: Arc<dyn Store>,
}

impl ActivityLog {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Record one event. `amount` is `None` for non-monetary events.
    pub fn append(
        &self,
        user_id: AccountId,
        kind: ActivityKind,
        amount: Option<u64>,
        now: DateTime<Utc>,
    ) -> Result<Activity> {
        let activity = self.store.append_activity(NewActivity {
            user_id,
            kind,
            amount,
            created_at: now,
        })?;
        debug!(user_id, activity_id = activity.id, kind = %kind, "activity_recorded");
        Ok(activity)
    }

    /// Newest first, at most `limit` entries
    pub fn recent_for_user(&self, user_id: AccountId, limit: usize) -> Result<Vec<Activity>> {
        if self.store.get_account(user_id)?.is_none() {
            return Err(MiningError::NotFound(user_id));
        }
        Ok(self.store.recent_activities(user_id, limit)?)
    }
}
