//! In-memory store

use crate::{index_key, Result, StorageError, Store};
use parking_lot::RwLock;
use smeraldo_core::activity::sort_newest_first;
use smeraldo_core::{Account, AccountId, Activity, NewAccount, NewActivity};
use std::collections::{BTreeMap, HashMap};

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<AccountId, Account>,
    usernames: HashMap<String, AccountId>,
    emails: HashMap<String, AccountId>,
    activities: Vec<Activity>,
    last_account_id: AccountId,
    last_activity_id: u64,
}

/// Store that keeps everything in process memory. Contents are lost on exit.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
        Ok(self.tables.read().accounts.get(&id).cloned())
    }

    fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        let tables = self.tables.read();
        Ok(tables
            .usernames
            .get(&index_key(username))
            .and_then(|id| tables.accounts.get(id))
            .cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let tables = self.tables.read();
        Ok(tables
            .emails
            .get(&index_key(email))
            .and_then(|id| tables.accounts.get(id))
            .cloned())
    }

    fn create_account(&self, new: NewAccount) -> Result<Account> {
        let mut tables = self.tables.write();

        let username_key = index_key(&new.username);
        let email_key = index_key(&new.email);
        if tables.usernames.contains_key(&username_key) {
            return Err(StorageError::UsernameTaken(new.username));
        }
        if tables.emails.contains_key(&email_key) {
            return Err(StorageError::EmailTaken(new.email));
        }

        tables.last_account_id += 1;
        let id = tables.last_account_id;
        let account = Account::new(id, new);

        tables.usernames.insert(username_key, id);
        tables.emails.insert(email_key, id);
        tables.accounts.insert(id, account.clone());

        Ok(account)
    }

    fn update_account(&self, account: &Account) -> Result<()> {
        let mut tables = self.tables.write();

        let stored = tables
            .accounts
            .get_mut(&account.id)
            .ok_or(StorageError::AccountNotFound(account.id))?;
        if stored.username != account.username || stored.email != account.email {
            return Err(StorageError::IdentityChanged(account.id));
        }

        *stored = account.clone();
        Ok(())
    }

    fn list_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.tables.read().accounts.values().cloned().collect())
    }

    fn count_accounts(&self) -> Result<u64> {
        Ok(self.tables.read().accounts.len() as u64)
    }

    fn append_activity(&self, new: NewActivity) -> Result<Activity> {
        let mut tables = self.tables.write();

        if !tables.accounts.contains_key(&new.user_id) {
            return Err(StorageError::AccountNotFound(new.user_id));
        }

        tables.last_activity_id += 1;
        let activity = Activity::new(tables.last_activity_id, new);
        tables.activities.push(activity.clone());

        Ok(activity)
    }

    fn recent_activities(&self, user_id: AccountId, limit: usize) -> Result<Vec<Activity>> {
        let mut activities: Vec<Activity> = self
            .tables
            .read()
            .activities
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();

        sort_newest_first(&mut activities);
        activities.truncate(limit);
        Ok(activities)
    }
}
