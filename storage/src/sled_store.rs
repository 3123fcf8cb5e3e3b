//! Sled-based persistence for accounts and activities
//!
//! Trees:
//! - `accounts`:   id (big-endian u64) -> bincode `Account`
//! - `usernames`:  lowercased username -> id
//! - `emails`:     lowercased email -> id
//! - `activities`: user id ++ activity id (both big-endian) -> bincode `Activity`
//!
//! The activity key layout keeps one user's activities contiguous, so a
//! prefix scan returns them without touching anyone else's.

use crate::{index_key, Result, StorageError, Store};
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::Transactional;
use smeraldo_core::activity::sort_newest_first;
use smeraldo_core::{Account, AccountId, Activity, NewAccount, NewActivity};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct SledStore {
    db: sled::Db,
    accounts: sled::Tree,
    usernames: sled::Tree,
    emails: sled::Tree,
    activities: sled::Tree,
}

fn id_key(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

fn activity_key(user_id: AccountId, activity_id: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(16);
    key.extend_from_slice(&id_key(user_id));
    key.extend_from_slice(&id_key(activity_id));
    key
}

fn decode_id(bytes: &[u8]) -> Result<AccountId> {
    let raw: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StorageError::Serialization(format!("Bad id length: {}", bytes.len())))?;
    Ok(u64::from_be_bytes(raw))
}

impl SledStore {
    /// Open or create the database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(&path)
            .map_err(|e| StorageError::Backend(format!("Failed to open database: {}", e)))?;

        Ok(Self {
            accounts: db.open_tree("accounts")?,
            usernames: db.open_tree("usernames")?,
            emails: db.open_tree("emails")?,
            activities: db.open_tree("activities")?,
            db,
        })
    }

    fn lookup(&self, index: &sled::Tree, value: &str) -> Result<Option<Account>> {
        match index.get(index_key(value).as_bytes())? {
            Some(id) => self.get_account(decode_id(&id)?),
            None => Ok(None),
        }
    }

    /// Flush to disk so a write survives a crash right after it returns
    fn flush(&self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| StorageError::Backend(format!("Failed to flush to disk: {}", e)))?;
        Ok(())
    }

    fn next_id(&self) -> Result<u64> {
        // generate_id starts at 0; ids are 1-based everywhere else
        Ok(self.db.generate_id()? + 1)
    }
}

impl Store for SledStore {
    fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
        match self.accounts.get(id_key(id))? {
            Some(data) => Ok(Some(bincode::deserialize(&data)?)),
            None => Ok(None),
        }
    }

    fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        self.lookup(&self.usernames, username)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        self.lookup(&self.emails, email)
    }

    fn create_account(&self, new: NewAccount) -> Result<Account> {
        let id = self.next_id()?;
        let username_key = index_key(&new.username);
        let email_key = index_key(&new.email);
        let account = Account::new(id, new);
        let record = bincode::serialize(&account)?;
        let id_bytes = id_key(id).to_vec();

        let outcome = (&self.accounts, &self.usernames, &self.emails).transaction(
            |(accounts, usernames, emails)| {
                if usernames.get(username_key.as_bytes())?.is_some() {
                    return Err(ConflictableTransactionError::Abort(
                        StorageError::UsernameTaken(account.username.clone()),
                    ));
                }
                if emails.get(email_key.as_bytes())?.is_some() {
                    return Err(ConflictableTransactionError::Abort(
                        StorageError::EmailTaken(account.email.clone()),
                    ));
                }

                accounts.insert(id_bytes.clone(), record.clone())?;
                usernames.insert(username_key.as_bytes(), id_bytes.clone())?;
                emails.insert(email_key.as_bytes(), id_bytes.clone())?;
                Ok(())
            },
        );

        match outcome {
            Ok(()) => {}
            Err(TransactionError::Abort(e)) => return Err(e),
            Err(TransactionError::Storage(e)) => {
                warn!(error = %e, "account_insert_failed");
                return Err(e.into());
            }
        }

        self.flush()?;
        debug!(user_id = id, "account_created");
        Ok(account)
    }

    fn update_account(&self, account: &Account) -> Result<()> {
        let stored = self
            .get_account(account.id)?
            .ok_or(StorageError::AccountNotFound(account.id))?;
        if stored.username != account.username || stored.email != account.email {
            return Err(StorageError::IdentityChanged(account.id));
        }

        self.accounts
            .insert(id_key(account.id), bincode::serialize(account)?)?;
        self.flush()
    }

    fn list_accounts(&self) -> Result<Vec<Account>> {
        self.accounts
            .iter()
            .values()
            .map(|data| Ok(bincode::deserialize(&data?)?))
            .collect()
    }

    fn count_accounts(&self) -> Result<u64> {
        Ok(self.accounts.len() as u64)
    }

    fn append_activity(&self, new: NewActivity) -> Result<Activity> {
        if !self.accounts.contains_key(id_key(new.user_id))? {
            return Err(StorageError::AccountNotFound(new.user_id));
        }

        let activity = Activity::new(self.next_id()?, new);
        self.activities.insert(
            activity_key(activity.user_id, activity.id),
            bincode::serialize(&activity)?,
        )?;
        self.flush()?;

        Ok(activity)
    }

    fn recent_activities(&self, user_id: AccountId, limit: usize) -> Result<Vec<Activity>> {
        let mut activities = self
            .activities
            .scan_prefix(id_key(user_id))
            .values()
            .map(|data| Ok(bincode::deserialize(&data?)?))
            .collect::<Result<Vec<Activity>>>()?;

        sort_newest_first(&mut activities);
        activities.truncate(limit);
        Ok(activities)
    }
}
