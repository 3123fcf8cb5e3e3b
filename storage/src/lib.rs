//! SmeraldoCoin Storage Layer
//!
//! One capability, two backends:
//! - [`MemoryStore`]: maps behind a lock, used for tests and throwaway nodes
//! - [`SledStore`]: embedded sled database, bincode-encoded records
//!
//! Usernames and emails are indexed case-insensitively. Activities are
//! append-only; there is no way to update or delete one.

pub mod memory;
pub mod sled_store;

pub use memory::MemoryStore;
pub use sled_store::SledStore;

use smeraldo_core::{Account, AccountId, Activity, NewAccount, NewActivity};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("Email already exists: {0}")]
    EmailTaken(String),

    #[error("Username and email cannot change (account {0})")]
    IdentityChanged(AccountId),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<sled::Error> for StorageError {
    fn from(e: sled::Error) -> Self {
        StorageError::Backend(e.to_string())
    }
}

impl From<bincode::Error> for StorageError {
    fn from(e: bincode::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Record store used by the mining service.
///
/// Implementations make each call atomic on its own. Read-modify-write
/// sequences on one account must be serialized by the caller.
pub trait Store: Send + Sync {
    fn get_account(&self, id: AccountId) -> Result<Option<Account>>;

    /// Case-insensitive lookup; surrounding whitespace is ignored
    fn find_by_username(&self, username: &str) -> Result<Option<Account>>;

    /// Case-insensitive lookup; surrounding whitespace is ignored
    fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Insert a new account with a fresh id. Fails if the username or email
    /// is already taken.
    fn create_account(&self, new: NewAccount) -> Result<Account>;

    /// Replace the stored record. Username and email must match the stored ones.
    fn update_account(&self, account: &Account) -> Result<()>;

    fn list_accounts(&self) -> Result<Vec<Account>>;

    fn count_accounts(&self) -> Result<u64>;

    fn append_activity(&self, new: NewActivity) -> Result<Activity>;

    /// Activities of one user, newest first, at most `limit` of them
    fn recent_activities(&self, user_id: AccountId, limit: usize) -> Result<Vec<Activity>>;
}

/// Key used by the unique username/email indexes
pub(crate) fn index_key(value: &str) -> String {
    value.trim().to_lowercase()
}
