//! Account registration and admin seeding
//!
//! Privilege is an explicit role chosen at creation time. Registration
//! always creates `Role::User`; only the node's configured admin seed gets
//! `Role::Admin`.

use crate::error::{MiningError, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use smeraldo_core::{Account, NewAccount, Role, WalletAddress};
use smeraldo_storage::Store;
use std::sync::Arc;
use tracing::{info, warn};

/// Absent fields deserialize as empty and are rejected as missing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub wallet_address: Option<String>,
}

#[derive(Clone)]
pub struct AccountRegistry {
    store: Arc<dyn Store>,
}

impl AccountRegistry {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn register(&self, registration: Registration, now: DateTime<Utc>) -> Result<Account> {
        self.create(registration, Role::User, now)
    }

    /// Create the admin account unless one with that username already exists.
    /// An existing non-admin account with the same name is left as it is.
    pub fn ensure_admin(&self, username: &str, email: &str, now: DateTime<Utc>) -> Result<Account> {
        if let Some(existing) = self.store.find_by_username(username)? {
            if !existing.is_admin() {
                warn!(
                    user_id = existing.id,
                    username = %existing.username,
                    "admin_seed_name_taken_by_regular_user"
                );
            }
            return Ok(existing);
        }

        let account = self.create(
            Registration {
                username: username.to_string(),
                email: email.to_string(),
                wallet_address: None,
            },
            Role::Admin,
            now,
        )?;
        info!(user_id = account.id, username = %account.username, "admin_account_created");
        Ok(account)
    }

    fn create(&self, registration: Registration, role: Role, now: DateTime<Utc>) -> Result<Account> {
        let username = registration.username.trim();
        let email = registration.email.trim();
        if username.is_empty() {
            return Err(MiningError::MissingField("username"));
        }
        if email.is_empty() {
            return Err(MiningError::MissingField("email"));
        }

        let wallet_address = registration
            .wallet_address
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(WalletAddress::parse)
            .transpose()?;

        if self.store.find_by_username(username)?.is_some() {
            return Err(MiningError::Conflict("Username already exists".to_string()));
        }
        if self.store.find_by_email(email)?.is_some() {
            return Err(MiningError::Conflict("Email already exists".to_string()));
        }

        // The store re-checks uniqueness atomically; a racing duplicate
        // surfaces as the same Conflict through the StorageError mapping.
        let account = self.store.create_account(NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            wallet_address,
            role,
            created_at: now,
        })?;

        info!(user_id = account.id, username = %account.username, "account_registered");
        Ok(account)
    }
}
