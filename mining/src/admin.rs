//! Administrator reports: aggregate statistics, user listing and CSV export

use crate::error::{MiningError, Result};
use serde::Serialize;
use smeraldo_core::{Account, AccountId};
use smeraldo_storage::Store;
use std::sync::Arc;
use tracing::{info, warn};

pub const EXPORT_HEADER: &str = "Username,Wallet Address,Total Coins";
pub const NO_WALLET: &str = "Not connected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: u64,
    pub total_coins: u64,
    /// Floor of the mean balance; 0 when there are no users
    pub average_coins: u64,
}

#[derive(Clone)]
pub struct AdminReports {
    store: Arc<dyn Store>,
}

impl AdminReports {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Resolve the caller and require the stored admin role
    pub fn authorize(&self, caller: AccountId) -> Result<Account> {
        let account = self
            .store
            .get_account(caller)?
            .ok_or(MiningError::NotFound(caller))?;
        if !account.is_admin() {
            warn!(user_id = caller, "admin_access_denied");
            return Err(MiningError::Forbidden(caller));
        }
        Ok(account)
    }

    pub fn stats(&self) -> Result<AdminStats> {
        let accounts = self.store.list_accounts()?;
        let total_users = accounts.len() as u64;
        let total_coins = accounts
            .iter()
            .fold(0u64, |sum, a| sum.saturating_add(a.total_coins));
        let average_coins = if total_users == 0 {
            0
        } else {
            total_coins / total_users
        };
        Ok(AdminStats {
            total_users,
            total_coins,
            average_coins,
        })
    }

    pub fn users(&self) -> Result<Vec<Account>> {
        Ok(self.store.list_accounts()?)
    }

    pub fn export_csv(&self) -> Result<String> {
        let accounts = self.store.list_accounts()?;
        let mut out = String::with_capacity(64 * (accounts.len() + 1));
        out.push_str(EXPORT_HEADER);
        out.push('\n');
        for account in &accounts {
            let wallet = account
                .wallet_address
                .as_ref()
                .map(|w| w.as_str())
                .unwrap_or(NO_WALLET);
            out.push_str(&csv_field(&account.username));
            out.push(',');
            out.push_str(wallet);
            out.push(',');
            out.push_str(&account.total_coins.to_string());
            out.push('\n');
        }
        info!(rows = accounts.len(), "users_exported");
        Ok(out)
    }
}

/// Quote a field when it contains a separator, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use smeraldo_core::{NewAccount, Role, WalletAddress};
    use smeraldo_storage::MemoryStore;

    fn seed(store: &Arc<dyn Store>, username: &str, role: Role, coins: u64) -> Account {
        let mut account = store
            .create_account(NewAccount {
                username: username.into(),
                email: format!("{}@x.io", username.replace(',', "")),
                wallet_address: None,
                role,
                created_at: Utc::now(),
            })
            .unwrap();
        account.total_coins = coins;
        store.update_account(&account).unwrap();
        account
    }

    #[test]
    fn test_stats_floor_average() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let reports = AdminReports::new(store.clone());
        assert_eq!(
            reports.stats().unwrap(),
            AdminStats {
                total_users: 0,
                total_coins: 0,
                average_coins: 0
            }
        );

        seed(&store, "a", Role::User, 10);
        seed(&store, "b", Role::User, 5);
        let stats = reports.stats().unwrap();
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_coins, 15);
        assert_eq!(stats.average_coins, 7);
    }

    #[test]
    fn test_authorize_uses_stored_role() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let reports = AdminReports::new(store.clone());
        let admin = seed(&store, "boss", Role::Admin, 0);
        let impostor = seed(&store, "admin", Role::User, 0);

        assert!(reports.authorize(admin.id).is_ok());
        assert!(matches!(
            reports.authorize(impostor.id),
            Err(MiningError::Forbidden(_))
        ));
        assert!(matches!(reports.authorize(99), Err(MiningError::NotFound(99))));
    }

    #[test]
    fn test_export_rows() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let mut alice = seed(&store, "alice", Role::User, 120);
        alice.wallet_address =
            Some(WalletAddress::parse("0x52908400098527886E0F7030069857D2E4169EE7").unwrap());
        store.update_account(&alice).unwrap();
        seed(&store, "bob,jr", Role::User, 3);

        let csv = AdminReports::new(store).export_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], EXPORT_HEADER);
        assert_eq!(lines[1], "alice,0x52908400098527886E0F7030069857D2E4169EE7,120");
        assert_eq!(lines[2], "\"bob,jr\",Not connected,3");
    }
}
