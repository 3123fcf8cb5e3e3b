//! SmeraldoCoin mining service
//!
//! Orchestrates reward claims against the store: per-account locking,
//! daily resets, activity logging, registration, valuation and admin
//! reports.

pub mod activity_log;
pub mod admin;
pub mod error;
pub mod locks;
pub mod registry;
pub mod service;
pub mod valuation;

pub use activity_log::ActivityLog;
pub use admin::{AdminReports, AdminStats};
pub use error::{MiningError, Result};
pub use locks::AccountLocks;
pub use registry::{AccountRegistry, Registration};
pub use service::{
    whole_seconds_ceil, ClickOutcome, MiningService, PassiveOutcome, ResetOutcome, WalletOutcome,
};
pub use valuation::{CoinValuation, CoinValue};
