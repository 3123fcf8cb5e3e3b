//! SmeraldoCoin Core Library
//!
//! Reward policy, per-account ledger and activity records for the
//! SmeraldoCoin mining service.

pub mod account;
pub mod activity;
pub mod constants;
pub mod policy;
pub mod wallet;

// Re-export main types
pub use account::{Account, AccountId, Grant, NewAccount, PassiveEligibility, Role};
pub use activity::{Activity, ActivityId, ActivityKind, NewActivity};
pub use policy::{PolicyViolation, RewardPolicy};
pub use wallet::{WalletAddress, WalletError};
