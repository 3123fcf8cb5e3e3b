//! SmeraldoCoin Economics Module
//!
//! Implements the coin valuation model:
//! - Growth tiers keyed by registered user count
//! - Next-milestone lookup for display

pub mod tiers;

pub use tiers::{NextTier, Tier, TierError, TierTable, VALUE_GROWTH_TIERS};

/// Display name of the coin
pub const COIN_NAME: &str = "SmeraldoCoin";

/// Public path of the coin logo
pub const COIN_LOGO_URL: &str = "/api/static/smeraldo-coin-logo.png";
