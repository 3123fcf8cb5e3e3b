//! Coin value growth tiers
//!
//! The value of one coin is a step function of the number of registered
//! users. Each tier covers user counts up to and including its threshold.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TierError {
    #[error("Tier table must contain at least one tier")]
    Empty,

    #[error("Tier thresholds must be strictly ascending (at index {0})")]
    NotAscending(usize),

    #[error("Tier value must be positive (at index {0})")]
    NonPositiveValue(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// Highest user count covered by this tier
    #[serde(rename = "upTo")]
    pub up_to: u64,
    pub value: f64,
}

/// Next milestone above the current user count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NextTier {
    pub users: u64,
    pub value: f64,
    /// Increase over the current tier value, rounded to a whole percent
    pub percentage: i64,
}

/// Growth tiers used by the live service
pub const VALUE_GROWTH_TIERS: [Tier; 7] = [
    Tier { up_to: 1_000, value: 0.00001 },
    Tier { up_to: 2_000, value: 0.000012 },
    Tier { up_to: 5_000, value: 0.000016 },
    Tier { up_to: 10_000, value: 0.000025 },
    Tier { up_to: 20_000, value: 0.000042 },
    Tier { up_to: 50_000, value: 0.00010 },
    Tier { up_to: 100_000, value: 0.00025 },
];

/// Validated, non-empty tier table in ascending threshold order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl TierTable {
    pub fn new(tiers: Vec<Tier>) -> Result<Self, TierError> {
        if tiers.is_empty() {
            return Err(TierError::Empty);
        }
        for (i, tier) in tiers.iter().enumerate() {
            if !(tier.value > 0.0) {
                return Err(TierError::NonPositiveValue(i));
            }
            if i > 0 && tier.up_to <= tiers[i - 1].up_to {
                return Err(TierError::NotAscending(i));
            }
        }
        Ok(Self { tiers })
    }

    /// The table in [`VALUE_GROWTH_TIERS`]
    pub fn standard() -> Self {
        Self {
            tiers: VALUE_GROWTH_TIERS.to_vec(),
        }
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    fn last(&self) -> &Tier {
        // Non-empty by construction
        &self.tiers[self.tiers.len() - 1]
    }

    /// Value of the smallest threshold >= `users`, or the top tier's value
    /// once every threshold is exceeded.
    pub fn value_for_user_count(&self, users: u64) -> f64 {
        self.tiers
            .iter()
            .find(|tier| users <= tier.up_to)
            .unwrap_or_else(|| self.last())
            .value
    }

    /// Smallest threshold strictly above `users`, or `None` at the top.
    pub fn next_tier(&self, users: u64) -> Option<NextTier> {
        let index = self.tiers.iter().position(|tier| users < tier.up_to)?;
        let next = self.tiers[index];
        let current_value = if index > 0 {
            self.tiers[index - 1].value
        } else {
            next.value
        };
        let increase = (next.value - current_value) / current_value * 100.0;

        Some(NextTier {
            users: next.up_to,
            value: next.value,
            percentage: increase.round() as i64,
        })
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::standard()
    }
}
