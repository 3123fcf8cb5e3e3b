//! Wallet address validation

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Length of the hex payload after the `0x` prefix
const ADDRESS_HEX_LEN: usize = 40;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Wallet address is required")]
    Missing,

    #[error("Invalid wallet address format: {0}")]
    InvalidFormat(String),
}

impl WalletError {
    pub fn reason_code(&self) -> &'static str {
        match self {
            WalletError::Missing => "MISSING_FIELD",
            WalletError::InvalidFormat(_) => "INVALID_FORMAT",
        }
    }
}

/// An address of the form `0x` followed by 40 hex digits (either case).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn parse(input: &str) -> Result<Self, WalletError> {
        if input.is_empty() {
            return Err(WalletError::Missing);
        }

        let payload = input
            .strip_prefix("0x")
            .filter(|rest| rest.len() == ADDRESS_HEX_LEN)
            .ok_or_else(|| WalletError::InvalidFormat(input.to_string()))?;

        hex::decode(payload).map_err(|_| WalletError::InvalidFormat(input.to_string()))?;

        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = WalletError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(address: WalletAddress) -> Self {
        address.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
