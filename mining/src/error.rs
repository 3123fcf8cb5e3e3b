//! Mining service error types

use smeraldo_core::{AccountId, PolicyViolation, WalletError};
use smeraldo_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MiningError {
    #[error("User not found: {0}")]
    NotFound(AccountId),

    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Account {0} is not an administrator")]
    Forbidden(AccountId),

    #[error("Storage failure: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for MiningError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::AccountNotFound(id) => MiningError::NotFound(id),
            StorageError::UsernameTaken(_) => {
                MiningError::Conflict("Username already exists".to_string())
            }
            StorageError::EmailTaken(_) => MiningError::Conflict("Email already exists".to_string()),
            other => MiningError::Storage(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, MiningError>;
