use crate::domain::account::AccountId;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Account {0} is not available")]
    AccountUnavailable(AccountId),
    #[error("Balance of account {0} isn't zero, can't close the account")]
    BalanceNotZero(AccountId),
    #[error("Not sufficient balance on account {0}")]
    InsufficientBalance(AccountId),
    #[error("Balance of account {0} would exceed the representable range")]
    BalanceOverflow(AccountId),
    #[error("Timed out after {0:?} waiting for the ledger lock")]
    LockTimeout(Duration),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
