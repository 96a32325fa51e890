//! Ledger Error Types
//!
//! All errors surfaced by the ledger core. Error codes are stable strings
//! used in API responses; HTTP status mapping lives next to them so the
//! gateway cannot drift from the core.

use crate::money::AmountError;
use thiserror::Error;

/// Ledger error types
#[derive(Error, Debug, Clone)]
pub enum LedgerError {
    #[error("Wallet not found for user {0}")]
    WalletNotFound(String),

    #[error("Marketplace item not found or inactive: {0}")]
    ItemNotFound(i64),

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Wallet balance changed concurrently")]
    BalanceConflict,

    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl LedgerError {
    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::WalletNotFound(_) => "WALLET_NOT_FOUND",
            LedgerError::ItemNotFound(_) => "ITEM_NOT_FOUND",
            LedgerError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            LedgerError::InvalidAmount(_) => "INVALID_AMOUNT",
            LedgerError::BalanceConflict => "BALANCE_CONFLICT",
            LedgerError::Persistence(_) => "PERSISTENCE_FAILURE",
        }
    }

    /// HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            LedgerError::WalletNotFound(_) | LedgerError::ItemNotFound(_) => 404,
            LedgerError::InsufficientFunds => 422,
            LedgerError::InvalidAmount(_) => 400,
            LedgerError::BalanceConflict => 409,
            LedgerError::Persistence(_) => 500,
        }
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::Persistence(e.to_string())
    }
}

impl From<AmountError> for LedgerError {
    fn from(e: AmountError) -> Self {
        LedgerError::InvalidAmount(e.to_string())
    }
}
