//! Kwanza Wallet - Mobile Wallet Transactional Ledger
//!
//! Balance-enforced wallets, an append-only transaction history, and
//! marketplace settlement with a 5% platform commission.
//!
//! # Modules
//!
//! - [`money`] - Kz amount validation and commission arithmetic
//! - [`models`] - Wallets, transactions, marketplace items and purchases
//! - [`error`] - Ledger error types with stable codes
//! - [`store`] - Ledger Store trait plus in-memory and PostgreSQL backends
//! - [`recorder`] - Transaction Recorder (the single money-movement path)
//! - [`settlement`] - Marketplace Settlement saga with compensation
//! - [`notify`] - Post-commit notification dispatch
//! - [`gateway`] - Axum HTTP API with OpenAPI docs

pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod money;
pub mod notify;
pub mod recorder;
pub mod settlement;
pub mod store;

// Convenient re-exports at crate root
pub use error::LedgerError;
pub use models::{
    MarketplaceItem, MarketplacePurchase, Transaction, TransactionKind, TransactionStatus, Wallet,
};
pub use recorder::{TransactionInput, TransactionRecorder};
pub use settlement::{SettlementOutcome, SettlementService};
pub use store::{LedgerStore, MemoryStore, PgStore};
