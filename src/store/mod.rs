//! Ledger Store
//!
//! Durable access to wallets, the append-only transaction history, and the
//! marketplace tables. Two backends implement the same seam:
//! - [`MemoryStore`]: DashMap-backed, used by tests and dev mode
//! - [`PgStore`]: PostgreSQL via sqlx, row-level locking
//!
//! The atomic unit is [`LedgerStore::commit_transaction`]: one balance write
//! plus one history append, both-or-neither, guarded by the wallet version.
//! All writes are durable before the call returns; nothing retries
//! internally, failures propagate to the caller.

pub mod memory;
pub mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use crate::error::LedgerError;
use crate::models::{
    MarketplaceItem, MarketplacePurchase, NewMarketplaceItem, NewMarketplacePurchase,
    NewTransaction, Transaction, Wallet,
};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Default page size for transaction history reads
pub const DEFAULT_TX_LIMIT: i64 = 50;

#[async_trait]
pub trait LedgerStore: Send + Sync {
    // === Wallets ===

    /// Current wallet for a user, or None if never provisioned
    async fn get_wallet(&self, user_id: &str) -> Result<Option<Wallet>, LedgerError>;

    /// Provision a wallet at 0.00. Idempotent: returns the existing wallet
    /// unchanged if one is already there.
    async fn create_wallet(&self, user_id: &str) -> Result<Wallet, LedgerError>;

    /// Administrative balance override. Bumps the wallet version so any
    /// in-flight optimistic commit fails instead of clobbering this write.
    /// Fails with `WalletNotFound` if the wallet does not exist, and with
    /// `InvalidAmount` if the value is negative or carries more than 2
    /// fraction digits. The non-negativity invariant holds on this path too.
    async fn set_balance(&self, user_id: &str, new_balance: Decimal)
    -> Result<Wallet, LedgerError>;

    // === Transactions ===

    /// Atomically write the new balance and append the transaction record.
    ///
    /// Fails with `BalanceConflict` (and writes nothing) when the wallet
    /// version no longer matches `expected_version`; callers re-read and
    /// re-validate before retrying.
    async fn commit_transaction(
        &self,
        expected_version: i64,
        new_balance: Decimal,
        tx: NewTransaction,
    ) -> Result<Transaction, LedgerError>;

    /// Transaction history, newest first (ties broken by id descending)
    async fn list_transactions(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<Transaction>, LedgerError>;

    // === Marketplace ===

    async fn create_item(&self, item: NewMarketplaceItem)
    -> Result<MarketplaceItem, LedgerError>;

    /// Item by id, only while active; deactivated items read as absent
    async fn get_active_item(&self, id: i64) -> Result<Option<MarketplaceItem>, LedgerError>;

    async fn list_active_items(&self, limit: i64) -> Result<Vec<MarketplaceItem>, LedgerError>;

    async fn list_items_by_seller(
        &self,
        seller_id: &str,
    ) -> Result<Vec<MarketplaceItem>, LedgerError>;

    /// Soft-deactivate a listing; only the seller may do this
    async fn deactivate_item(&self, id: i64, seller_id: &str) -> Result<(), LedgerError>;

    async fn create_purchase(
        &self,
        purchase: NewMarketplacePurchase,
    ) -> Result<MarketplacePurchase, LedgerError>;

    // === Health ===

    async fn health_check(&self) -> Result<(), LedgerError>;
}
