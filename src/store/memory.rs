//! In-memory ledger backend
//!
//! Backs tests and dev mode (no `postgres_url` configured). Wallets live in
//! a DashMap; the per-entry shard lock plus the wallet version check make
//! `commit_transaction` an isolated read-check-write unit, so two concurrent
//! debits can never both apply against a stale balance.

use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;

use super::LedgerStore;
use crate::error::LedgerError;
use crate::models::{
    MarketplaceItem, MarketplacePurchase, NewMarketplaceItem, NewMarketplacePurchase,
    NewTransaction, Transaction, Wallet,
};
use async_trait::async_trait;

#[derive(Default)]
pub struct MemoryStore {
    wallets: DashMap<String, Wallet>,
    // Append-only; lock order is always wallet entry -> log
    transactions: RwLock<Vec<Transaction>>,
    items: DashMap<i64, MarketplaceItem>,
    purchases: RwLock<Vec<MarketplacePurchase>>,
    wallet_seq: AtomicI64,
    tx_seq: AtomicI64,
    item_seq: AtomicI64,
    purchase_seq: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(seq: &AtomicI64) -> i64 {
        seq.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn get_wallet(&self, user_id: &str) -> Result<Option<Wallet>, LedgerError> {
        Ok(self.wallets.get(user_id).map(|w| w.value().clone()))
    }

    async fn create_wallet(&self, user_id: &str) -> Result<Wallet, LedgerError> {
        let wallet = self
            .wallets
            .entry(user_id.to_string())
            .or_insert_with(|| {
                let now = Utc::now();
                Wallet {
                    id: Self::next(&self.wallet_seq),
                    user_id: user_id.to_string(),
                    balance: Decimal::new(0, crate::money::SCALE),
                    version: 0,
                    created_at: now,
                    updated_at: now,
                }
            })
            .clone();
        Ok(wallet)
    }

    async fn set_balance(
        &self,
        user_id: &str,
        new_balance: Decimal,
    ) -> Result<Wallet, LedgerError> {
        let new_balance = crate::money::validate_balance(new_balance)?;
        let mut entry = self
            .wallets
            .get_mut(user_id)
            .ok_or_else(|| LedgerError::WalletNotFound(user_id.to_string()))?;
        entry.balance = new_balance;
        entry.version += 1;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn commit_transaction(
        &self,
        expected_version: i64,
        new_balance: Decimal,
        tx: NewTransaction,
    ) -> Result<Transaction, LedgerError> {
        let mut entry = self
            .wallets
            .get_mut(&tx.user_id)
            .ok_or_else(|| LedgerError::WalletNotFound(tx.user_id.clone()))?;

        if entry.version != expected_version {
            return Err(LedgerError::BalanceConflict);
        }

        entry.balance = new_balance;
        entry.version += 1;
        entry.updated_at = Utc::now();

        // Append while still holding the wallet entry: balance write and
        // history append become visible together
        let record = Transaction {
            id: Self::next(&self.tx_seq),
            user_id: tx.user_id,
            wallet_id: entry.id,
            kind: tx.kind,
            category: tx.category,
            description: tx.description,
            amount: tx.amount,
            status: tx.status,
            metadata: tx.metadata,
            created_at: Utc::now(),
        };
        self.transactions.write().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_transactions(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let log = self.transactions.read().unwrap();
        let mut result: Vec<Transaction> = log
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        result.truncate(limit.max(0) as usize);
        Ok(result)
    }

    async fn create_item(
        &self,
        item: NewMarketplaceItem,
    ) -> Result<MarketplaceItem, LedgerError> {
        let now = Utc::now();
        let record = MarketplaceItem {
            id: Self::next(&self.item_seq),
            seller_id: item.seller_id,
            title: item.title,
            description: item.description,
            category: item.category,
            price: item.price,
            digital_content: item.digital_content,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.items.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_active_item(&self, id: i64) -> Result<Option<MarketplaceItem>, LedgerError> {
        Ok(self
            .items
            .get(&id)
            .filter(|i| i.is_active)
            .map(|i| i.value().clone()))
    }

    async fn list_active_items(&self, limit: i64) -> Result<Vec<MarketplaceItem>, LedgerError> {
        let mut result: Vec<MarketplaceItem> = self
            .items
            .iter()
            .filter(|i| i.is_active)
            .map(|i| i.value().clone())
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        result.truncate(limit.max(0) as usize);
        Ok(result)
    }

    async fn list_items_by_seller(
        &self,
        seller_id: &str,
    ) -> Result<Vec<MarketplaceItem>, LedgerError> {
        let mut result: Vec<MarketplaceItem> = self
            .items
            .iter()
            .filter(|i| i.seller_id == seller_id)
            .map(|i| i.value().clone())
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(result)
    }

    async fn deactivate_item(&self, id: i64, seller_id: &str) -> Result<(), LedgerError> {
        let mut entry = self.items.get_mut(&id).ok_or(LedgerError::ItemNotFound(id))?;
        if entry.seller_id != seller_id {
            return Err(LedgerError::ItemNotFound(id));
        }
        entry.is_active = false;
        entry.updated_at = Utc::now();
        Ok(())
    }

    async fn create_purchase(
        &self,
        purchase: NewMarketplacePurchase,
    ) -> Result<MarketplacePurchase, LedgerError> {
        let record = MarketplacePurchase {
            id: Self::next(&self.purchase_seq),
            buyer_id: purchase.buyer_id,
            seller_id: purchase.seller_id,
            item_id: purchase.item_id,
            amount: purchase.amount,
            status: purchase.status,
            transaction_id: purchase.transaction_id,
            created_at: Utc::now(),
        };
        self.purchases.write().unwrap().push(record.clone());
        Ok(record)
    }

    async fn health_check(&self) -> Result<(), LedgerError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TransactionKind, TransactionStatus};
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn debit(user_id: &str, wallet_id: i64, amount: &str) -> NewTransaction {
        NewTransaction {
            user_id: user_id.to_string(),
            wallet_id,
            kind: TransactionKind::Payment,
            category: "test".to_string(),
            description: "test debit".to_string(),
            amount: d(amount),
            status: TransactionStatus::Completed,
            metadata: None,
        }
    }

    #[tokio::test]
    async fn test_create_wallet_idempotent() {
        let store = MemoryStore::new();
        let w1 = store.create_wallet("u1").await.unwrap();
        assert_eq!(w1.balance, d("0.00"));

        store.set_balance("u1", d("50.00")).await.unwrap();
        let w2 = store.create_wallet("u1").await.unwrap();
        assert_eq!(w2.id, w1.id);
        assert_eq!(w2.balance, d("50.00"));
    }

    #[tokio::test]
    async fn test_set_balance_requires_wallet() {
        let store = MemoryStore::new();
        let res = store.set_balance("ghost", d("10.00")).await;
        assert!(matches!(res, Err(LedgerError::WalletNotFound(_))));
    }

    #[tokio::test]
    async fn test_set_balance_rejects_invalid_values() {
        let store = MemoryStore::new();
        store.create_wallet("u1").await.unwrap();
        store.set_balance("u1", d("50.00")).await.unwrap();

        let res = store.set_balance("u1", d("-5.00")).await;
        assert!(matches!(res, Err(LedgerError::InvalidAmount(_))));

        let res = store.set_balance("u1", d("1.234")).await;
        assert!(matches!(res, Err(LedgerError::InvalidAmount(_))));

        // Rejected writes leave balance and version untouched
        let w = store.get_wallet("u1").await.unwrap().unwrap();
        assert_eq!(w.balance, d("50.00"));
        assert_eq!(w.version, 1);
    }

    #[tokio::test]
    async fn test_commit_rejects_stale_version() {
        let store = MemoryStore::new();
        let wallet = store.create_wallet("u1").await.unwrap();
        store.set_balance("u1", d("100.00")).await.unwrap();

        // wallet.version is stale now
        let res = store
            .commit_transaction(wallet.version, d("70.00"), debit("u1", wallet.id, "30.00"))
            .await;
        assert!(matches!(res, Err(LedgerError::BalanceConflict)));

        // Nothing was written
        let w = store.get_wallet("u1").await.unwrap().unwrap();
        assert_eq!(w.balance, d("100.00"));
        assert!(store.list_transactions("u1", 50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_writes_balance_and_record_together() {
        let store = MemoryStore::new();
        let wallet = store.create_wallet("u1").await.unwrap();
        let w = store.set_balance("u1", d("100.00")).await.unwrap();

        let rec = store
            .commit_transaction(w.version, d("70.00"), debit("u1", wallet.id, "30.00"))
            .await
            .unwrap();
        assert_eq!(rec.amount, d("30.00"));

        let w = store.get_wallet("u1").await.unwrap().unwrap();
        assert_eq!(w.balance, d("70.00"));
        assert_eq!(w.version, 2);

        let history = store.list_transactions("u1", 50).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, rec.id);
    }

    #[tokio::test]
    async fn test_list_transactions_newest_first() {
        let store = MemoryStore::new();
        let wallet = store.create_wallet("u1").await.unwrap();
        let mut balance = d("0.00");
        let mut version = wallet.version;
        for _ in 0..5 {
            balance += d("10.00");
            let mut rec = debit("u1", wallet.id, "10.00");
            rec.kind = TransactionKind::Received;
            store
                .commit_transaction(version, balance, rec)
                .await
                .unwrap();
            version += 1;
        }

        let history = store.list_transactions("u1", 3).await.unwrap();
        assert_eq!(history.len(), 3);
        // Same-timestamp ties are broken by id descending
        assert!(history[0].id > history[1].id);
        assert!(history[1].id > history[2].id);

        // Idempotent read
        let again = store.list_transactions("u1", 3).await.unwrap();
        let ids: Vec<i64> = history.iter().map(|t| t.id).collect();
        let ids_again: Vec<i64> = again.iter().map(|t| t.id).collect();
        assert_eq!(ids, ids_again);
    }

    #[tokio::test]
    async fn test_deactivated_item_reads_as_absent() {
        let store = MemoryStore::new();
        let item = store
            .create_item(NewMarketplaceItem {
                seller_id: "s1".to_string(),
                title: "Ebook".to_string(),
                description: None,
                category: "books".to_string(),
                price: d("200.00"),
                digital_content: None,
            })
            .await
            .unwrap();

        assert!(store.get_active_item(item.id).await.unwrap().is_some());

        // Only the seller may deactivate
        let res = store.deactivate_item(item.id, "someone-else").await;
        assert!(matches!(res, Err(LedgerError::ItemNotFound(_))));

        store.deactivate_item(item.id, "s1").await.unwrap();
        assert!(store.get_active_item(item.id).await.unwrap().is_none());
        assert!(store.list_active_items(20).await.unwrap().is_empty());
        // Still visible to its seller (soft delete)
        assert_eq!(store.list_items_by_seller("s1").await.unwrap().len(), 1);
    }
}
