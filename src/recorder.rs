//! Transaction Recorder
//!
//! The single write path for wallet money movement. Every recorded
//! transaction is one atomic unit: the balance moves and the history entry
//! appears together, or neither happens.
//!
//! Sign convention: `received` credits the wallet, every other kind debits.
//! A debit that would take the balance below zero is rejected with
//! `InsufficientFunds` and leaves no trace in the ledger.
//!
//! Concurrency: the recorder reads the wallet, computes the new balance, and
//! commits against the wallet version it read. A concurrent writer bumps the
//! version, the commit fails with `BalanceConflict`, and the recorder
//! re-reads and re-validates. Retries are bounded; exhaustion surfaces the
//! conflict to the caller.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::LedgerError;
use crate::models::{NewTransaction, Transaction, TransactionKind, TransactionStatus};
use crate::money;
use crate::notify::{NotificationEvent, Notifier};
use crate::store::LedgerStore;

/// Bounded optimistic retries before surfacing the conflict
const MAX_COMMIT_RETRIES: usize = 16;

/// Caller-supplied transaction fields; wallet linkage and validation happen
/// inside the recorder.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    pub user_id: String,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub metadata: Option<Value>,
}

#[derive(Clone)]
pub struct TransactionRecorder {
    store: Arc<dyn LedgerStore>,
    notifier: Arc<dyn Notifier>,
}

impl TransactionRecorder {
    pub fn new(store: Arc<dyn LedgerStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Record a transaction against the user's wallet.
    ///
    /// On success the balance write and the ledger append are already
    /// durable, and exactly one notification has been emitted. On any error
    /// nothing was written.
    pub async fn record(&self, input: TransactionInput) -> Result<Transaction, LedgerError> {
        let amount = money::validate_amount(input.amount)?;

        for _ in 0..MAX_COMMIT_RETRIES {
            let wallet = self
                .store
                .get_wallet(&input.user_id)
                .await?
                .ok_or_else(|| LedgerError::WalletNotFound(input.user_id.clone()))?;

            let new_balance = if input.kind.is_credit() {
                wallet.balance + amount
            } else {
                let candidate = wallet.balance - amount;
                if candidate < Decimal::ZERO {
                    return Err(LedgerError::InsufficientFunds);
                }
                candidate
            };
            // Credits can push past the storage cap too
            let new_balance = money::validate_balance(new_balance)?;

            let tx = NewTransaction {
                user_id: input.user_id.clone(),
                wallet_id: wallet.id,
                kind: input.kind,
                category: input.category.clone(),
                description: input.description.clone(),
                amount,
                status: TransactionStatus::Completed,
                metadata: input.metadata.clone(),
            };

            match self
                .store
                .commit_transaction(wallet.version, new_balance, tx)
                .await
            {
                Ok(recorded) => {
                    tracing::info!(
                        user_id = %recorded.user_id,
                        tx_id = recorded.id,
                        kind = %recorded.kind,
                        amount = %recorded.amount,
                        "Transaction recorded"
                    );
                    self.notifier
                        .notify(NotificationEvent::for_transaction(&recorded))
                        .await;
                    return Ok(recorded);
                }
                Err(LedgerError::BalanceConflict) => continue,
                Err(e) => return Err(e),
            }
        }

        tracing::warn!(user_id = %input.user_id, "Commit retries exhausted");
        Err(LedgerError::BalanceConflict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NullNotifier;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    struct CountingNotifier {
        count: AtomicUsize,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn notify(&self, _event: NotificationEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn setup(balance: &str) -> (Arc<MemoryStore>, TransactionRecorder) {
        let store = Arc::new(MemoryStore::new());
        store.create_wallet("u1").await.unwrap();
        store.set_balance("u1", d(balance)).await.unwrap();
        let recorder =
            TransactionRecorder::new(store.clone(), Arc::new(NullNotifier));
        (store, recorder)
    }

    fn payment(amount: &str) -> TransactionInput {
        TransactionInput {
            user_id: "u1".to_string(),
            kind: TransactionKind::Payment,
            category: "utilities".to_string(),
            description: "Electricity bill".to_string(),
            amount: d(amount),
            metadata: None,
        }
    }

    #[tokio::test]
    async fn test_debit_updates_balance_and_history() {
        let (store, recorder) = setup("1000.00").await;

        let tx = recorder.record(payment("300.00")).await.unwrap();
        assert_eq!(tx.amount, d("300.00"));
        assert_eq!(tx.status, TransactionStatus::Completed);

        let wallet = store.get_wallet("u1").await.unwrap().unwrap();
        assert_eq!(wallet.balance, d("700.00"));
        let history = store.list_transactions("u1", 50).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, tx.id);
    }

    #[tokio::test]
    async fn test_credit_increases_balance() {
        let (store, recorder) = setup("100.00").await;

        recorder
            .record(TransactionInput {
                kind: TransactionKind::Received,
                ..payment("50.00")
            })
            .await
            .unwrap();

        let wallet = store.get_wallet("u1").await.unwrap().unwrap();
        assert_eq!(wallet.balance, d("150.00"));
    }

    #[tokio::test]
    async fn test_insufficient_funds_writes_nothing() {
        let (store, recorder) = setup("100.00").await;

        let res = recorder.record(payment("100.01")).await;
        assert!(matches!(res, Err(LedgerError::InsufficientFunds)));

        let wallet = store.get_wallet("u1").await.unwrap().unwrap();
        assert_eq!(wallet.balance, d("100.00"));
        assert!(store.list_transactions("u1", 50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_debit_to_exact_zero_is_allowed() {
        let (store, recorder) = setup("100.00").await;
        recorder.record(payment("100.00")).await.unwrap();
        let wallet = store.get_wallet("u1").await.unwrap().unwrap();
        assert_eq!(wallet.balance, d("0.00"));
    }

    #[tokio::test]
    async fn test_zero_amount_is_recorded() {
        let (store, recorder) = setup("100.00").await;
        let tx = recorder.record(payment("0")).await.unwrap();
        assert_eq!(tx.amount, d("0.00"));

        let wallet = store.get_wallet("u1").await.unwrap().unwrap();
        assert_eq!(wallet.balance, d("100.00"));
        assert_eq!(store.list_transactions("u1", 50).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_amount_rejected_before_any_read() {
        let (store, recorder) = setup("100.00").await;

        let res = recorder.record(payment("-5.00")).await;
        assert!(matches!(res, Err(LedgerError::InvalidAmount(_))));

        let res = recorder.record(payment("1.234")).await;
        assert!(matches!(res, Err(LedgerError::InvalidAmount(_))));

        assert!(store.list_transactions("u1", 50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_wallet() {
        let store = Arc::new(MemoryStore::new());
        let recorder =
            TransactionRecorder::new(store, Arc::new(NullNotifier));
        let res = recorder.record(payment("10.00")).await;
        assert!(matches!(res, Err(LedgerError::WalletNotFound(_))));
    }

    #[tokio::test]
    async fn test_exactly_one_notification_per_success() {
        let store = Arc::new(MemoryStore::new());
        store.create_wallet("u1").await.unwrap();
        store.set_balance("u1", d("100.00")).await.unwrap();
        let notifier = Arc::new(CountingNotifier {
            count: AtomicUsize::new(0),
        });
        let recorder = TransactionRecorder::new(store, notifier.clone());

        recorder.record(payment("10.00")).await.unwrap();
        assert_eq!(notifier.count.load(Ordering::SeqCst), 1);

        // Failures emit nothing
        let _ = recorder.record(payment("1000.00")).await;
        assert_eq!(notifier.count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_debits_never_overdraw() {
        let store = Arc::new(MemoryStore::new());
        store.create_wallet("u1").await.unwrap();
        store.set_balance("u1", d("100.00")).await.unwrap();
        let recorder = TransactionRecorder::new(
            store.clone(),
            Arc::new(NullNotifier),
        );

        let mut handles = Vec::new();
        for _ in 0..10 {
            let r = recorder.clone();
            handles.push(tokio::spawn(async move {
                r.record(TransactionInput {
                    user_id: "u1".to_string(),
                    kind: TransactionKind::Payment,
                    category: "test".to_string(),
                    description: "concurrent debit".to_string(),
                    amount: d("30.00"),
                    metadata: None,
                })
                .await
            }));
        }

        let mut ok = 0;
        let mut insufficient = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => ok += 1,
                Err(LedgerError::InsufficientFunds) => insufficient += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        // 100.00 funds at most three 30.00 debits
        assert_eq!(ok, 3);
        assert_eq!(insufficient, 7);

        let wallet = store.get_wallet("u1").await.unwrap().unwrap();
        assert_eq!(wallet.balance, d("10.00"));
        assert_eq!(store.list_transactions("u1", 50).await.unwrap().len(), 3);
    }
}
