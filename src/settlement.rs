//! Marketplace Settlement
//!
//! A purchase moves money in three steps: debit the buyer the full price,
//! credit the seller the price minus the 5% platform commission, write the
//! purchase record linked to the buyer's debit.
//!
//! The steps cannot share one storage transaction across both wallets on the
//! in-memory backend, so settlement is a saga: each later failure is
//! compensated by reversing the earlier legs, so no success path and no
//! failure path leaves the buyer debited without a completed purchase.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;

use crate::error::LedgerError;
use crate::models::{
    MarketplacePurchase, NewMarketplacePurchase, Transaction, TransactionKind, TransactionStatus,
};
use crate::money;
use crate::recorder::{TransactionInput, TransactionRecorder};
use crate::store::LedgerStore;

pub struct SettlementService {
    store: Arc<dyn LedgerStore>,
    recorder: TransactionRecorder,
}

/// Everything a successful purchase produced
#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    pub purchase: MarketplacePurchase,
    pub debit: Transaction,
    pub credit: Transaction,
    pub commission: Decimal,
}

impl SettlementService {
    pub fn new(store: Arc<dyn LedgerStore>, recorder: TransactionRecorder) -> Self {
        Self { store, recorder }
    }

    /// Settle a purchase of `item_id` by `buyer_id`.
    pub async fn purchase(
        &self,
        buyer_id: &str,
        item_id: i64,
    ) -> Result<SettlementOutcome, LedgerError> {
        let item = self
            .store
            .get_active_item(item_id)
            .await?
            .ok_or(LedgerError::ItemNotFound(item_id))?;

        let buyer = self
            .store
            .get_wallet(buyer_id)
            .await?
            .ok_or_else(|| LedgerError::WalletNotFound(buyer_id.to_string()))?;

        // Early check to avoid a pointless debit attempt; the recorder
        // re-validates under the commit lock
        if buyer.balance < item.price {
            return Err(LedgerError::InsufficientFunds);
        }

        let commission = money::commission(item.price);
        let earnings = item.price - commission;

        // Leg 1: debit the buyer
        let debit = self
            .recorder
            .record(TransactionInput {
                user_id: buyer_id.to_string(),
                kind: TransactionKind::Payment,
                category: "marketplace".to_string(),
                description: format!("Purchase: {}", item.title),
                amount: item.price,
                metadata: Some(json!({ "item_id": item.id, "seller_id": item.seller_id })),
            })
            .await?;

        // Leg 2: credit the seller. A seller without a wallet gets one
        // provisioned at 0.00 rather than failing the sale.
        self.store.create_wallet(&item.seller_id).await?;
        let credit = match self
            .recorder
            .record(TransactionInput {
                user_id: item.seller_id.clone(),
                kind: TransactionKind::Received,
                category: "marketplace".to_string(),
                description: format!("Sale: {}", item.title),
                amount: earnings,
                metadata: Some(json!({ "item_id": item.id, "buyer_id": buyer_id })),
            })
            .await
        {
            Ok(credit) => credit,
            Err(e) => {
                tracing::error!(
                    item_id = item.id,
                    debit_tx = debit.id,
                    "Seller credit failed, refunding buyer: {}",
                    e
                );
                self.refund_buyer(buyer_id, &item.title, &debit).await;
                return Err(e);
            }
        };

        // Leg 3: purchase record, linked to the buyer's debit
        match self
            .store
            .create_purchase(NewMarketplacePurchase {
                buyer_id: buyer_id.to_string(),
                seller_id: item.seller_id.clone(),
                item_id: item.id,
                amount: item.price,
                status: TransactionStatus::Completed,
                transaction_id: Some(debit.id),
            })
            .await
        {
            Ok(purchase) => {
                tracing::info!(
                    purchase_id = purchase.id,
                    item_id = item.id,
                    buyer = %buyer_id,
                    seller = %item.seller_id,
                    price = %item.price,
                    commission = %commission,
                    "Purchase settled"
                );
                Ok(SettlementOutcome {
                    purchase,
                    debit,
                    credit,
                    commission,
                })
            }
            Err(e) => {
                tracing::error!(
                    item_id = item.id,
                    debit_tx = debit.id,
                    credit_tx = credit.id,
                    "Purchase record failed, reversing both legs: {}",
                    e
                );
                self.reverse_seller_credit(&item.seller_id, &item.title, &credit)
                    .await;
                self.refund_buyer(buyer_id, &item.title, &debit).await;
                Err(e)
            }
        }
    }

    /// Compensating credit back to the buyer for a failed purchase.
    ///
    /// Best-effort: if the refund itself cannot commit, the two transaction
    /// ids are logged for manual reconciliation and the original error still
    /// propagates to the caller.
    async fn refund_buyer(&self, buyer_id: &str, title: &str, debit: &Transaction) {
        let result = self
            .recorder
            .record(TransactionInput {
                user_id: buyer_id.to_string(),
                kind: TransactionKind::Received,
                category: "refund".to_string(),
                description: format!("Refund: {}", title),
                amount: debit.amount,
                metadata: Some(json!({ "reverses": debit.id })),
            })
            .await;
        if let Err(e) = result {
            tracing::error!(
                buyer = %buyer_id,
                debit_tx = debit.id,
                "Buyer refund failed, manual reconciliation required: {}",
                e
            );
        }
    }

    async fn reverse_seller_credit(&self, seller_id: &str, title: &str, credit: &Transaction) {
        let result = self
            .recorder
            .record(TransactionInput {
                user_id: seller_id.to_string(),
                kind: TransactionKind::Payment,
                category: "refund".to_string(),
                description: format!("Sale reversal: {}", title),
                amount: credit.amount,
                metadata: Some(json!({ "reverses": credit.id })),
            })
            .await;
        if let Err(e) = result {
            tracing::error!(
                seller = %seller_id,
                credit_tx = credit.id,
                "Seller reversal failed, manual reconciliation required: {}",
                e
            );
        }
    }
}
