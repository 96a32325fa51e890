//! Domain models: wallets, transactions, marketplace items and purchases.
//!
//! Wallets carry a `version` counter that increments on every balance write;
//! the store's commit operation checks it so concurrent read-modify-write
//! sequences cannot both apply against a stale balance.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Transaction kind. `received` credits the wallet; every other kind debits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Payment,
    Recharge,
    International,
    Transfer,
    Received,
}

impl TransactionKind {
    pub fn is_credit(&self) -> bool {
        matches!(self, TransactionKind::Received)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Payment => "payment",
            TransactionKind::Recharge => "recharge",
            TransactionKind::International => "international",
            TransactionKind::Transfer => "transfer",
            TransactionKind::Received => "received",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payment" => Ok(TransactionKind::Payment),
            "recharge" => Ok(TransactionKind::Recharge),
            "international" => Ok(TransactionKind::International),
            "transfer" => Ok(TransactionKind::Transfer),
            "received" => Ok(TransactionKind::Received),
            other => Err(format!("unknown transaction kind: {}", other)),
        }
    }
}

/// Transaction status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "failed" => Ok(TransactionStatus::Failed),
            other => Err(format!("unknown transaction status: {}", other)),
        }
    }
}

/// A user's wallet. One per user, created at 0.00, never deleted.
///
/// Invariant: `balance >= 0` at all observable times.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Wallet {
    pub id: i64,
    pub user_id: String,
    pub balance: Decimal,
    /// Bumped on every balance write; guards optimistic commits
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An immutable ledger entry. No update or delete path exists.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Transaction {
    pub id: i64,
    pub user_id: String,
    pub wallet_id: i64,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub status: TransactionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Transaction fields supplied by the recorder; id/timestamp come from the store
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: String,
    pub wallet_id: i64,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub metadata: Option<serde_json::Value>,
}

/// A marketplace listing. Soft-deactivated via `is_active`, never deleted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MarketplaceItem {
    pub id: i64,
    pub seller_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digital_content: Option<serde_json::Value>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMarketplaceItem {
    pub seller_id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub digital_content: Option<serde_json::Value>,
}

/// One row per completed marketplace buy, linked to the buyer's debit entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MarketplacePurchase {
    pub id: i64,
    pub buyer_id: String,
    pub seller_id: String,
    pub item_id: i64,
    pub amount: Decimal,
    pub status: TransactionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMarketplacePurchase {
    pub buyer_id: String,
    pub seller_id: String,
    pub item_id: i64,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub transaction_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_sign() {
        assert!(TransactionKind::Received.is_credit());
        assert!(!TransactionKind::Payment.is_credit());
        assert!(!TransactionKind::Recharge.is_credit());
        assert!(!TransactionKind::International.is_credit());
        assert!(!TransactionKind::Transfer.is_credit());
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            TransactionKind::Payment,
            TransactionKind::Recharge,
            TransactionKind::International,
            TransactionKind::Transfer,
            TransactionKind::Received,
        ] {
            assert_eq!(kind.as_str().parse::<TransactionKind>().unwrap(), kind);
        }
        assert!("cashback".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionStatus::Failed,
        ] {
            assert_eq!(
                status.as_str().parse::<TransactionStatus>().unwrap(),
                status
            );
        }
    }

    #[test]
    fn test_kind_serde_lowercase() {
        let json = serde_json::to_string(&TransactionKind::Received).unwrap();
        assert_eq!(json, "\"received\"");
        let kind: TransactionKind = serde_json::from_str("\"payment\"").unwrap();
        assert_eq!(kind, TransactionKind::Payment);
    }
}
