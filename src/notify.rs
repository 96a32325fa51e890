//! Notification dispatch
//!
//! The recorder emits exactly one [`NotificationEvent`] per successfully
//! committed transaction. Delivery is best-effort: a full or closed channel
//! is logged and dropped, it never fails the transaction that triggered it.

use crate::models::Transaction;
use async_trait::async_trait;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: String,
}

impl NotificationEvent {
    pub fn for_transaction(tx: &Transaction) -> Self {
        Self {
            user_id: tx.user_id.clone(),
            title: "New transaction".to_string(),
            message: format!("{} - {} Kz", tx.description, tx.amount),
            kind: tx.kind.as_str().to_string(),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: NotificationEvent);
}

/// Fans events out over a bounded tokio channel to whatever consumer the
/// binary wires up (log drain, push service, websocket hub).
pub struct ChannelNotifier {
    tx: mpsc::Sender<NotificationEvent>,
}

impl ChannelNotifier {
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<NotificationEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, event: NotificationEvent) {
        if let Err(e) = self.tx.try_send(event) {
            tracing::warn!("Notification dropped: {}", e);
        }
    }
}

/// Discards every event; used by tests and by callers that opt out.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, _event: NotificationEvent) {}
}
