//! Shared gateway state

use std::sync::Arc;

use crate::notify::Notifier;
use crate::recorder::TransactionRecorder;
use crate::settlement::SettlementService;
use crate::store::LedgerStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LedgerStore>,
    pub recorder: TransactionRecorder,
    pub settlement: Arc<SettlementService>,
    /// Backend label reported by the health endpoint
    pub store_kind: &'static str,
}

impl AppState {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        notifier: Arc<dyn Notifier>,
        store_kind: &'static str,
    ) -> Self {
        let recorder = TransactionRecorder::new(store.clone(), notifier);
        let settlement = Arc::new(SettlementService::new(store.clone(), recorder.clone()));
        Self {
            store,
            recorder,
            settlement,
            store_kind,
        }
    }
}
