//! Kwanza Wallet gateway binary
//!
//! Loads config, wires the store (PostgreSQL when `postgres_url` is set,
//! in-memory otherwise), and serves the HTTP API.

use std::sync::Arc;

use kwanza_wallet::config::AppConfig;
use kwanza_wallet::db::Database;
use kwanza_wallet::gateway::{self, AppState};
use kwanza_wallet::logging::init_logging;
use kwanza_wallet::notify::ChannelNotifier;
use kwanza_wallet::store::{LedgerStore, MemoryStore, PgStore};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _guard = init_logging(&config);

    tracing::info!("Starting kwanza_wallet (env: {})", env);

    let (store, store_kind): (Arc<dyn LedgerStore>, &'static str) = match &config.postgres_url {
        Some(url) => {
            let db = Database::connect(url).await?;
            (Arc::new(PgStore::new(db.pool().clone())), "postgres")
        }
        None => {
            tracing::warn!("No postgres_url configured, using in-memory store (non-durable)");
            (Arc::new(MemoryStore::new()), "memory")
        }
    };

    let (notifier, mut events) = ChannelNotifier::channel(config.notification.buffer);
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::info!(
                user_id = %event.user_id,
                kind = %event.kind,
                "Notification: {}",
                event.message
            );
        }
    });

    let state = Arc::new(AppState::new(store, Arc::new(notifier), store_kind));

    gateway::serve(state, &config.gateway.host, config.gateway.port).await
}
