//! HTTP Gateway
//!
//! Axum router, handlers, and OpenAPI documentation. Every response uses
//! the `ApiResponse` envelope; errors map through
//! [`types::reject`](types::reject) so the wire codes stay aligned with
//! [`LedgerError`](crate::error::LedgerError).

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Wallets
        .route("/api/wallets", post(handlers::create_wallet))
        .route("/api/wallets/{user_id}", get(handlers::get_wallet))
        .route(
            "/api/wallets/{user_id}/balance",
            patch(handlers::update_balance),
        )
        // Transactions
        .route("/api/transactions", post(handlers::create_transaction))
        .route("/api/transactions/{user_id}", get(handlers::get_transactions))
        // Marketplace
        .route(
            "/api/marketplace/items",
            get(handlers::get_items).post(handlers::create_item),
        )
        .route(
            "/api/marketplace/items/{item_id}",
            delete(handlers::deactivate_item),
        )
        .route(
            "/api/marketplace/items/seller/{user_id}",
            get(handlers::get_seller_items),
        )
        .route("/api/marketplace/purchases", post(handlers::purchase_item))
        // Payments
        .route("/api/payments/bills", post(handlers::pay_bill))
        .route("/api/payments/recharge", post(handlers::recharge_phone))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Start the HTTP gateway and serve until the process exits
pub async fn serve(state: Arc<AppState>, host: &str, port: u16) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API docs at http://{}/docs", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
