//! OpenAPI / Swagger UI documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::gateway::types::{
    ApiResponse, BillPaymentRequest, CreateItemRequest, CreateTransactionRequest,
    CreateWalletRequest, HealthResponse, PurchaseRequest, PurchaseResponseData, RechargeRequest,
    UpdateBalanceRequest,
};
use crate::models::{
    MarketplaceItem, MarketplacePurchase, Transaction, TransactionKind, TransactionStatus, Wallet,
};

/// Main API documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kwanza Wallet API",
        version = "1.0.0",
        description = "Mobile wallet ledger: balances, transactions, and marketplace settlement in Kz."
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::wallet::create_wallet,
        crate::gateway::handlers::wallet::get_wallet,
        crate::gateway::handlers::wallet::update_balance,
        crate::gateway::handlers::transactions::create_transaction,
        crate::gateway::handlers::transactions::get_transactions,
        crate::gateway::handlers::marketplace::create_item,
        crate::gateway::handlers::marketplace::get_items,
        crate::gateway::handlers::marketplace::get_seller_items,
        crate::gateway::handlers::marketplace::deactivate_item,
        crate::gateway::handlers::marketplace::purchase_item,
        crate::gateway::handlers::payments::pay_bill,
        crate::gateway::handlers::payments::recharge_phone,
    ),
    components(schemas(
        ApiResponse<Wallet>,
        Wallet,
        Transaction,
        TransactionKind,
        TransactionStatus,
        MarketplaceItem,
        MarketplacePurchase,
        CreateWalletRequest,
        UpdateBalanceRequest,
        CreateTransactionRequest,
        CreateItemRequest,
        PurchaseRequest,
        PurchaseResponseData,
        BillPaymentRequest,
        RechargeRequest,
        HealthResponse,
    )),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Wallets", description = "Wallet provisioning and balances"),
        (name = "Transactions", description = "Ledger entries"),
        (name = "Marketplace", description = "Listings and settled purchases"),
        (name = "Payments", description = "Bill payments and phone recharges"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generates() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().expect("OpenAPI doc should serialize");
        assert!(json.contains("/api/wallets"));
        assert!(json.contains("/api/marketplace/purchases"));
        assert!(json.contains("/api/payments/recharge"));
    }

    #[test]
    fn test_all_routes_documented() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.paths.paths.len(), 12);
    }
}
