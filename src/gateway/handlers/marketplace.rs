//! Marketplace handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;

use super::super::state::AppState;
use super::super::types::{
    ApiResponse, CreateItemRequest, ListQuery, PurchaseRequest, PurchaseResponseData, Rejection,
    SellerQuery, bad_request, reject,
};
use crate::error::LedgerError;
use crate::models::{MarketplaceItem, NewMarketplaceItem};
use crate::money;

const DEFAULT_ITEM_LIMIT: i64 = 50;

/// List an item for sale
///
/// POST /api/marketplace/items
#[utoipa::path(
    post,
    path = "/api/marketplace/items",
    request_body = CreateItemRequest,
    responses(
        (status = 200, description = "Item listed", body = ApiResponse<MarketplaceItem>),
        (status = 400, description = "Invalid price or fields")
    ),
    tag = "Marketplace"
)]
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateItemRequest>,
) -> Result<Json<ApiResponse<MarketplaceItem>>, Rejection> {
    if req.seller_id.trim().is_empty() {
        return Err(bad_request("seller_id cannot be empty"));
    }
    if req.title.trim().is_empty() {
        return Err(bad_request("title cannot be empty"));
    }
    let price = money::validate_amount(req.price)
        .map_err(|e| reject(LedgerError::from(e)))?;
    if price == Decimal::ZERO {
        return Err(bad_request("price must be positive"));
    }

    let item = state
        .store
        .create_item(NewMarketplaceItem {
            seller_id: req.seller_id,
            title: req.title,
            description: req.description,
            category: req.category,
            price,
            digital_content: req.digital_content,
        })
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(item)))
}

/// Browse active items
///
/// GET /api/marketplace/items?limit=50
#[utoipa::path(
    get,
    path = "/api/marketplace/items",
    params(("limit" = Option<i64>, Query, description = "Page size, default 50")),
    responses(
        (status = 200, description = "Active items", body = ApiResponse<Vec<MarketplaceItem>>)
    ),
    tag = "Marketplace"
)]
pub async fn get_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<MarketplaceItem>>>, Rejection> {
    let limit = query.limit.unwrap_or(DEFAULT_ITEM_LIMIT).clamp(1, 500);
    let items = state.store.list_active_items(limit).await.map_err(reject)?;
    Ok(Json(ApiResponse::success(items)))
}

/// A seller's own listings, active or not
///
/// GET /api/marketplace/items/seller/{user_id}
#[utoipa::path(
    get,
    path = "/api/marketplace/items/seller/{user_id}",
    params(("user_id" = String, Path, description = "Seller user ID")),
    responses(
        (status = 200, description = "Seller listings", body = ApiResponse<Vec<MarketplaceItem>>)
    ),
    tag = "Marketplace"
)]
pub async fn get_seller_items(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<MarketplaceItem>>>, Rejection> {
    let items = state
        .store
        .list_items_by_seller(&user_id)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(items)))
}

/// Deactivate a listing
///
/// DELETE /api/marketplace/items/{item_id}?seller_id=user_456
///
/// Soft delete: the item stops being purchasable but stays in the seller's
/// listing history.
#[utoipa::path(
    delete,
    path = "/api/marketplace/items/{item_id}",
    params(
        ("item_id" = i64, Path, description = "Item ID"),
        ("seller_id" = String, Query, description = "Seller user ID")
    ),
    responses(
        (status = 200, description = "Item deactivated"),
        (status = 404, description = "Item not found or not owned by seller")
    ),
    tag = "Marketplace"
)]
pub async fn deactivate_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
    Query(query): Query<SellerQuery>,
) -> Result<Json<ApiResponse<()>>, Rejection> {
    state
        .store
        .deactivate_item(item_id, &query.seller_id)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(())))
}

/// Buy an item
///
/// POST /api/marketplace/purchases
///
/// Debits the buyer the full price, credits the seller the price minus the
/// 5% commission, and records the purchase linked to the buyer's debit.
#[utoipa::path(
    post,
    path = "/api/marketplace/purchases",
    request_body = PurchaseRequest,
    responses(
        (status = 200, description = "Purchase settled", body = ApiResponse<PurchaseResponseData>),
        (status = 404, description = "Item or wallet not found"),
        (status = 422, description = "Insufficient funds")
    ),
    tag = "Marketplace"
)]
pub async fn purchase_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PurchaseRequest>,
) -> Result<Json<ApiResponse<PurchaseResponseData>>, Rejection> {
    let outcome = state
        .settlement
        .purchase(&req.buyer_id, req.item_id)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(PurchaseResponseData {
        purchase: outcome.purchase,
        transaction: outcome.debit,
        commission: outcome.commission,
    })))
}
