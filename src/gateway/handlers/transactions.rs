//! Transaction handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};

use super::super::state::AppState;
use super::super::types::{ApiResponse, CreateTransactionRequest, ListQuery, Rejection, reject};
use crate::models::Transaction;
use crate::recorder::TransactionInput;
use crate::store::DEFAULT_TX_LIMIT;

/// Record a transaction
///
/// POST /api/transactions
///
/// Kind `received` credits the wallet; every other kind debits. A debit
/// that would overdraw the wallet is rejected with 422 and nothing is
/// written.
#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 200, description = "Transaction recorded", body = ApiResponse<Transaction>),
        (status = 400, description = "Invalid amount"),
        (status = 404, description = "Wallet not found"),
        (status = 409, description = "Concurrent balance conflict"),
        (status = 422, description = "Insufficient funds")
    ),
    tag = "Transactions"
)]
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTransactionRequest>,
) -> Result<Json<ApiResponse<Transaction>>, Rejection> {
    let tx = state
        .recorder
        .record(TransactionInput {
            user_id: req.user_id,
            kind: req.kind,
            category: req.category,
            description: req.description,
            amount: req.amount,
            metadata: req.metadata,
        })
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(tx)))
}

/// Transaction history for a user, newest first
///
/// GET /api/transactions/{user_id}?limit=50
#[utoipa::path(
    get,
    path = "/api/transactions/{user_id}",
    params(
        ("user_id" = String, Path, description = "User ID"),
        ("limit" = Option<i64>, Query, description = "Page size, default 50")
    ),
    responses(
        (status = 200, description = "Transaction history", body = ApiResponse<Vec<Transaction>>)
    ),
    tag = "Transactions"
)]
pub async fn get_transactions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Transaction>>>, Rejection> {
    let limit = query.limit.unwrap_or(DEFAULT_TX_LIMIT).clamp(1, 500);
    let history = state
        .store
        .list_transactions(&user_id, limit)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(history)))
}
