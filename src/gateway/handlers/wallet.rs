//! Wallet handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use super::super::state::AppState;
use super::super::types::{
    ApiResponse, CreateWalletRequest, Rejection, UpdateBalanceRequest, reject,
};
use crate::error::LedgerError;
use crate::models::Wallet;
use crate::money;

/// Provision a wallet for a user
///
/// POST /api/wallets
///
/// Idempotent: returns the existing wallet unchanged if one already exists.
#[utoipa::path(
    post,
    path = "/api/wallets",
    request_body = CreateWalletRequest,
    responses(
        (status = 200, description = "Wallet created or already present", body = ApiResponse<Wallet>),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Persistence failure")
    ),
    tag = "Wallets"
)]
pub async fn create_wallet(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateWalletRequest>,
) -> Result<Json<ApiResponse<Wallet>>, Rejection> {
    if req.user_id.trim().is_empty() {
        return Err(super::super::types::bad_request("user_id cannot be empty"));
    }
    let wallet = state.store.create_wallet(&req.user_id).await.map_err(reject)?;
    Ok(Json(ApiResponse::success(wallet)))
}

/// Get a user's wallet
///
/// GET /api/wallets/{user_id}
#[utoipa::path(
    get,
    path = "/api/wallets/{user_id}",
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Wallet details", body = ApiResponse<Wallet>),
        (status = 404, description = "Wallet not found")
    ),
    tag = "Wallets"
)]
pub async fn get_wallet(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Wallet>>, Rejection> {
    let wallet = state
        .store
        .get_wallet(&user_id)
        .await
        .map_err(reject)?
        .ok_or_else(|| reject(LedgerError::WalletNotFound(user_id)))?;
    Ok(Json(ApiResponse::success(wallet)))
}

/// Administrative balance override
///
/// PATCH /api/wallets/{user_id}/balance
///
/// Sets the balance directly without writing a ledger entry. Operator use
/// only; every call is logged at WARN.
#[utoipa::path(
    patch,
    path = "/api/wallets/{user_id}/balance",
    params(("user_id" = String, Path, description = "User ID")),
    request_body = UpdateBalanceRequest,
    responses(
        (status = 200, description = "Balance updated", body = ApiResponse<Wallet>),
        (status = 400, description = "Invalid balance"),
        (status = 404, description = "Wallet not found")
    ),
    tag = "Wallets"
)]
pub async fn update_balance(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateBalanceRequest>,
) -> Result<Json<ApiResponse<Wallet>>, Rejection> {
    let balance = money::validate_balance(req.balance)
        .map_err(|e| reject(LedgerError::from(e)))?;

    tracing::warn!(user_id = %user_id, balance = %balance, "Administrative balance override");

    let wallet = state
        .store
        .set_balance(&user_id, balance)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(wallet)))
}
