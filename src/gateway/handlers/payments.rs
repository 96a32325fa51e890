//! Bill payment and phone recharge handlers
//!
//! Thin conveniences over the recorder: each one is a debit with a fixed
//! kind and category plus the payment details in the metadata column.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::json;

use super::super::state::AppState;
use super::super::types::{
    ApiResponse, BillPaymentRequest, RechargeRequest, Rejection, bad_request, reject,
};
use crate::models::{Transaction, TransactionKind};
use crate::recorder::TransactionInput;

/// Pay a bill
///
/// POST /api/payments/bills
#[utoipa::path(
    post,
    path = "/api/payments/bills",
    request_body = BillPaymentRequest,
    responses(
        (status = 200, description = "Bill paid", body = ApiResponse<Transaction>),
        (status = 404, description = "Wallet not found"),
        (status = 422, description = "Insufficient funds")
    ),
    tag = "Payments"
)]
pub async fn pay_bill(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BillPaymentRequest>,
) -> Result<Json<ApiResponse<Transaction>>, Rejection> {
    if req.reference.trim().is_empty() {
        return Err(bad_request("reference cannot be empty"));
    }

    let tx = state
        .recorder
        .record(TransactionInput {
            user_id: req.user_id,
            kind: TransactionKind::Payment,
            category: req.category.clone(),
            description: format!("Bill payment: {}", req.reference),
            amount: req.amount,
            metadata: Some(json!({ "reference": req.reference, "category": req.category })),
        })
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(tx)))
}

/// Top up a phone
///
/// POST /api/payments/recharge
#[utoipa::path(
    post,
    path = "/api/payments/recharge",
    request_body = RechargeRequest,
    responses(
        (status = 200, description = "Recharge completed", body = ApiResponse<Transaction>),
        (status = 404, description = "Wallet not found"),
        (status = 422, description = "Insufficient funds")
    ),
    tag = "Payments"
)]
pub async fn recharge_phone(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RechargeRequest>,
) -> Result<Json<ApiResponse<Transaction>>, Rejection> {
    if req.phone.trim().is_empty() {
        return Err(bad_request("phone cannot be empty"));
    }

    let tx = state
        .recorder
        .record(TransactionInput {
            user_id: req.user_id,
            kind: TransactionKind::Recharge,
            category: "recharge".to_string(),
            description: format!("Recharge {} ({})", req.phone, req.operator),
            amount: req.amount,
            metadata: Some(json!({ "phone": req.phone, "operator": req.operator })),
        })
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(tx)))
}
