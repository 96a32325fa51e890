//! API request/response types and error codes
//!
//! - `ApiResponse<T>`: unified response wrapper
//! - `error_codes`: standard error code constants
//! - Request DTOs: every input struct rejects unknown fields, so a typo in a
//!   client payload fails loudly instead of being silently dropped

use axum::Json;
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::LedgerError;
use crate::models::TransactionKind;

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_FUNDS: i32 = 1002;

    // Resource errors (4xxx)
    pub const WALLET_NOT_FOUND: i32 = 4001;
    pub const ITEM_NOT_FOUND: i32 = 4002;
    pub const CONFLICT: i32 = 4009;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
}

/// Handler error type: HTTP status plus the envelope
pub type Rejection = (StatusCode, Json<ApiResponse<()>>);

/// Map a ledger error onto the wire
pub fn reject(err: LedgerError) -> Rejection {
    let code = match &err {
        LedgerError::WalletNotFound(_) => error_codes::WALLET_NOT_FOUND,
        LedgerError::ItemNotFound(_) => error_codes::ITEM_NOT_FOUND,
        LedgerError::InsufficientFunds => error_codes::INSUFFICIENT_FUNDS,
        LedgerError::InvalidAmount(_) => error_codes::INVALID_PARAMETER,
        LedgerError::BalanceConflict => error_codes::CONFLICT,
        LedgerError::Persistence(_) => error_codes::INTERNAL_ERROR,
    };
    if matches!(err, LedgerError::Persistence(_)) {
        tracing::error!("Persistence failure surfaced to API: {}", err);
    }
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ApiResponse::<()>::error(code, err.to_string())))
}

pub fn bad_request(msg: impl Into<String>) -> Rejection {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error(
            error_codes::INVALID_PARAMETER,
            msg,
        )),
    )
}

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateWalletRequest {
    #[schema(example = "user_123")]
    pub user_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateBalanceRequest {
    #[schema(value_type = String, example = "1500.00")]
    pub balance: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateTransactionRequest {
    #[schema(example = "user_123")]
    pub user_id: String,
    #[schema(example = "payment")]
    pub kind: TransactionKind,
    #[schema(example = "utilities")]
    pub category: String,
    #[schema(example = "Electricity bill")]
    pub description: String,
    #[schema(value_type = String, example = "300.00")]
    pub amount: Decimal,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateItemRequest {
    #[schema(example = "user_456")]
    pub seller_id: String,
    #[schema(example = "Design course")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[schema(example = "education")]
    pub category: String,
    #[schema(value_type = String, example = "200.00")]
    pub price: Decimal,
    #[serde(default)]
    pub digital_content: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct PurchaseRequest {
    #[schema(example = "user_123")]
    pub buyer_id: String,
    #[schema(example = 1)]
    pub item_id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct BillPaymentRequest {
    #[schema(example = "user_123")]
    pub user_id: String,
    /// Biller identifier, e.g. an ENDE client number
    #[schema(example = "ENDE-004211")]
    pub reference: String,
    #[schema(example = "electricity")]
    pub category: String,
    #[schema(value_type = String, example = "300.00")]
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RechargeRequest {
    #[schema(example = "user_123")]
    pub user_id: String,
    /// Phone number being topped up
    #[schema(example = "+244923000111")]
    pub phone: String,
    #[schema(example = "unitel")]
    pub operator: String,
    #[schema(value_type = String, example = "50.00")]
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SellerQuery {
    pub seller_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ListQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Settlement result returned by the purchase endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseResponseData {
    pub purchase: crate::models::MarketplacePurchase,
    pub transaction: crate::models::Transaction,
    #[schema(value_type = String, example = "10.00")]
    pub commission: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "memory")]
    pub store: String,
}
