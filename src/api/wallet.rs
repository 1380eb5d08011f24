//! Wallet API
//!
//! Endpoints for wallet funding and the step-up credential:
//! - GET /api/wallet - Get the authenticated user's wallet
//! - POST /api/wallet/deposit - Credit a confirmed external deposit
//! - POST /api/wallet/withdraw - Withdraw available cash
//! - POST /api/wallet/credential - Set the wallet credential (PIN)
//!
//! Deposits arrive here after the payment collaborator has confirmed
//! them; this service never talks to the gateway itself.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::auth::Authenticated;
use crate::api::trading::ApiResponse;
use crate::services::SettlementError;
use crate::types::Wallet;
use crate::AppState;

/// Create wallet router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_wallet))
        .route("/deposit", post(deposit))
        .route("/withdraw", post(withdraw))
        .route("/credential", post(set_credential))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashMovementRequest {
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCredentialRequest {
    pub credential: String,
}

#[derive(Debug, Serialize)]
pub struct SetCredentialResponse {
    pub success: bool,
}

/// GET /api/wallet
async fn get_wallet(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<ApiResponse<Wallet>>, SettlementError> {
    let wallet = state.ledger.get_or_create(&auth.user_id)?;
    Ok(Json(ApiResponse { data: wallet }))
}

/// POST /api/wallet/deposit
async fn deposit(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(request): Json<CashMovementRequest>,
) -> Result<Json<ApiResponse<Wallet>>, SettlementError> {
    let wallet = state.ledger.deposit(&auth.user_id, request.amount)?;
    Ok(Json(ApiResponse { data: wallet }))
}

/// POST /api/wallet/withdraw
async fn withdraw(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(request): Json<CashMovementRequest>,
) -> Result<Json<ApiResponse<Wallet>>, SettlementError> {
    let wallet = state.ledger.withdraw(&auth.user_id, request.amount)?;
    Ok(Json(ApiResponse { data: wallet }))
}

/// POST /api/wallet/credential
async fn set_credential(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(request): Json<SetCredentialRequest>,
) -> Result<Json<ApiResponse<SetCredentialResponse>>, SettlementError> {
    state
        .ledger
        .set_credential(&auth.user_id, &request.credential)?;
    Ok(Json(ApiResponse {
        data: SetCredentialResponse { success: true },
    }))
}
