//! Trading API
//!
//! Endpoints for order settlement and portfolio state:
//!
//! Orders:
//! - POST /api/trading/orders - Place a new order
//! - GET /api/trading/orders - List orders (with filters)
//! - GET /api/trading/orders/:id - Get order details
//! - POST /api/trading/orders/:id/confirm - Confirm (settle) a pending order
//! - POST /api/trading/orders/:id/cancel - Cancel a pending order
//!
//! Portfolio:
//! - GET /api/trading/holdings - List holdings
//! - POST /api/trading/holdings/rebuild - Refold holdings from the order log
//! - GET /api/trading/portfolio/summary - Portfolio valuation at live quotes
//!
//! Journal:
//! - GET /api/trading/transactions - List journal entries (with filters)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::auth::Authenticated;
use crate::services::{SettlementError, TransactionFilter};
use crate::types::{
    ConfirmOrderRequest, Holding, Order, OrderStatus, PlaceOrderRequest, PortfolioSummary,
    Transaction, TransactionType,
};
use crate::AppState;

/// Create trading router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", post(place_order))
        .route("/orders", get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/confirm", post(confirm_order))
        .route("/orders/:id/cancel", post(cancel_order))
        .route("/holdings", get(get_holdings))
        .route("/holdings/rebuild", post(rebuild_holdings))
        .route("/portfolio/summary", get(get_portfolio_summary))
        .route("/transactions", get(list_transactions))
}

// =============================================================================
// Response Types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Convert SettlementError to HTTP response.
impl IntoResponse for SettlementError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self {
            SettlementError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            SettlementError::InsufficientFunds { .. } => {
                (StatusCode::BAD_REQUEST, "INSUFFICIENT_FUNDS")
            }
            SettlementError::InsufficientHoldings { .. } => {
                (StatusCode::BAD_REQUEST, "INSUFFICIENT_HOLDINGS")
            }
            SettlementError::InvalidCredential => (StatusCode::FORBIDDEN, "INVALID_CREDENTIAL"),
            SettlementError::OrderAlreadyFinal(_) => (StatusCode::CONFLICT, "ORDER_ALREADY_FINAL"),
            SettlementError::OrderNotFound(_) => (StatusCode::NOT_FOUND, "ORDER_NOT_FOUND"),
            SettlementError::WalletNotFound(_) => (StatusCode::NOT_FOUND, "WALLET_NOT_FOUND"),
            SettlementError::PriceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "PRICE_UNAVAILABLE")
            }
            SettlementError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

// =============================================================================
// Query Parameters
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<OrderStatus>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    #[serde(rename = "type")]
    pub txn_type: Option<TransactionType>,
    pub symbol: Option<String>,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub limit: Option<usize>,
}

// =============================================================================
// Order Handlers
// =============================================================================

/// POST /api/trading/orders
///
/// Place a new order. Limit/stop buys reserve funds; nothing settles yet.
async fn place_order(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>), SettlementError> {
    let order = state.settlement.place_order(&auth.user_id, request)?;
    Ok((StatusCode::CREATED, Json(ApiResponse { data: order })))
}

/// GET /api/trading/orders
async fn list_orders(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(query): Query<ListOrdersQuery>,
) -> Json<ApiResponse<Vec<Order>>> {
    let orders = state
        .settlement
        .list_orders(&auth.user_id, query.status, query.limit.unwrap_or(100));
    Json(ApiResponse { data: orders })
}

/// GET /api/trading/orders/:id
async fn get_order(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(order_id): Path<String>,
) -> Result<Json<ApiResponse<Order>>, SettlementError> {
    let order = state.settlement.get_order(&auth.user_id, &order_id)?;
    Ok(Json(ApiResponse { data: order }))
}

/// POST /api/trading/orders/:id/confirm
///
/// Settle a pending order. Requires the wallet credential: confirmation
/// moves money, so session auth alone is not enough.
async fn confirm_order(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(order_id): Path<String>,
    Json(request): Json<ConfirmOrderRequest>,
) -> Result<Json<ApiResponse<Order>>, SettlementError> {
    let order = state
        .settlement
        .confirm_order(&auth.user_id, &order_id, &request.credential)?;
    Ok(Json(ApiResponse { data: order }))
}

/// POST /api/trading/orders/:id/cancel
async fn cancel_order(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(order_id): Path<String>,
) -> Result<Json<ApiResponse<Order>>, SettlementError> {
    let order = state.settlement.cancel_order(&auth.user_id, &order_id)?;
    Ok(Json(ApiResponse { data: order }))
}

// =============================================================================
// Portfolio Handlers
// =============================================================================

/// GET /api/trading/holdings
async fn get_holdings(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Json<ApiResponse<Vec<Holding>>> {
    let holdings = state.settlement.get_holdings(&auth.user_id);
    Json(ApiResponse { data: holdings })
}

/// POST /api/trading/holdings/rebuild
///
/// Refold the holdings cache from the completed-order log.
async fn rebuild_holdings(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<ApiResponse<Vec<Holding>>>, SettlementError> {
    let holdings = state.settlement.rebuild_holdings(&auth.user_id)?;
    Ok(Json(ApiResponse { data: holdings }))
}

/// GET /api/trading/portfolio/summary
async fn get_portfolio_summary(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<ApiResponse<PortfolioSummary>>, SettlementError> {
    let summary = state.valuator.valuate(&auth.user_id)?;
    Ok(Json(ApiResponse { data: summary }))
}

// =============================================================================
// Journal Handlers
// =============================================================================

/// GET /api/trading/transactions
async fn list_transactions(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(query): Query<ListTransactionsQuery>,
) -> Json<ApiResponse<Vec<Transaction>>> {
    let filter = TransactionFilter {
        txn_type: query.txn_type,
        symbol: query.symbol,
        from: query.from,
        to: query.to,
        limit: query.limit,
    };

    let transactions = state.journal.list(&auth.user_id, &filter);
    Json(ApiResponse { data: transactions })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let response = SettlementError::InsufficientFunds {
            needed: 100.0,
            available: 50.0,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = SettlementError::OrderAlreadyFinal(OrderStatus::Completed).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = SettlementError::InvalidCredential.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = SettlementError::PriceUnavailable("BTC".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_api_response_serialization() {
        let response = ApiResponse { data: 42 };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"data":42}"#);
    }
}
