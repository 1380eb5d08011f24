//! Market Data API
//!
//! Ingestion point for the market-data collaborator:
//! - POST /api/market/quotes - Push the latest quote for a symbol
//! - GET /api/market/quotes/:symbol - Read the cached quote
//!
//! The engine never fetches prices; whatever the feed last pushed backs
//! market-order settlement and portfolio valuation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::api::trading::{ApiResponse, ErrorResponse};
use crate::types::Quote;
use crate::AppState;

/// Create market data router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quotes", post(push_quote))
        .route("/quotes/:symbol", get(get_quote))
}

#[derive(Debug, Serialize)]
pub struct PushQuoteResponse {
    pub accepted: bool,
}

/// POST /api/market/quotes
async fn push_quote(
    State(state): State<AppState>,
    Json(quote): Json<Quote>,
) -> Result<Json<ApiResponse<PushQuoteResponse>>, (StatusCode, Json<ErrorResponse>)> {
    if quote.price <= 0.0 || quote.symbol.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "quote requires a symbol and a positive price".to_string(),
                code: "VALIDATION_ERROR".to_string(),
            }),
        ));
    }

    state.quotes.update(quote);
    Ok(Json(ApiResponse {
        data: PushQuoteResponse { accepted: true },
    }))
}

/// GET /api/market/quotes/:symbol
async fn get_quote(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<Quote>>, (StatusCode, Json<ErrorResponse>)> {
    state
        .quotes
        .get(&symbol)
        .map(|quote| Json(ApiResponse { data: quote }))
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("No quote for {}", symbol),
                    code: "QUOTE_NOT_FOUND".to_string(),
                }),
            )
        })
}
