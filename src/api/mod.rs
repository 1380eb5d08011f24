pub mod auth;
pub mod health;
pub mod market;
pub mod trading;
pub mod wallet;

use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/trading", trading::router())
        .nest("/api/wallet", wallet::router())
        .nest("/api/market", market::router())
}
