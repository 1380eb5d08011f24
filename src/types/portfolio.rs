//! Portfolio Types
//!
//! Holdings (the per-symbol position derived from completed orders), live
//! quotes consumed from the market-data collaborator, and the valuation
//! projections exposed to the dashboard.

use serde::{Deserialize, Serialize};

use super::trading::Sector;

/// Per-(user, symbol) position derived by folding completed orders in
/// chronological order. Persisted as a cache but always reconstructible
/// from the order log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// Owner's user ID
    pub user_id: String,
    /// Symbol
    pub symbol: String,
    /// Market sector
    pub sector: Sector,
    /// Running position size; reaches 0 on a close, never negative
    pub quantity: f64,
    /// Weighted average cost basis across the current lot's buys
    pub avg_buy_price: f64,
    /// Total cash spent on the current lot's buys
    pub total_cost: f64,
    /// Total cash received from the current lot's sells
    pub total_sell_value: f64,
    /// P&L crystallized across all closed lots
    pub realized_pnl: f64,
    /// First buy of the current lot (ms)
    pub buy_date: i64,
    /// Closing sell of the lot, once quantity reaches 0 (ms)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell_date: Option<i64>,
    /// Whole days between buy and closing sell, computed once on close
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holding_period_days: Option<i64>,
    /// Last fill price, used as the valuation fallback when no quote exists
    pub last_price: f64,
    /// When the holding was last folded into (ms)
    pub updated_at: i64,
}

impl Holding {
    /// Whether the position is currently open.
    pub fn is_open(&self) -> bool {
        self.quantity > 0.0
    }

    /// Cash currently invested in the open position.
    pub fn invested_value(&self) -> f64 {
        self.quantity * self.avg_buy_price
    }
}

/// Live quote consumed from the market-data collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    /// Last traded price
    pub price: f64,
    /// Absolute price change since the previous close
    #[serde(default)]
    pub change_today: f64,
}

/// Valuation of one open position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionValuation {
    pub symbol: String,
    pub sector: Sector,
    pub quantity: f64,
    pub avg_buy_price: f64,
    /// Price used for the mark (live quote, or last fill when no quote)
    pub mark_price: f64,
    /// Whether a live quote backed the mark
    pub quote_available: bool,
    pub current_value: f64,
    pub invested_value: f64,
    pub unrealized_pnl: f64,
    pub day_change: f64,
    /// Share of total portfolio value, in percent
    pub allocation_pct: f64,
}

/// Read-only portfolio projection combining wallet, holdings, and quotes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub user_id: String,
    /// Cash (available + locked) plus the marked value of open positions
    pub total_value: f64,
    pub available_cash: f64,
    pub locked_cash: f64,
    pub invested_value: f64,
    pub unrealized_pnl: f64,
    pub realized_pnl: f64,
    pub day_change: f64,
    pub positions: Vec<PositionValuation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holding_invested_value() {
        let holding = Holding {
            user_id: "user-1".to_string(),
            symbol: "BTC".to_string(),
            sector: Sector::Crypto,
            quantity: 2.0,
            avg_buy_price: 30_000.0,
            total_cost: 60_000.0,
            total_sell_value: 0.0,
            realized_pnl: 0.0,
            buy_date: 0,
            sell_date: None,
            holding_period_days: None,
            last_price: 31_000.0,
            updated_at: 0,
        };

        assert!(holding.is_open());
        assert_eq!(holding.invested_value(), 60_000.0);
    }

    #[test]
    fn test_quote_deserialization_defaults_change() {
        let quote: Quote = serde_json::from_str(r#"{"symbol":"AAPL","price":150.0}"#).unwrap();
        assert_eq!(quote.change_today, 0.0);
    }
}
