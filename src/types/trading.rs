//! Trading Types
//!
//! Order lifecycle types and the request payloads accepted at the API
//! boundary. Every request is a tagged struct validated before it reaches
//! the settlement state machine.

use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Market sector an order trades in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    /// Equities / listed market instruments
    Market,
    /// Cryptocurrencies
    Crypto,
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sector::Market => write!(f, "market"),
            Sector::Crypto => write!(f, "crypto"),
        }
    }
}

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

/// Order kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    /// Execute at the live quote, price resolved at confirmation
    Market,
    /// Execute at the specified price
    Limit,
    /// Execute when price reaches the trigger
    Stop,
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderKind::Market => write!(f, "market"),
            OrderKind::Limit => write!(f, "limit"),
            OrderKind::Stop => write!(f, "stop"),
        }
    }
}

/// Order status. Transitions are one-directional: `pending -> completed`
/// or `pending -> cancelled`, nothing leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, awaiting confirmation or cancellation
    Pending,
    /// Settled: money moved, holdings updated
    Completed,
    /// Cancelled before settlement
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// =============================================================================
// Fees
// =============================================================================

/// Fee breakdown attached to an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    /// Brokerage fee (percentage of notional, clamped)
    pub brokerage: f64,
    /// Flat convenience fee
    pub convenience: f64,
}

impl FeeBreakdown {
    /// Total fee charged on top of notional.
    pub fn total(&self) -> f64 {
        self.brokerage + self.convenience
    }
}

// =============================================================================
// Order
// =============================================================================

/// A trade intent. Created on placement, mutated only by the settlement
/// state machine, never deleted (cancellation is a status change).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID
    pub id: String,
    /// Owner's user ID (opaque, issued by the session gateway)
    pub user_id: String,
    /// Symbol being traded (e.g., "BTC", "AAPL")
    pub symbol: String,
    /// Market sector
    pub sector: Sector,
    /// Buy or sell
    pub side: OrderSide,
    /// Order kind
    pub kind: OrderKind,
    /// Quantity to trade (always > 0)
    pub quantity: f64,
    /// Price per unit; None for market orders until confirmation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Fee breakdown resolved at placement (limit/stop) or confirmation (market)
    #[serde(default)]
    pub fees: FeeBreakdown,
    /// Current status
    pub status: OrderStatus,
    /// When the order was placed (ms)
    pub created_at: i64,
    /// When the order was last updated (ms)
    pub updated_at: i64,
    /// When the order settled (ms)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

impl Order {
    /// Create a new pending order.
    pub fn new(
        user_id: String,
        symbol: String,
        sector: Sector,
        side: OrderSide,
        kind: OrderKind,
        quantity: f64,
        price: Option<f64>,
    ) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            symbol,
            sector,
            side,
            kind,
            quantity,
            price,
            fees: FeeBreakdown::default(),
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Create a market order (price resolved at confirmation).
    pub fn market(
        user_id: String,
        symbol: String,
        sector: Sector,
        side: OrderSide,
        quantity: f64,
    ) -> Self {
        Self::new(user_id, symbol, sector, side, OrderKind::Market, quantity, None)
    }

    /// Create a limit order.
    pub fn limit(
        user_id: String,
        symbol: String,
        sector: Sector,
        side: OrderSide,
        quantity: f64,
        price: f64,
    ) -> Self {
        Self::new(user_id, symbol, sector, side, OrderKind::Limit, quantity, Some(price))
    }

    /// Check if the order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Notional value (quantity * price), if the price is known.
    pub fn notional(&self) -> Option<f64> {
        self.price.map(|p| self.quantity * p)
    }

    /// Whether funds were reserved into `locked_balance` at placement.
    /// Limit and stop buys reserve at create; market buys and all sells
    /// move nothing until confirmation.
    pub fn reserves_at_placement(&self) -> bool {
        self.side == OrderSide::Buy && self.kind != OrderKind::Market
    }

    /// Timestamp the order actually executed at, falling back to creation.
    pub fn executed_at(&self) -> i64 {
        self.completed_at.unwrap_or(self.created_at)
    }
}

// =============================================================================
// Request Payloads
// =============================================================================

/// Request to place a new order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub symbol: String,
    pub sector: Sector,
    pub side: OrderSide,
    pub kind: OrderKind,
    pub quantity: f64,
    /// Required for limit/stop orders, ignored for market orders
    #[serde(default)]
    pub price: Option<f64>,
}

/// Request to confirm a pending order. Confirmation moves money, so it
/// requires the wallet credential on top of session auth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmOrderRequest {
    pub credential: String,
}
