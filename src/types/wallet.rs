//! Wallet and Transaction Types
//!
//! The wallet holds a user's synthetic cash; the transaction journal is the
//! append-only record of every money movement and the source of truth for
//! balance-trend and P&L analytics.

use serde::{Deserialize, Serialize};

use super::trading::FeeBreakdown;

/// A user's cash wallet. One per user, created on first touch, never
/// deleted. Mutated only through the wallet ledger; `balance` and
/// `locked_balance` can never go negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// Owner's user ID
    pub user_id: String,
    /// Available cash
    pub balance: f64,
    /// Cash reserved for pending limit/stop buy orders
    pub locked_balance: f64,
    /// When the wallet was created (ms)
    pub created_at: i64,
    /// When the wallet was last updated (ms)
    pub updated_at: i64,
}

impl Wallet {
    /// Create an empty wallet for a user.
    pub fn new(user_id: String) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            user_id,
            balance: 0.0,
            locked_balance: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Total cash including reserved funds.
    pub fn total(&self) -> f64 {
        self.balance + self.locked_balance
    }
}

/// Kind of money movement recorded in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Cash out for a settled buy order
    Buy,
    /// Cash in from a settled sell order
    Sell,
    /// External deposit confirmed by the payment collaborator
    Deposit,
    /// Withdrawal of available cash
    Withdraw,
    /// Generic debit adjustment
    Debit,
    /// Generic credit adjustment
    Credit,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Buy => write!(f, "buy"),
            TransactionType::Sell => write!(f, "sell"),
            TransactionType::Deposit => write!(f, "deposit"),
            TransactionType::Withdraw => write!(f, "withdraw"),
            TransactionType::Debit => write!(f, "debit"),
            TransactionType::Credit => write!(f, "credit"),
        }
    }
}

/// Journal entry status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Completed,
    Failed,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Completed => write!(f, "completed"),
            TransactionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// An immutable journal entry. One is written per external money movement:
/// order settlement, deposit, withdrawal. Internal shuffles between the
/// available and locked balances are not journaled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique transaction ID
    pub id: String,
    /// Owner's user ID
    pub user_id: String,
    /// Symbol, for order-linked entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Movement kind
    pub txn_type: TransactionType,
    /// Cash amount moved (always positive; direction comes from the type)
    pub amount: f64,
    /// Execution price, for order-linked entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Quantity traded, for order-linked entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    /// Fee breakdown, for order-linked entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees: Option<FeeBreakdown>,
    /// Entry status
    pub status: TransactionStatus,
    /// Back-reference to the order that produced this entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// When the movement executed (ms)
    pub executed_at: i64,
}

impl Transaction {
    /// Create a cash-only entry (deposit, withdraw, credit, debit).
    pub fn cash(user_id: String, txn_type: TransactionType, amount: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            symbol: None,
            txn_type,
            amount,
            price: None,
            quantity: None,
            fees: None,
            status: TransactionStatus::Completed,
            order_id: None,
            executed_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Create an order-linked entry.
    pub fn for_order(
        user_id: String,
        txn_type: TransactionType,
        amount: f64,
        symbol: String,
        price: f64,
        quantity: f64,
        fees: FeeBreakdown,
        order_id: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            symbol: Some(symbol),
            txn_type,
            amount,
            price: Some(price),
            quantity: Some(quantity),
            fees: Some(fees),
            status: TransactionStatus::Completed,
            order_id: Some(order_id),
            executed_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}
