//! Settlement Service
//!
//! The order state machine: placement, confirmation, cancellation. Every
//! transition validates before any side effect, serializes per user, and
//! lands in the store as a single atomic write of order + wallet +
//! holding + journal. Status only ever moves `pending -> completed` or
//! `pending -> cancelled`.
//!
//! Placement policy: limit/stop buys reserve notional plus fees into the
//! wallet's locked balance at placement and get them released on cancel;
//! market buys move nothing until confirmation. Reservations and releases
//! shuffle cash between the two wallet buckets without changing the total,
//! so neither is journaled; the journal records external movements and
//! settlements only.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::services::fees::FeeSchedule;
use crate::services::holdings;
use crate::services::quotes::QuoteCache;
use crate::services::sqlite_store::SqliteStore;
use crate::services::wallet::WalletLedger;
use crate::types::{
    Holding, Order, OrderKind, OrderSide, OrderStatus, PlaceOrderRequest, Transaction,
    TransactionType,
};

/// Settlement errors. None of these are retried internally; each carries
/// enough detail for the caller to decide between retry and abort.
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: f64, available: f64 },

    #[error("Insufficient holdings in {symbol}: selling {requested}, have {available}")]
    InsufficientHoldings {
        symbol: String,
        requested: f64,
        available: f64,
    },

    #[error("Invalid wallet credential")]
    InvalidCredential,

    #[error("Order is already {0}")]
    OrderAlreadyFinal(OrderStatus),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    #[error("No price available for {0}")]
    PriceUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for SettlementError {
    fn from(e: rusqlite::Error) -> Self {
        SettlementError::Database(e.to_string())
    }
}

/// Order settlement service.
pub struct SettlementService {
    store: Arc<SqliteStore>,
    ledger: Arc<WalletLedger>,
    quotes: Arc<QuoteCache>,
    fees: FeeSchedule,
}

impl SettlementService {
    /// Create a new settlement service.
    pub fn new(
        store: Arc<SqliteStore>,
        ledger: Arc<WalletLedger>,
        quotes: Arc<QuoteCache>,
        fees: FeeSchedule,
    ) -> Self {
        Self {
            store,
            ledger,
            quotes,
            fees,
        }
    }

    // ==========================================================================
    // Placement
    // ==========================================================================

    /// Place a new order as `pending`. Limit/stop buys reserve
    /// notional + fees from the wallet; nothing else moves money here.
    pub fn place_order(
        &self,
        user_id: &str,
        request: PlaceOrderRequest,
    ) -> Result<Order, SettlementError> {
        if request.quantity <= 0.0 {
            return Err(SettlementError::Validation(
                "quantity must be positive".to_string(),
            ));
        }

        let price = match request.kind {
            // Market orders resolve their price at confirmation
            OrderKind::Market => None,
            OrderKind::Limit | OrderKind::Stop => match request.price {
                Some(p) if p > 0.0 => Some(p),
                _ => {
                    return Err(SettlementError::Validation(format!(
                        "{} order requires a positive price",
                        request.kind
                    )))
                }
            },
        };

        let mut order = Order::new(
            user_id.to_string(),
            request.symbol,
            request.sector,
            request.side,
            request.kind,
            request.quantity,
            price,
        );

        if let Some(notional) = order.notional() {
            order.fees = self.fees.compute(notional, order.kind, order.side);
        }

        if order.reserves_at_placement() {
            let lock = self.ledger.user_lock(user_id);
            let _held = lock.lock().unwrap();

            let mut wallet = self.ledger.get_or_create(user_id)?;
            let reserve = order.notional().unwrap_or(0.0) + order.fees.total();
            WalletLedger::lock_funds(&mut wallet, reserve)?;
            self.store.apply_placement(&order, Some(&wallet))?;

            info!(
                "Placed {} {} order {} for {} ({} reserved)",
                order.side, order.kind, order.id, user_id, reserve
            );
        } else {
            self.store.apply_placement(&order, None)?;
            info!(
                "Placed {} {} order {} for {}",
                order.side, order.kind, order.id, user_id
            );
        }

        Ok(order)
    }

    // ==========================================================================
    // Confirmation
    // ==========================================================================

    /// Confirm a pending order: step-up credential check, then settle.
    /// On any failure before the store write the order stays `pending`
    /// and the wallet is untouched.
    pub fn confirm_order(
        &self,
        user_id: &str,
        order_id: &str,
        credential: &str,
    ) -> Result<Order, SettlementError> {
        let lock = self.ledger.user_lock(user_id);
        let _held = lock.lock().unwrap();

        let mut order = self.owned_order(user_id, order_id)?;
        if order.is_terminal() {
            return Err(SettlementError::OrderAlreadyFinal(order.status));
        }

        // Confirmation moves money: re-authenticate the wallet credential
        // on top of session auth.
        self.ledger.verify_credential(user_id, credential)?;

        let price = match order.price {
            Some(p) => p,
            None => self
                .quotes
                .price(&order.symbol)
                .ok_or_else(|| SettlementError::PriceUnavailable(order.symbol.clone()))?,
        };
        let notional = order.quantity * price;

        // Market orders only learn their fees now that the price is known
        if order.kind == OrderKind::Market {
            order.fees = self.fees.compute(notional, order.kind, order.side);
        }

        let mut wallet = self.ledger.get_or_create(user_id)?;

        // Settlement time is the holdings fold key; keep it strictly
        // increasing per user so two fills in the same millisecond still
        // fold in an unambiguous order.
        let mut now = chrono::Utc::now().timestamp_millis();
        if let Some(prev) = self.store.latest_completed_at(user_id) {
            if now <= prev {
                now = prev + 1;
            }
        }
        order.price = Some(price);
        order.status = OrderStatus::Completed;
        order.updated_at = now;
        order.completed_at = Some(now);

        let (amount, txn_type) = match order.side {
            OrderSide::Buy => {
                let total = notional + order.fees.total();
                if order.reserves_at_placement() {
                    // Release the reservation, then pay from the available
                    // balance it returned to.
                    WalletLedger::unlock_funds(&mut wallet, total)?;
                }
                WalletLedger::debit(&mut wallet, total)?;
                (total, TransactionType::Buy)
            }
            OrderSide::Sell => {
                // Sells are fee-free under current policy; proceeds are
                // the full notional.
                WalletLedger::credit(&mut wallet, notional);
                (notional, TransactionType::Sell)
            }
        };

        // Fold the fill before writing anything: an oversell aborts here
        // with the wallet untouched on disk.
        let existing = self.store.get_holding(user_id, &order.symbol);
        let holding = holdings::apply_fill(existing.as_ref(), &order, price)?;

        let txn = Transaction::for_order(
            user_id.to_string(),
            txn_type,
            amount,
            order.symbol.clone(),
            price,
            order.quantity,
            order.fees,
            order.id.clone(),
        );

        if !self.store.apply_settlement(&order, &wallet, &holding, &txn)? {
            // Lost the conditional update: another call finalized it first
            warn!("Order {} was finalized concurrently", order.id);
            let status = self
                .store
                .get_order(order_id)
                .map(|o| o.status)
                .unwrap_or(OrderStatus::Cancelled);
            return Err(SettlementError::OrderAlreadyFinal(status));
        }

        info!(
            "Settled {} order {}: {} x {} @ {} ({} {})",
            order.side, order.id, order.quantity, order.symbol, price, txn_type, amount
        );
        Ok(order)
    }

    // ==========================================================================
    // Cancellation
    // ==========================================================================

    /// Cancel a pending order. Reserved funds (limit/stop buys) are
    /// released back to the available balance. No cash enters or leaves
    /// the wallet either way, so cancellation writes no journal entry.
    pub fn cancel_order(&self, user_id: &str, order_id: &str) -> Result<Order, SettlementError> {
        let lock = self.ledger.user_lock(user_id);
        let _held = lock.lock().unwrap();

        let mut order = self.owned_order(user_id, order_id)?;
        if order.is_terminal() {
            return Err(SettlementError::OrderAlreadyFinal(order.status));
        }

        order.status = OrderStatus::Cancelled;
        order.updated_at = chrono::Utc::now().timestamp_millis();

        let applied = if order.reserves_at_placement() {
            let mut wallet = self.ledger.get_or_create(user_id)?;
            let reserved = order.notional().unwrap_or(0.0) + order.fees.total();
            WalletLedger::unlock_funds(&mut wallet, reserved)?;

            self.store.apply_cancellation(&order, Some(&wallet))?
        } else {
            self.store.apply_cancellation(&order, None)?
        };

        if !applied {
            warn!("Order {} was finalized concurrently", order.id);
            let status = self
                .store
                .get_order(order_id)
                .map(|o| o.status)
                .unwrap_or(OrderStatus::Completed);
            return Err(SettlementError::OrderAlreadyFinal(status));
        }

        info!("Cancelled order {} for {}", order.id, user_id);
        Ok(order)
    }

    // ==========================================================================
    // Reads
    // ==========================================================================

    /// Get one of the user's orders.
    pub fn get_order(&self, user_id: &str, order_id: &str) -> Result<Order, SettlementError> {
        self.owned_order(user_id, order_id)
    }

    /// List the user's orders, newest first.
    pub fn list_orders(
        &self,
        user_id: &str,
        status: Option<OrderStatus>,
        limit: usize,
    ) -> Vec<Order> {
        self.store.get_user_orders(user_id, status, limit)
    }

    /// Get the user's holdings from the cache.
    pub fn get_holdings(&self, user_id: &str) -> Vec<Holding> {
        self.store.get_user_holdings(user_id)
    }

    /// Rebuild the holdings cache from the completed-order log. The log is
    /// the source of truth; the refold always reproduces the cache.
    pub fn rebuild_holdings(&self, user_id: &str) -> Result<Vec<Holding>, SettlementError> {
        let lock = self.ledger.user_lock(user_id);
        let _held = lock.lock().unwrap();

        let orders = self.store.get_completed_orders_asc(user_id);
        let folded = holdings::fold_orders(&orders)?;

        let mut rebuilt: Vec<Holding> = folded.into_values().collect();
        rebuilt.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        self.store.replace_holdings(user_id, &rebuilt)?;
        Ok(rebuilt)
    }

    fn owned_order(&self, user_id: &str, order_id: &str) -> Result<Order, SettlementError> {
        let order = self
            .store
            .get_order(order_id)
            .ok_or_else(|| SettlementError::OrderNotFound(order_id.to_string()))?;

        // Another user's order is indistinguishable from a missing one
        if order.user_id != user_id {
            return Err(SettlementError::OrderNotFound(order_id.to_string()));
        }
        Ok(order)
    }
}
