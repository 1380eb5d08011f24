//! Holdings Aggregator
//!
//! Pure left-fold of completed orders into per-symbol positions. The fold
//! is deterministic: re-running it over the same order sequence always
//! reproduces the same holding, which is what makes the persisted holdings
//! table a cache rather than a source of truth.

use std::collections::HashMap;

use crate::services::settlement::SettlementError;
use crate::types::{Holding, Order, OrderSide, OrderStatus};

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Tolerance for float quantity arithmetic. Fractional fills (0.1 + 0.2
/// style quantities) can leave a ~1e-17 residue that would otherwise keep
/// a fully sold lot open forever.
const QTY_EPSILON: f64 = 1e-9;

/// Fold one completed order into the holding for its symbol.
///
/// Buys grow the position and re-derive the weighted average cost basis.
/// Sells shrink it; a sell larger than the open quantity is a precondition
/// violation the state machine must reject before calling this, so it is
/// surfaced as an error rather than clamped. When a sell closes the
/// position, realized P&L and the holding period are crystallized.
pub fn apply_fill(
    existing: Option<&Holding>,
    order: &Order,
    price: f64,
) -> Result<Holding, SettlementError> {
    let executed_at = order.executed_at();

    let mut holding = match existing {
        // A buy into a closed lot starts fresh cost-basis tracking;
        // realized P&L carries across lots.
        Some(h) if h.quantity > 0.0 || order.side == OrderSide::Sell => h.clone(),
        Some(h) => Holding {
            quantity: 0.0,
            avg_buy_price: 0.0,
            total_cost: 0.0,
            total_sell_value: 0.0,
            buy_date: executed_at,
            sell_date: None,
            holding_period_days: None,
            ..h.clone()
        },
        None => Holding {
            user_id: order.user_id.clone(),
            symbol: order.symbol.clone(),
            sector: order.sector,
            quantity: 0.0,
            avg_buy_price: 0.0,
            total_cost: 0.0,
            total_sell_value: 0.0,
            realized_pnl: 0.0,
            buy_date: executed_at,
            sell_date: None,
            holding_period_days: None,
            last_price: price,
            updated_at: executed_at,
        },
    };

    match order.side {
        OrderSide::Buy => {
            holding.total_cost += order.quantity * price;
            holding.quantity += order.quantity;
            holding.avg_buy_price = holding.total_cost / holding.quantity;
        }
        OrderSide::Sell => {
            if order.quantity > holding.quantity + QTY_EPSILON {
                return Err(SettlementError::InsufficientHoldings {
                    symbol: order.symbol.clone(),
                    requested: order.quantity,
                    available: holding.quantity,
                });
            }

            holding.total_sell_value += order.quantity * price;
            holding.quantity -= order.quantity;

            if holding.quantity <= QTY_EPSILON {
                holding.quantity = 0.0;
                holding.sell_date = Some(executed_at);
                holding.holding_period_days =
                    Some((executed_at - holding.buy_date) / MS_PER_DAY);
                holding.realized_pnl += holding.total_sell_value - holding.total_cost;
            }
        }
    }

    holding.last_price = price;
    holding.updated_at = executed_at;
    Ok(holding)
}

/// Rebuild all of a user's holdings from scratch by folding completed
/// orders sorted ascending by settlement time, the same order the
/// incremental cache saw them in.
pub fn fold_orders(orders: &[Order]) -> Result<HashMap<String, Holding>, SettlementError> {
    let mut holdings: HashMap<String, Holding> = HashMap::new();

    for order in orders {
        debug_assert_eq!(order.status, OrderStatus::Completed);
        let price = order.price.ok_or_else(|| {
            SettlementError::Validation(format!(
                "completed order {} has no execution price",
                order.id
            ))
        })?;

        let folded = apply_fill(holdings.get(&order.symbol), order, price)?;
        holdings.insert(order.symbol.clone(), folded);
    }

    Ok(holdings)
}
