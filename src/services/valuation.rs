//! Portfolio Valuator
//!
//! Read-only projection combining the wallet, the holdings cache, and live
//! quotes into a dashboard summary. Performs no mutation. A symbol with no
//! live quote is marked at its last fill price instead of failing the
//! whole valuation.

use std::sync::Arc;
use tracing::debug;

use crate::services::quotes::QuoteCache;
use crate::services::settlement::SettlementError;
use crate::services::sqlite_store::SqliteStore;
use crate::services::wallet::WalletLedger;
use crate::types::{PortfolioSummary, PositionValuation};

/// Portfolio valuation service.
pub struct PortfolioValuator {
    store: Arc<SqliteStore>,
    ledger: Arc<WalletLedger>,
    quotes: Arc<QuoteCache>,
}

impl PortfolioValuator {
    /// Create a new valuator.
    pub fn new(
        store: Arc<SqliteStore>,
        ledger: Arc<WalletLedger>,
        quotes: Arc<QuoteCache>,
    ) -> Self {
        Self {
            store,
            ledger,
            quotes,
        }
    }

    /// Value a user's portfolio at the latest quotes.
    pub fn valuate(&self, user_id: &str) -> Result<PortfolioSummary, SettlementError> {
        let wallet = self.ledger.get_or_create(user_id)?;
        let holdings = self.store.get_user_holdings(user_id);

        let mut positions = Vec::new();
        let mut invested_value = 0.0;
        let mut positions_value = 0.0;
        let mut unrealized_pnl = 0.0;
        let mut realized_pnl = 0.0;
        let mut day_change = 0.0;

        for holding in &holdings {
            realized_pnl += holding.realized_pnl;
            if !holding.is_open() {
                continue;
            }

            let quote = self.quotes.get(&holding.symbol);
            let (mark_price, change, quote_available) = match &quote {
                Some(q) => (q.price, q.change_today, true),
                None => {
                    debug!(
                        "No quote for {}, marking at last fill {}",
                        holding.symbol, holding.last_price
                    );
                    (holding.last_price, 0.0, false)
                }
            };

            let current_value = holding.quantity * mark_price;
            let invested = holding.invested_value();
            let position_day_change = holding.quantity * change;

            invested_value += invested;
            positions_value += current_value;
            unrealized_pnl += current_value - invested;
            day_change += position_day_change;

            positions.push(PositionValuation {
                symbol: holding.symbol.clone(),
                sector: holding.sector,
                quantity: holding.quantity,
                avg_buy_price: holding.avg_buy_price,
                mark_price,
                quote_available,
                current_value,
                invested_value: invested,
                unrealized_pnl: current_value - invested,
                day_change: position_day_change,
                allocation_pct: 0.0,
            });
        }

        let total_value = wallet.total() + positions_value;
        if total_value > 0.0 {
            for position in &mut positions {
                position.allocation_pct = position.current_value / total_value * 100.0;
            }
        }

        Ok(PortfolioSummary {
            user_id: user_id.to_string(),
            total_value,
            available_cash: wallet.balance,
            locked_cash: wallet.locked_balance,
            invested_value,
            unrealized_pnl,
            realized_pnl,
            day_change,
            positions,
        })
    }
}
