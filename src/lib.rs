//! Tally - Order settlement and portfolio ledger engine for retail trading

pub mod api;
pub mod config;
pub mod services;
pub mod types;

use std::sync::Arc;

use config::Config;
use services::{
    PortfolioValuator, QuoteCache, SettlementService, SqliteStore, TransactionJournal,
    WalletLedger,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<SqliteStore>,
    pub ledger: Arc<WalletLedger>,
    pub settlement: Arc<SettlementService>,
    pub valuator: Arc<PortfolioValuator>,
    pub journal: Arc<TransactionJournal>,
    pub quotes: Arc<QuoteCache>,
}

impl AppState {
    /// Wire up the full service graph over a store.
    pub fn new(config: Config, store: Arc<SqliteStore>) -> Self {
        let quotes = Arc::new(QuoteCache::new());
        let ledger = Arc::new(WalletLedger::new(store.clone()));
        let settlement = Arc::new(SettlementService::new(
            store.clone(),
            ledger.clone(),
            quotes.clone(),
            config.fee_schedule(),
        ));
        let valuator = Arc::new(PortfolioValuator::new(
            store.clone(),
            ledger.clone(),
            quotes.clone(),
        ));
        let journal = Arc::new(TransactionJournal::new(store.clone()));

        Self {
            config: Arc::new(config),
            store,
            ledger,
            settlement,
            valuator,
            journal,
            quotes,
        }
    }
}

// Re-export commonly used types
pub use types::*;
