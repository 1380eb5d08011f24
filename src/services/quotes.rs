//! Quote Cache
//!
//! In-memory cache of live quotes pushed in by the market-data
//! collaborator. The engine never fetches prices itself; it resolves
//! market-order execution prices and portfolio marks from whatever the
//! feed last pushed. Keys are lowercased symbols.

use dashmap::DashMap;
use tracing::debug;

use crate::types::Quote;

/// Thread-safe quote cache.
#[derive(Default)]
pub struct QuoteCache {
    quotes: DashMap<String, Quote>,
}

impl QuoteCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            quotes: DashMap::new(),
        }
    }

    /// Insert or replace the quote for a symbol.
    pub fn update(&self, quote: Quote) {
        let key = quote.symbol.to_lowercase();
        debug!("Quote update: {} @ {}", quote.symbol, quote.price);
        self.quotes.insert(key, quote);
    }

    /// Get the latest quote for a symbol.
    pub fn get(&self, symbol: &str) -> Option<Quote> {
        self.quotes.get(&symbol.to_lowercase()).map(|q| q.clone())
    }

    /// Get the latest price for a symbol.
    pub fn price(&self, symbol: &str) -> Option<f64> {
        self.get(symbol).map(|q| q.price)
    }

    /// Number of symbols with a live quote.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Whether the cache holds no quotes.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
