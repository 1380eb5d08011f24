//! Transaction Journal
//!
//! Append-only view over the transactions table. There is deliberately no
//! update or delete surface: once written, an entry is immutable, and the
//! journal is the source of truth for balance-trend and P&L analytics
//! independent of the derived holdings cache.

use std::sync::Arc;

use crate::services::settlement::SettlementError;
use crate::services::sqlite_store::{SqliteStore, TransactionFilter};
use crate::types::Transaction;

/// Append-only transaction journal.
pub struct TransactionJournal {
    store: Arc<SqliteStore>,
}

impl TransactionJournal {
    /// Create a journal over the store.
    pub fn new(store: Arc<SqliteStore>) -> Self {
        Self { store }
    }

    /// Append an entry outside of a settlement transition (settlement
    /// writes its entries inside its own atomic transaction).
    pub fn append(&self, entry: &Transaction) -> Result<String, SettlementError> {
        self.store.insert_transaction(entry)?;
        Ok(entry.id.clone())
    }

    /// List entries for display: newest first.
    pub fn list(&self, user_id: &str, filter: &TransactionFilter) -> Vec<Transaction> {
        self.store.get_transactions(user_id, filter, false)
    }

    /// List entries in reconstruction order: oldest first. This is the
    /// feed for balance-trend rebuilds.
    pub fn reconstruction_feed(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> Vec<Transaction> {
        self.store.get_transactions(user_id, filter, true)
    }
}
