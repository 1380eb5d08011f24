pub mod fees;
pub mod holdings;
pub mod journal;
pub mod quotes;
pub mod settlement;
pub mod sqlite_store;
pub mod valuation;
pub mod wallet;

pub use fees::FeeSchedule;
pub use journal::TransactionJournal;
pub use quotes::QuoteCache;
pub use settlement::{SettlementError, SettlementService};
pub use sqlite_store::{SqliteStore, TransactionFilter};
pub use valuation::PortfolioValuator;
pub use wallet::WalletLedger;
