//! SQLite persistence layer for the settlement engine.
//!
//! Everything durable lives here: wallets, orders, the holdings cache, and
//! the append-only transaction journal. Settlement transitions mutate
//! several tables at once, so the store exposes composite operations that
//! run inside a single SQLite transaction; a partially applied transition
//! can never be observed.
//!
//! The order-status flip inside `apply_settlement` / `apply_cancellation`
//! is a conditional update on `status = 'pending'`. Zero affected rows
//! means another caller already finalized the order and the whole
//! transition rolls back.

use rusqlite::types::ToSql;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, error, info};

use crate::types::{
    FeeBreakdown, Holding, Order, OrderKind, OrderSide, OrderStatus, Sector, Transaction,
    TransactionStatus, TransactionType, Wallet,
};

/// Filter for journal queries.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub txn_type: Option<TransactionType>,
    pub symbol: Option<String>,
    /// Inclusive lower bound on executed_at (ms)
    pub from: Option<i64>,
    /// Inclusive upper bound on executed_at (ms)
    pub to: Option<i64>,
    pub limit: Option<usize>,
}

/// SQLite store for wallets, orders, holdings, and the journal.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SQLite store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("SQLite store initialized");
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing).
    pub fn new_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory SQLite store initialized");
        Ok(store)
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS wallets (
                user_id TEXT PRIMARY KEY,
                balance REAL NOT NULL,
                locked_balance REAL NOT NULL,
                credential_salt TEXT,
                credential_hash TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS orders (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                symbol TEXT NOT NULL,
                sector TEXT NOT NULL,
                side TEXT NOT NULL,
                kind TEXT NOT NULL,
                quantity REAL NOT NULL,
                price REAL,
                brokerage_fee REAL NOT NULL,
                convenience_fee REAL NOT NULL,
                status TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                completed_at INTEGER
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_orders_user ON orders(user_id, created_at)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_orders_user_status ON orders(user_id, status)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS holdings (
                user_id TEXT NOT NULL,
                symbol TEXT NOT NULL,
                sector TEXT NOT NULL,
                quantity REAL NOT NULL,
                avg_buy_price REAL NOT NULL,
                total_cost REAL NOT NULL,
                total_sell_value REAL NOT NULL,
                realized_pnl REAL NOT NULL,
                buy_date INTEGER NOT NULL,
                sell_date INTEGER,
                holding_period_days INTEGER,
                last_price REAL NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (user_id, symbol)
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                symbol TEXT,
                txn_type TEXT NOT NULL,
                amount REAL NOT NULL,
                price REAL,
                quantity REAL,
                brokerage_fee REAL,
                convenience_fee REAL,
                status TEXT NOT NULL,
                order_id TEXT,
                executed_at INTEGER NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_transactions_user
             ON transactions(user_id, executed_at)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_transactions_order ON transactions(order_id)",
            [],
        )?;

        info!("SQLite schema initialized");
        Ok(())
    }

    // ========== Wallet Methods ==========

    /// Create a wallet row.
    pub fn create_wallet(&self, wallet: &Wallet) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO wallets (user_id, balance, locked_balance, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                wallet.user_id,
                wallet.balance,
                wallet.locked_balance,
                wallet.created_at,
                wallet.updated_at,
            ],
        )?;
        debug!("Created wallet for {}", wallet.user_id);
        Ok(())
    }

    /// Get a wallet by user ID.
    pub fn get_wallet(&self, user_id: &str) -> Option<Wallet> {
        let conn = self.conn.lock().unwrap();
        let result = conn.query_row(
            "SELECT user_id, balance, locked_balance, created_at, updated_at
             FROM wallets WHERE user_id = ?1",
            params![user_id],
            wallet_from_row,
        );

        match result {
            Ok(wallet) => Some(wallet),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => {
                error!("Error fetching wallet: {}", e);
                None
            }
        }
    }

    /// Store the salted credential hash for a wallet.
    pub fn set_credential(
        &self,
        user_id: &str,
        salt: &str,
        hash: &str,
    ) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let now = chrono::Utc::now().timestamp_millis();
        conn.execute(
            "UPDATE wallets SET credential_salt = ?1, credential_hash = ?2, updated_at = ?3
             WHERE user_id = ?4",
            params![salt, hash, now, user_id],
        )?;
        Ok(())
    }

    /// Get the stored credential salt and hash, if set.
    pub fn get_credential(&self, user_id: &str) -> Option<(String, String)> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT credential_salt, credential_hash FROM wallets WHERE user_id = ?1",
            params![user_id],
            |row| {
                let salt: Option<String> = row.get(0)?;
                let hash: Option<String> = row.get(1)?;
                Ok(salt.zip(hash))
            },
        )
        .ok()
        .flatten()
    }

    // ========== Order Methods ==========

    /// Get an order by ID.
    pub fn get_order(&self, order_id: &str) -> Option<Order> {
        let conn = self.conn.lock().unwrap();
        let result = conn.query_row(
            &format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"),
            params![order_id],
            order_from_row,
        );

        match result {
            Ok(order) => Some(order),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => {
                error!("Error fetching order: {}", e);
                None
            }
        }
    }

    /// Get a user's orders, newest first, optionally filtered by status.
    pub fn get_user_orders(
        &self,
        user_id: &str,
        status: Option<OrderStatus>,
        limit: usize,
    ) -> Vec<Order> {
        let conn = self.conn.lock().unwrap();

        let (query, params): (String, Vec<Box<dyn ToSql>>) = match status {
            Some(status) => (
                format!(
                    "SELECT {ORDER_COLUMNS} FROM orders
                     WHERE user_id = ?1 AND status = ?2
                     ORDER BY created_at DESC LIMIT ?3"
                ),
                vec![
                    Box::new(user_id.to_string()),
                    Box::new(status.to_string()),
                    Box::new(limit as i64),
                ],
            ),
            None => (
                format!(
                    "SELECT {ORDER_COLUMNS} FROM orders
                     WHERE user_id = ?1
                     ORDER BY created_at DESC LIMIT ?2"
                ),
                vec![Box::new(user_id.to_string()), Box::new(limit as i64)],
            ),
        };

        let mut stmt = match conn.prepare(&query) {
            Ok(stmt) => stmt,
            Err(e) => {
                error!("Error preparing order query: {}", e);
                return Vec::new();
            }
        };

        stmt.query_map(params_from_iter(params.iter()), order_from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    /// Get a user's completed orders sorted ascending by settlement time,
    /// the input sequence for the holdings fold. Settlement time is the
    /// fold key because the incremental cache folds fills as they settle,
    /// not as they were placed.
    pub fn get_completed_orders_asc(&self, user_id: &str) -> Vec<Order> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = match conn.prepare(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE user_id = ?1 AND status = 'completed'
             ORDER BY completed_at ASC"
        )) {
            Ok(stmt) => stmt,
            Err(e) => {
                error!("Error preparing completed-order query: {}", e);
                return Vec::new();
            }
        };

        stmt.query_map(params![user_id], order_from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    /// Latest settlement timestamp across a user's completed orders.
    pub fn latest_completed_at(&self, user_id: &str) -> Option<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT MAX(completed_at) FROM orders
             WHERE user_id = ?1 AND status = 'completed'",
            params![user_id],
            |row| row.get::<_, Option<i64>>(0),
        )
        .ok()
        .flatten()
    }

    // ========== Holding Methods ==========

    /// Get the holding for a (user, symbol) pair.
    pub fn get_holding(&self, user_id: &str, symbol: &str) -> Option<Holding> {
        let conn = self.conn.lock().unwrap();
        let result = conn.query_row(
            &format!(
                "SELECT {HOLDING_COLUMNS} FROM holdings WHERE user_id = ?1 AND symbol = ?2"
            ),
            params![user_id, symbol],
            holding_from_row,
        );

        match result {
            Ok(holding) => Some(holding),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => {
                error!("Error fetching holding: {}", e);
                None
            }
        }
    }

    /// Get all of a user's holdings (open and closed).
    pub fn get_user_holdings(&self, user_id: &str) -> Vec<Holding> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = match conn.prepare(&format!(
            "SELECT {HOLDING_COLUMNS} FROM holdings WHERE user_id = ?1 ORDER BY symbol"
        )) {
            Ok(stmt) => stmt,
            Err(e) => {
                error!("Error preparing holdings query: {}", e);
                return Vec::new();
            }
        };

        stmt.query_map(params![user_id], holding_from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    /// Replace all of a user's holdings with a freshly folded set.
    pub fn replace_holdings(
        &self,
        user_id: &str,
        holdings: &[Holding],
    ) -> Result<(), rusqlite::Error> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM holdings WHERE user_id = ?1", params![user_id])?;
        for holding in holdings {
            upsert_holding_tx(&tx, holding)?;
        }

        tx.commit()?;
        info!("Rebuilt {} holdings for {}", holdings.len(), user_id);
        Ok(())
    }

    // ========== Journal Methods ==========

    /// Append a journal entry outside of a settlement transition.
    pub fn insert_transaction(&self, txn: &Transaction) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        insert_transaction_conn(&conn, txn)
    }

    /// Query journal entries for a user. `ascending` selects reconstruction
    /// order; display uses descending.
    pub fn get_transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
        ascending: bool,
    ) -> Vec<Transaction> {
        let conn = self.conn.lock().unwrap();

        let mut clauses = vec!["user_id = ?1".to_string()];
        let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(user_id.to_string())];

        if let Some(txn_type) = filter.txn_type {
            params.push(Box::new(txn_type.to_string()));
            clauses.push(format!("txn_type = ?{}", params.len()));
        }
        if let Some(ref symbol) = filter.symbol {
            params.push(Box::new(symbol.clone()));
            clauses.push(format!("symbol = ?{}", params.len()));
        }
        if let Some(from) = filter.from {
            params.push(Box::new(from));
            clauses.push(format!("executed_at >= ?{}", params.len()));
        }
        if let Some(to) = filter.to {
            params.push(Box::new(to));
            clauses.push(format!("executed_at <= ?{}", params.len()));
        }

        let direction = if ascending { "ASC" } else { "DESC" };
        params.push(Box::new(filter.limit.unwrap_or(500) as i64));
        let query = format!(
            "SELECT {TXN_COLUMNS} FROM transactions
             WHERE {}
             ORDER BY executed_at {direction} LIMIT ?{}",
            clauses.join(" AND "),
            params.len()
        );

        let mut stmt = match conn.prepare(&query) {
            Ok(stmt) => stmt,
            Err(e) => {
                error!("Error preparing transaction query: {}", e);
                return Vec::new();
            }
        };

        stmt.query_map(params_from_iter(params.iter()), transaction_from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    /// Count journal entries linked to an order.
    pub fn transaction_count_for_order(&self, order_id: &str) -> usize {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE order_id = ?1",
            params![order_id],
            |row| row.get::<_, i64>(0),
        )
        .map(|n| n as usize)
        .unwrap_or(0)
    }

    // ========== Composite Transition Methods ==========

    /// Persist a placement: the pending order plus, for limit/stop buys,
    /// the wallet row with funds moved into `locked_balance`.
    pub fn apply_placement(
        &self,
        order: &Order,
        wallet: Option<&Wallet>,
    ) -> Result<(), rusqlite::Error> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        insert_order_tx(&tx, order)?;
        if let Some(wallet) = wallet {
            update_wallet_tx(&tx, wallet)?;
        }

        tx.commit()
    }

    /// Settle an order atomically: flip it to `completed` (only if still
    /// pending), write the wallet, upsert the holding, and append the
    /// journal entry. Returns false if the order was no longer pending;
    /// in that case nothing was written.
    pub fn apply_settlement(
        &self,
        order: &Order,
        wallet: &Wallet,
        holding: &Holding,
        txn: &Transaction,
    ) -> Result<bool, rusqlite::Error> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let changed = tx.execute(
            "UPDATE orders
             SET status = 'completed', price = ?1, brokerage_fee = ?2, convenience_fee = ?3,
                 updated_at = ?4, completed_at = ?5
             WHERE id = ?6 AND status = 'pending'",
            params![
                order.price,
                order.fees.brokerage,
                order.fees.convenience,
                order.updated_at,
                order.completed_at,
                order.id,
            ],
        )?;
        if changed == 0 {
            tx.rollback()?;
            return Ok(false);
        }

        update_wallet_tx(&tx, wallet)?;
        upsert_holding_tx(&tx, holding)?;
        insert_transaction_conn(&tx, txn)?;

        tx.commit()?;
        Ok(true)
    }

    /// Cancel an order atomically: flip it to `cancelled` (only if still
    /// pending) and, when reserved funds are being released, write the
    /// wallet. The release moves cash between `locked_balance` and
    /// `balance` without changing the total, so no journal entry is
    /// written. Returns false if the order was no longer pending.
    pub fn apply_cancellation(
        &self,
        order: &Order,
        wallet: Option<&Wallet>,
    ) -> Result<bool, rusqlite::Error> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let changed = tx.execute(
            "UPDATE orders SET status = 'cancelled', updated_at = ?1
             WHERE id = ?2 AND status = 'pending'",
            params![order.updated_at, order.id],
        )?;
        if changed == 0 {
            tx.rollback()?;
            return Ok(false);
        }

        if let Some(wallet) = wallet {
            update_wallet_tx(&tx, wallet)?;
        }

        tx.commit()?;
        Ok(true)
    }

    /// Apply a standalone cash movement (deposit/withdraw): wallet write
    /// and journal append succeed or fail together.
    pub fn apply_cash_movement(
        &self,
        wallet: &Wallet,
        txn: &Transaction,
    ) -> Result<(), rusqlite::Error> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        update_wallet_tx(&tx, wallet)?;
        insert_transaction_conn(&tx, txn)?;

        tx.commit()
    }
}

// =============================================================================
// Row mapping
// =============================================================================

const ORDER_COLUMNS: &str = "id, user_id, symbol, sector, side, kind, quantity, price, \
     brokerage_fee, convenience_fee, status, created_at, updated_at, completed_at";

const HOLDING_COLUMNS: &str = "user_id, symbol, sector, quantity, avg_buy_price, total_cost, \
     total_sell_value, realized_pnl, buy_date, sell_date, holding_period_days, last_price, \
     updated_at";

const TXN_COLUMNS: &str = "id, user_id, symbol, txn_type, amount, price, quantity, \
     brokerage_fee, convenience_fee, status, order_id, executed_at";

fn wallet_from_row(row: &Row<'_>) -> Result<Wallet, rusqlite::Error> {
    Ok(Wallet {
        user_id: row.get(0)?,
        balance: row.get(1)?,
        locked_balance: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn order_from_row(row: &Row<'_>) -> Result<Order, rusqlite::Error> {
    Ok(Order {
        id: row.get(0)?,
        user_id: row.get(1)?,
        symbol: row.get(2)?,
        sector: parse_sector(&row.get::<_, String>(3)?),
        side: parse_side(&row.get::<_, String>(4)?),
        kind: parse_kind(&row.get::<_, String>(5)?),
        quantity: row.get(6)?,
        price: row.get(7)?,
        fees: FeeBreakdown {
            brokerage: row.get(8)?,
            convenience: row.get(9)?,
        },
        status: parse_status(&row.get::<_, String>(10)?),
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
        completed_at: row.get(13)?,
    })
}

fn holding_from_row(row: &Row<'_>) -> Result<Holding, rusqlite::Error> {
    Ok(Holding {
        user_id: row.get(0)?,
        symbol: row.get(1)?,
        sector: parse_sector(&row.get::<_, String>(2)?),
        quantity: row.get(3)?,
        avg_buy_price: row.get(4)?,
        total_cost: row.get(5)?,
        total_sell_value: row.get(6)?,
        realized_pnl: row.get(7)?,
        buy_date: row.get(8)?,
        sell_date: row.get(9)?,
        holding_period_days: row.get(10)?,
        last_price: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

fn transaction_from_row(row: &Row<'_>) -> Result<Transaction, rusqlite::Error> {
    let brokerage: Option<f64> = row.get(7)?;
    let convenience: Option<f64> = row.get(8)?;
    let fees = match (brokerage, convenience) {
        (Some(brokerage), Some(convenience)) => Some(FeeBreakdown { brokerage, convenience }),
        _ => None,
    };

    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        symbol: row.get(2)?,
        txn_type: parse_txn_type(&row.get::<_, String>(3)?),
        amount: row.get(4)?,
        price: row.get(5)?,
        quantity: row.get(6)?,
        fees,
        status: parse_txn_status(&row.get::<_, String>(9)?),
        order_id: row.get(10)?,
        executed_at: row.get(11)?,
    })
}

fn insert_order_tx(conn: &Connection, order: &Order) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO orders
         (id, user_id, symbol, sector, side, kind, quantity, price,
          brokerage_fee, convenience_fee, status, created_at, updated_at, completed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            order.id,
            order.user_id,
            order.symbol,
            order.sector.to_string(),
            order.side.to_string(),
            order.kind.to_string(),
            order.quantity,
            order.price,
            order.fees.brokerage,
            order.fees.convenience,
            order.status.to_string(),
            order.created_at,
            order.updated_at,
            order.completed_at,
        ],
    )?;
    Ok(())
}

fn update_wallet_tx(conn: &Connection, wallet: &Wallet) -> Result<(), rusqlite::Error> {
    conn.execute(
        "UPDATE wallets SET balance = ?1, locked_balance = ?2, updated_at = ?3
         WHERE user_id = ?4",
        params![
            wallet.balance,
            wallet.locked_balance,
            wallet.updated_at,
            wallet.user_id,
        ],
    )?;
    Ok(())
}

fn upsert_holding_tx(conn: &Connection, holding: &Holding) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO holdings
         (user_id, symbol, sector, quantity, avg_buy_price, total_cost, total_sell_value,
          realized_pnl, buy_date, sell_date, holding_period_days, last_price, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
         ON CONFLICT(user_id, symbol) DO UPDATE SET
            sector = excluded.sector,
            quantity = excluded.quantity,
            avg_buy_price = excluded.avg_buy_price,
            total_cost = excluded.total_cost,
            total_sell_value = excluded.total_sell_value,
            realized_pnl = excluded.realized_pnl,
            buy_date = excluded.buy_date,
            sell_date = excluded.sell_date,
            holding_period_days = excluded.holding_period_days,
            last_price = excluded.last_price,
            updated_at = excluded.updated_at",
        params![
            holding.user_id,
            holding.symbol,
            holding.sector.to_string(),
            holding.quantity,
            holding.avg_buy_price,
            holding.total_cost,
            holding.total_sell_value,
            holding.realized_pnl,
            holding.buy_date,
            holding.sell_date,
            holding.holding_period_days,
            holding.last_price,
            holding.updated_at,
        ],
    )?;
    Ok(())
}

fn insert_transaction_conn(conn: &Connection, txn: &Transaction) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO transactions
         (id, user_id, symbol, txn_type, amount, price, quantity,
          brokerage_fee, convenience_fee, status, order_id, executed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            txn.id,
            txn.user_id,
            txn.symbol,
            txn.txn_type.to_string(),
            txn.amount,
            txn.price,
            txn.quantity,
            txn.fees.map(|f| f.brokerage),
            txn.fees.map(|f| f.convenience),
            txn.status.to_string(),
            txn.order_id,
            txn.executed_at,
        ],
    )?;
    Ok(())
}

// =============================================================================
// Enum parsing (TEXT columns round-trip through Display)
// =============================================================================

fn parse_sector(s: &str) -> Sector {
    match s {
        "crypto" => Sector::Crypto,
        _ => Sector::Market,
    }
}

fn parse_side(s: &str) -> OrderSide {
    match s {
        "sell" => OrderSide::Sell,
        _ => OrderSide::Buy,
    }
}

fn parse_kind(s: &str) -> OrderKind {
    match s {
        "limit" => OrderKind::Limit,
        "stop" => OrderKind::Stop,
        _ => OrderKind::Market,
    }
}

fn parse_status(s: &str) -> OrderStatus {
    match s {
        "completed" => OrderStatus::Completed,
        "cancelled" => OrderStatus::Cancelled,
        _ => OrderStatus::Pending,
    }
}

fn parse_txn_type(s: &str) -> TransactionType {
    match s {
        "buy" => TransactionType::Buy,
        "sell" => TransactionType::Sell,
        "deposit" => TransactionType::Deposit,
        "withdraw" => TransactionType::Withdraw,
        "debit" => TransactionType::Debit,
        _ => TransactionType::Credit,
    }
}

fn parse_txn_status(s: &str) -> TransactionStatus {
    match s {
        "failed" => TransactionStatus::Failed,
        _ => TransactionStatus::Completed,
    }
}
