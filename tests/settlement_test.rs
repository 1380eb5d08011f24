//! Settlement engine integration tests
//!
//! Exercises the full order lifecycle over an in-memory store:
//! - Placement, confirmation, and cancellation
//! - Fund reservation for limit/stop buys and releases on cancel
//! - Fee charging and fee-free sells
//! - Terminal-state finality
//! - Holdings folding and cache rebuilds

use std::sync::Arc;

use tally::services::{
    FeeSchedule, QuoteCache, SettlementError, SettlementService, SqliteStore, TransactionFilter,
    WalletLedger,
};
use tally::types::*;

const USER: &str = "user-1";
const PIN: &str = "1234";

struct Engine {
    store: Arc<SqliteStore>,
    ledger: Arc<WalletLedger>,
    quotes: Arc<QuoteCache>,
    settlement: SettlementService,
}

fn engine_with_fees(fees: FeeSchedule) -> Engine {
    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    let ledger = Arc::new(WalletLedger::new(store.clone()));
    let quotes = Arc::new(QuoteCache::new());
    let settlement =
        SettlementService::new(store.clone(), ledger.clone(), quotes.clone(), fees);

    Engine {
        store,
        ledger,
        quotes,
        settlement,
    }
}

/// Engine with a flat 5.0 convenience fee on limit/stop orders.
fn engine() -> Engine {
    engine_with_fees(FeeSchedule {
        brokerage_rate: 0.0,
        brokerage_min: 0.0,
        brokerage_max: 0.0,
        convenience_flat: 5.0,
    })
}

fn funded_engine(balance: f64) -> Engine {
    let engine = engine();
    engine.ledger.deposit(USER, balance).unwrap();
    engine.ledger.set_credential(USER, PIN).unwrap();
    engine
}

fn limit_order(side: OrderSide, quantity: f64, price: f64) -> PlaceOrderRequest {
    PlaceOrderRequest {
        symbol: "AAPL".to_string(),
        sector: Sector::Market,
        side,
        kind: OrderKind::Limit,
        quantity,
        price: Some(price),
    }
}

fn market_buy(quantity: f64) -> PlaceOrderRequest {
    PlaceOrderRequest {
        symbol: "AAPL".to_string(),
        sector: Sector::Market,
        side: OrderSide::Buy,
        kind: OrderKind::Market,
        quantity,
        price: None,
    }
}

// =============================================================================
// Placement
// =============================================================================

#[test]
fn test_limit_buy_reserves_notional_plus_fees() {
    let engine = funded_engine(1_000.0);

    let order = engine
        .settlement
        .place_order(USER, limit_order(OrderSide::Buy, 5.0, 150.0))
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.fees.total(), 5.0);

    // 750 notional + 5 fee moved into the locked balance
    let wallet = engine.ledger.get_or_create(USER).unwrap();
    assert_eq!(wallet.balance, 245.0);
    assert_eq!(wallet.locked_balance, 755.0);
    assert_eq!(wallet.total(), 1_000.0);
}

#[test]
fn test_market_buy_reserves_nothing() {
    let engine = funded_engine(1_000.0);

    let order = engine.settlement.place_order(USER, market_buy(5.0)).unwrap();
    assert_eq!(order.kind, OrderKind::Market);
    assert_eq!(order.price, None);
    assert_eq!(order.fees.total(), 0.0);

    let wallet = engine.ledger.get_or_create(USER).unwrap();
    assert_eq!(wallet.balance, 1_000.0);
    assert_eq!(wallet.locked_balance, 0.0);
}

#[test]
fn test_placement_validation() {
    let engine = funded_engine(1_000.0);

    let err = engine
        .settlement
        .place_order(USER, limit_order(OrderSide::Buy, 0.0, 150.0))
        .unwrap_err();
    assert!(matches!(err, SettlementError::Validation(_)));

    let mut request = limit_order(OrderSide::Buy, 5.0, 150.0);
    request.price = None;
    let err = engine.settlement.place_order(USER, request).unwrap_err();
    assert!(matches!(err, SettlementError::Validation(_)));

    assert!(engine.settlement.list_orders(USER, None, 100).is_empty());
}

#[test]
fn test_placement_fails_on_insufficient_funds_without_creating_order() {
    let engine = funded_engine(100.0);

    let err = engine
        .settlement
        .place_order(USER, limit_order(OrderSide::Buy, 5.0, 150.0))
        .unwrap_err();
    assert!(matches!(err, SettlementError::InsufficientFunds { .. }));

    let wallet = engine.ledger.get_or_create(USER).unwrap();
    assert_eq!(wallet.balance, 100.0);
    assert_eq!(wallet.locked_balance, 0.0);
    assert!(engine.settlement.list_orders(USER, None, 100).is_empty());
}

// =============================================================================
// Confirmation
// =============================================================================

#[test]
fn test_buy_settlement_debits_wallet_and_opens_holding() {
    let engine = funded_engine(1_000.0);

    let order = engine
        .settlement
        .place_order(USER, limit_order(OrderSide::Buy, 5.0, 150.0))
        .unwrap();
    let settled = engine.settlement.confirm_order(USER, &order.id, PIN).unwrap();

    assert_eq!(settled.status, OrderStatus::Completed);
    assert!(settled.completed_at.is_some());

    // 1000 - (750 notional + 5 fee), reservation fully released
    let wallet = engine.ledger.get_or_create(USER).unwrap();
    assert_eq!(wallet.balance, 245.0);
    assert_eq!(wallet.locked_balance, 0.0);

    let holding = engine.store.get_holding(USER, "AAPL").unwrap();
    assert_eq!(holding.quantity, 5.0);
    assert_eq!(holding.avg_buy_price, 150.0);
    assert_eq!(holding.total_cost, 750.0);
    assert!(holding.is_open());

    // Exactly one journal entry, carrying the full cash amount
    assert_eq!(engine.store.transaction_count_for_order(&order.id), 1);
    let txns = engine
        .store
        .get_transactions(USER, &TransactionFilter::default(), false);
    let buy = txns.iter().find(|t| t.txn_type == TransactionType::Buy).unwrap();
    assert_eq!(buy.amount, 755.0);
    assert_eq!(buy.order_id.as_deref(), Some(order.id.as_str()));
}

#[test]
fn test_sell_settlement_credits_proceeds_and_closes_position() {
    let engine = funded_engine(1_000.0);

    let buy = engine
        .settlement
        .place_order(USER, limit_order(OrderSide::Buy, 5.0, 150.0))
        .unwrap();
    engine.settlement.confirm_order(USER, &buy.id, PIN).unwrap();

    let sell = engine
        .settlement
        .place_order(USER, limit_order(OrderSide::Sell, 5.0, 180.0))
        .unwrap();
    // Sells are fee-free under current policy
    assert_eq!(sell.fees.total(), 0.0);
    engine.settlement.confirm_order(USER, &sell.id, PIN).unwrap();

    // 245 after the buy + 900 proceeds
    let wallet = engine.ledger.get_or_create(USER).unwrap();
    assert_eq!(wallet.balance, 1_145.0);

    let holding = engine.store.get_holding(USER, "AAPL").unwrap();
    assert_eq!(holding.quantity, 0.0);
    assert_eq!(holding.realized_pnl, 150.0);
    assert!(holding.sell_date.is_some());
    assert!(holding.holding_period_days.is_some());
    assert!(!holding.is_open());
}

#[test]
fn test_market_order_settles_at_live_quote() {
    let engine = funded_engine(1_000.0);

    let order = engine.settlement.place_order(USER, market_buy(5.0)).unwrap();

    // No quote yet: the order stays pending
    let err = engine.settlement.confirm_order(USER, &order.id, PIN).unwrap_err();
    assert!(matches!(err, SettlementError::PriceUnavailable(_)));
    assert_eq!(
        engine.settlement.get_order(USER, &order.id).unwrap().status,
        OrderStatus::Pending
    );

    engine.quotes.update(Quote {
        symbol: "AAPL".to_string(),
        price: 150.0,
        change_today: 0.0,
    });
    let settled = engine.settlement.confirm_order(USER, &order.id, PIN).unwrap();

    assert_eq!(settled.price, Some(150.0));
    // Market orders skip the convenience fee, so the debit is bare notional
    let wallet = engine.ledger.get_or_create(USER).unwrap();
    assert_eq!(wallet.balance, 250.0);
}

#[test]
fn test_insufficient_funds_at_confirmation_keeps_order_pending() {
    let engine = funded_engine(100.0);
    engine.quotes.update(Quote {
        symbol: "AAPL".to_string(),
        price: 150.0,
        change_today: 0.0,
    });

    let order = engine.settlement.place_order(USER, market_buy(5.0)).unwrap();
    let err = engine.settlement.confirm_order(USER, &order.id, PIN).unwrap_err();
    assert!(matches!(err, SettlementError::InsufficientFunds { .. }));

    let wallet = engine.ledger.get_or_create(USER).unwrap();
    assert_eq!(wallet.balance, 100.0);
    assert_eq!(
        engine.settlement.get_order(USER, &order.id).unwrap().status,
        OrderStatus::Pending
    );
    assert_eq!(engine.store.transaction_count_for_order(&order.id), 0);
}

#[test]
fn test_invalid_credential_blocks_settlement() {
    let engine = funded_engine(1_000.0);

    let order = engine
        .settlement
        .place_order(USER, limit_order(OrderSide::Buy, 5.0, 150.0))
        .unwrap();

    let err = engine
        .settlement
        .confirm_order(USER, &order.id, "wrong")
        .unwrap_err();
    assert!(matches!(err, SettlementError::InvalidCredential));

    // Still pending, reservation still in place
    let wallet = engine.ledger.get_or_create(USER).unwrap();
    assert_eq!(wallet.locked_balance, 755.0);
    assert_eq!(wallet.total(), 1_000.0);
    assert_eq!(
        engine.settlement.get_order(USER, &order.id).unwrap().status,
        OrderStatus::Pending
    );
}

#[test]
fn test_oversell_is_rejected_without_side_effects() {
    let engine = funded_engine(1_000.0);

    let buy = engine
        .settlement
        .place_order(USER, limit_order(OrderSide::Buy, 2.0, 100.0))
        .unwrap();
    engine.settlement.confirm_order(USER, &buy.id, PIN).unwrap();
    let balance_before = engine.ledger.get_or_create(USER).unwrap().balance;

    let sell = engine
        .settlement
        .place_order(USER, limit_order(OrderSide::Sell, 5.0, 100.0))
        .unwrap();
    let err = engine.settlement.confirm_order(USER, &sell.id, PIN).unwrap_err();
    assert!(matches!(err, SettlementError::InsufficientHoldings { .. }));

    // Nothing was written: wallet, order, and holding are all untouched
    let wallet = engine.ledger.get_or_create(USER).unwrap();
    assert_eq!(wallet.balance, balance_before);
    assert_eq!(
        engine.settlement.get_order(USER, &sell.id).unwrap().status,
        OrderStatus::Pending
    );
    assert_eq!(engine.store.get_holding(USER, "AAPL").unwrap().quantity, 2.0);
}

// =============================================================================
// Cancellation
// =============================================================================

#[test]
fn test_cancel_releases_reserved_funds_without_journal_entry() {
    let engine = funded_engine(1_000.0);

    let order = engine
        .settlement
        .place_order(USER, limit_order(OrderSide::Buy, 2.0, 100.0))
        .unwrap();
    assert_eq!(engine.ledger.get_or_create(USER).unwrap().locked_balance, 205.0);

    let cancelled = engine.settlement.cancel_order(USER, &order.id).unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let wallet = engine.ledger.get_or_create(USER).unwrap();
    assert_eq!(wallet.balance, 1_000.0);
    assert_eq!(wallet.locked_balance, 0.0);

    // Reserve and release shuffle cash between the wallet's own buckets;
    // no external movement happened, so the journal records nothing
    assert_eq!(engine.store.transaction_count_for_order(&order.id), 0);
    let txns = engine
        .store
        .get_transactions(USER, &TransactionFilter::default(), false);
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].txn_type, TransactionType::Deposit);
}

#[test]
fn test_cancelled_reservation_keeps_journal_in_balance() {
    let engine = funded_engine(1_000.0);

    let order = engine
        .settlement
        .place_order(USER, limit_order(OrderSide::Buy, 2.0, 100.0))
        .unwrap();
    engine.settlement.cancel_order(USER, &order.id).unwrap();

    // Signed journal sum must still equal the wallet total
    let txns = engine
        .store
        .get_transactions(USER, &TransactionFilter::default(), true);
    let net: f64 = txns
        .iter()
        .map(|t| match t.txn_type {
            TransactionType::Deposit | TransactionType::Sell | TransactionType::Credit => t.amount,
            TransactionType::Withdraw | TransactionType::Buy | TransactionType::Debit => -t.amount,
        })
        .sum();

    let wallet = engine.ledger.get_or_create(USER).unwrap();
    assert_eq!(net, wallet.total());
    assert_eq!(net, 1_000.0);
}

#[test]
fn test_cancel_market_order_is_balance_neutral() {
    let engine = funded_engine(1_000.0);

    let order = engine.settlement.place_order(USER, market_buy(5.0)).unwrap();
    engine.settlement.cancel_order(USER, &order.id).unwrap();

    let wallet = engine.ledger.get_or_create(USER).unwrap();
    assert_eq!(wallet.balance, 1_000.0);
    assert_eq!(wallet.locked_balance, 0.0);
    // No money moved, so no journal entry
    assert_eq!(engine.store.transaction_count_for_order(&order.id), 0);
}

// =============================================================================
// Terminal finality
// =============================================================================

#[test]
fn test_terminal_orders_reject_further_transitions() {
    let engine = funded_engine(1_000.0);

    let order = engine
        .settlement
        .place_order(USER, limit_order(OrderSide::Buy, 5.0, 150.0))
        .unwrap();
    engine.settlement.confirm_order(USER, &order.id, PIN).unwrap();

    let err = engine.settlement.confirm_order(USER, &order.id, PIN).unwrap_err();
    assert!(matches!(
        err,
        SettlementError::OrderAlreadyFinal(OrderStatus::Completed)
    ));
    let err = engine.settlement.cancel_order(USER, &order.id).unwrap_err();
    assert!(matches!(
        err,
        SettlementError::OrderAlreadyFinal(OrderStatus::Completed)
    ));

    // Double settlement never double-journals
    assert_eq!(engine.store.transaction_count_for_order(&order.id), 1);

    let cancelled = engine
        .settlement
        .place_order(USER, limit_order(OrderSide::Buy, 1.0, 100.0))
        .unwrap();
    engine.settlement.cancel_order(USER, &cancelled.id).unwrap();
    let err = engine
        .settlement
        .confirm_order(USER, &cancelled.id, PIN)
        .unwrap_err();
    assert!(matches!(
        err,
        SettlementError::OrderAlreadyFinal(OrderStatus::Cancelled)
    ));
}

#[test]
fn test_orders_are_scoped_to_their_owner() {
    let engine = funded_engine(1_000.0);

    let order = engine
        .settlement
        .place_order(USER, limit_order(OrderSide::Buy, 1.0, 100.0))
        .unwrap();

    // Another user's order is indistinguishable from a missing one
    let err = engine.settlement.get_order("user-2", &order.id).unwrap_err();
    assert!(matches!(err, SettlementError::OrderNotFound(_)));
    let err = engine.settlement.cancel_order("user-2", &order.id).unwrap_err();
    assert!(matches!(err, SettlementError::OrderNotFound(_)));
}

// =============================================================================
// Holdings fold and rebuild
// =============================================================================

#[test]
fn test_weighted_average_across_settlements() {
    let engine = funded_engine(10_000.0);

    for price in [100.0, 200.0] {
        let order = engine
            .settlement
            .place_order(USER, limit_order(OrderSide::Buy, 10.0, price))
            .unwrap();
        engine.settlement.confirm_order(USER, &order.id, PIN).unwrap();
    }

    let holding = engine.store.get_holding(USER, "AAPL").unwrap();
    assert_eq!(holding.quantity, 20.0);
    assert_eq!(holding.avg_buy_price, 150.0);
    assert_eq!(holding.total_cost, 3_000.0);
}

#[test]
fn test_rebuild_reproduces_the_holdings_cache() {
    let engine = funded_engine(10_000.0);

    let trades = [
        ("BTC", OrderSide::Buy, 2.0, 100.0),
        ("ETH", OrderSide::Buy, 10.0, 50.0),
        ("BTC", OrderSide::Sell, 1.0, 120.0),
    ];
    for (symbol, side, quantity, price) in trades {
        let mut request = limit_order(side, quantity, price);
        request.symbol = symbol.to_string();
        request.sector = Sector::Crypto;
        let order = engine.settlement.place_order(USER, request).unwrap();
        engine.settlement.confirm_order(USER, &order.id, PIN).unwrap();
    }

    let cached = engine.settlement.get_holdings(USER);
    let rebuilt = engine.settlement.rebuild_holdings(USER).unwrap();

    assert_eq!(rebuilt.len(), 2);
    assert_eq!(cached, rebuilt);
    assert_eq!(cached, engine.settlement.get_holdings(USER));
}

#[test]
fn test_out_of_order_confirmation_still_rebuilds_the_cache() {
    let engine = funded_engine(10_000.0);

    // Place two buys, then confirm them in the opposite order: the fold
    // key is settlement time, not placement time
    let first = engine
        .settlement
        .place_order(USER, limit_order(OrderSide::Buy, 1.0, 100.0))
        .unwrap();
    let second = engine
        .settlement
        .place_order(USER, limit_order(OrderSide::Buy, 1.0, 200.0))
        .unwrap();

    engine.settlement.confirm_order(USER, &second.id, PIN).unwrap();
    engine.settlement.confirm_order(USER, &first.id, PIN).unwrap();

    let cached = engine.settlement.get_holdings(USER);
    let rebuilt = engine.settlement.rebuild_holdings(USER).unwrap();
    assert_eq!(cached, rebuilt);

    // The last settled fill, not the last placed one, sets the mark
    assert_eq!(rebuilt[0].last_price, 100.0);
    assert_eq!(rebuilt[0].quantity, 2.0);
    assert_eq!(rebuilt[0].avg_buy_price, 150.0);
}

// =============================================================================
// Conservation
// =============================================================================

#[test]
fn test_cash_is_conserved_across_the_lifecycle() {
    let engine = funded_engine(1_000.0);

    let buy = engine
        .settlement
        .place_order(USER, limit_order(OrderSide::Buy, 5.0, 150.0))
        .unwrap();
    engine.settlement.confirm_order(USER, &buy.id, PIN).unwrap();

    let sell = engine
        .settlement
        .place_order(USER, limit_order(OrderSide::Sell, 5.0, 180.0))
        .unwrap();
    engine.settlement.confirm_order(USER, &sell.id, PIN).unwrap();

    engine.ledger.withdraw(USER, 145.0).unwrap();

    // deposits - buys + sells - withdrawals == final balance
    let txns = engine
        .store
        .get_transactions(USER, &TransactionFilter::default(), true);
    let net: f64 = txns
        .iter()
        .map(|t| match t.txn_type {
            TransactionType::Deposit | TransactionType::Sell | TransactionType::Credit => t.amount,
            TransactionType::Withdraw | TransactionType::Buy | TransactionType::Debit => -t.amount,
        })
        .sum();

    let wallet = engine.ledger.get_or_create(USER).unwrap();
    assert_eq!(net, wallet.total());
    assert_eq!(wallet.total(), 1_000.0);
}
