//! Wallet Ledger
//!
//! Owns the user's cash: available balance plus the funds locked for
//! pending limit/stop buys. All mutation goes through the primitives here,
//! which refuse to produce a negative balance. Deposits and withdrawals
//! are journaled atomically with the wallet write.
//!
//! The ledger also owns the step-up wallet credential (salted SHA-256) and
//! the per-user lock table used to serialize transitions for one user
//! while letting different users proceed in parallel.

use dashmap::DashMap;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::services::settlement::SettlementError;
use crate::services::SqliteStore;
use crate::types::{Transaction, TransactionType, Wallet};

/// Wallet ledger service.
pub struct WalletLedger {
    store: Arc<SqliteStore>,
    /// Per-user serialization points for settlement transitions
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl WalletLedger {
    /// Create a new wallet ledger.
    pub fn new(store: Arc<SqliteStore>) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    /// Get the serialization lock for a user. Two concurrent transitions
    /// for the same user contend here; different users never do.
    pub fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Get a user's wallet, creating an empty one on first touch.
    pub fn get_or_create(&self, user_id: &str) -> Result<Wallet, SettlementError> {
        if let Some(wallet) = self.store.get_wallet(user_id) {
            return Ok(wallet);
        }

        let wallet = Wallet::new(user_id.to_string());
        self.store.create_wallet(&wallet)?;
        info!("Created wallet for {}", user_id);
        Ok(wallet)
    }

    // ==========================================================================
    // Balance primitives
    //
    // These mutate an in-memory wallet; the caller persists the result
    // inside the transition's SQLite transaction.
    // ==========================================================================

    /// Remove available cash. Fails without partial effect when the
    /// balance cannot cover the amount.
    pub fn debit(wallet: &mut Wallet, amount: f64) -> Result<f64, SettlementError> {
        if amount > wallet.balance {
            return Err(SettlementError::InsufficientFunds {
                needed: amount,
                available: wallet.balance,
            });
        }
        wallet.balance -= amount;
        wallet.updated_at = chrono::Utc::now().timestamp_millis();
        Ok(wallet.balance)
    }

    /// Add available cash.
    pub fn credit(wallet: &mut Wallet, amount: f64) -> f64 {
        wallet.balance += amount;
        wallet.updated_at = chrono::Utc::now().timestamp_millis();
        wallet.balance
    }

    /// Reserve available cash into `locked_balance` for a pending order.
    pub fn lock_funds(wallet: &mut Wallet, amount: f64) -> Result<(), SettlementError> {
        if amount > wallet.balance {
            return Err(SettlementError::InsufficientFunds {
                needed: amount,
                available: wallet.balance,
            });
        }
        wallet.balance -= amount;
        wallet.locked_balance += amount;
        wallet.updated_at = chrono::Utc::now().timestamp_millis();
        Ok(())
    }

    /// Release reserved cash back to the available balance.
    ///
    /// The reserved amount is derived from order fields, so releasing more
    /// than is locked is a programming error, not a caller-recoverable
    /// state; it must never happen on any valid path.
    pub fn unlock_funds(wallet: &mut Wallet, amount: f64) -> Result<(), SettlementError> {
        if amount > wallet.locked_balance {
            return Err(SettlementError::Validation(format!(
                "unlock of {} exceeds locked balance {}",
                amount, wallet.locked_balance
            )));
        }
        wallet.locked_balance -= amount;
        wallet.balance += amount;
        wallet.updated_at = chrono::Utc::now().timestamp_millis();
        Ok(())
    }

    // ==========================================================================
    // Funding
    // ==========================================================================

    /// Credit an external deposit and journal it.
    pub fn deposit(&self, user_id: &str, amount: f64) -> Result<Wallet, SettlementError> {
        if amount <= 0.0 {
            return Err(SettlementError::Validation(
                "deposit amount must be positive".to_string(),
            ));
        }

        let _guard = self.user_lock(user_id);
        let _held = _guard.lock().unwrap();

        let mut wallet = self.get_or_create(user_id)?;
        Self::credit(&mut wallet, amount);

        let txn = Transaction::cash(user_id.to_string(), TransactionType::Deposit, amount);
        self.store.apply_cash_movement(&wallet, &txn)?;

        info!("Deposited {} for {}", amount, user_id);
        Ok(wallet)
    }

    /// Withdraw available cash and journal it. Locked funds cannot be
    /// withdrawn.
    pub fn withdraw(&self, user_id: &str, amount: f64) -> Result<Wallet, SettlementError> {
        if amount <= 0.0 {
            return Err(SettlementError::Validation(
                "withdrawal amount must be positive".to_string(),
            ));
        }

        let _guard = self.user_lock(user_id);
        let _held = _guard.lock().unwrap();

        let mut wallet = self.get_or_create(user_id)?;
        Self::debit(&mut wallet, amount)?;

        let txn = Transaction::cash(user_id.to_string(), TransactionType::Withdraw, amount);
        self.store.apply_cash_movement(&wallet, &txn)?;

        info!("Withdrew {} for {}", amount, user_id);
        Ok(wallet)
    }

    // ==========================================================================
    // Step-up credential
    // ==========================================================================

    /// Set the wallet credential (PIN/password) used by the step-up check
    /// on confirmation.
    pub fn set_credential(&self, user_id: &str, credential: &str) -> Result<(), SettlementError> {
        if credential.len() < 4 {
            return Err(SettlementError::Validation(
                "credential must be at least 4 characters".to_string(),
            ));
        }

        self.get_or_create(user_id)?;

        let mut salt_bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = hex::encode(salt_bytes);
        let hash = hash_credential(&salt, credential);

        self.store.set_credential(user_id, &salt, &hash)?;
        info!("Set wallet credential for {}", user_id);
        Ok(())
    }

    /// Verify the step-up credential. A wallet with no credential set
    /// cannot pass the check.
    pub fn verify_credential(
        &self,
        user_id: &str,
        credential: &str,
    ) -> Result<(), SettlementError> {
        let (salt, stored) = self
            .store
            .get_credential(user_id)
            .ok_or(SettlementError::InvalidCredential)?;

        if hash_credential(&salt, credential) != stored {
            return Err(SettlementError::InvalidCredential);
        }
        Ok(())
    }
}

fn hash_credential(salt: &str, credential: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(credential.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> WalletLedger {
        WalletLedger::new(Arc::new(SqliteStore::new_in_memory().unwrap()))
    }

    #[test]
    fn test_debit_rejects_overdraft_without_partial_effect() {
        let mut wallet = Wallet::new("user-1".to_string());
        WalletLedger::credit(&mut wallet, 100.0);

        let err = WalletLedger::debit(&mut wallet, 150.0).unwrap_err();
        assert!(matches!(err, SettlementError::InsufficientFunds { .. }));
        assert_eq!(wallet.balance, 100.0);

        assert_eq!(WalletLedger::debit(&mut wallet, 40.0).unwrap(), 60.0);
    }

    #[test]
    fn test_lock_and_unlock_round_trip() {
        let mut wallet = Wallet::new("user-1".to_string());
        WalletLedger::credit(&mut wallet, 1_000.0);

        WalletLedger::lock_funds(&mut wallet, 400.0).unwrap();
        assert_eq!(wallet.balance, 600.0);
        assert_eq!(wallet.locked_balance, 400.0);
        assert_eq!(wallet.total(), 1_000.0);

        WalletLedger::unlock_funds(&mut wallet, 400.0).unwrap();
        assert_eq!(wallet.balance, 1_000.0);
        assert_eq!(wallet.locked_balance, 0.0);

        assert!(WalletLedger::lock_funds(&mut wallet, 2_000.0).is_err());
        assert!(WalletLedger::unlock_funds(&mut wallet, 1.0).is_err());
    }

    #[test]
    fn test_deposit_and_withdraw_journal() {
        let ledger = ledger();
        let wallet = ledger.deposit("user-1", 500.0).unwrap();
        assert_eq!(wallet.balance, 500.0);

        let wallet = ledger.withdraw("user-1", 200.0).unwrap();
        assert_eq!(wallet.balance, 300.0);

        let err = ledger.withdraw("user-1", 1_000.0).unwrap_err();
        assert!(matches!(err, SettlementError::InsufficientFunds { .. }));

        assert!(ledger.deposit("user-1", -5.0).is_err());
        assert!(ledger.withdraw("user-1", 0.0).is_err());
    }

    #[test]
    fn test_credential_verification() {
        let ledger = ledger();

        // No credential set yet
        assert!(matches!(
            ledger.verify_credential("user-1", "1234").unwrap_err(),
            SettlementError::InvalidCredential
        ));

        ledger.set_credential("user-1", "1234").unwrap();
        assert!(ledger.verify_credential("user-1", "1234").is_ok());
        assert!(matches!(
            ledger.verify_credential("user-1", "4321").unwrap_err(),
            SettlementError::InvalidCredential
        ));

        assert!(ledger.set_credential("user-1", "123").is_err());
    }
}
