//! Cash ledger: per-account balance accounting with all-or-nothing
//! multi-leg transfers.
//!
//! The ledger is the in-process implementation of the value transfer
//! adapter. Settlement's fee/royalty/seller split is applied as one
//! [`CashLedger::apply`] batch: every leg is validated against projected
//! balances before any leg commits, so a failing batch leaves every
//! account untouched.

use std::collections::HashMap;

use tixmart_types::{AccountId, MarketError, Result};

/// One movement of value between two accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferLeg {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: u64,
}

/// Per-account balance ledger. Source of truth for all cash positions.
#[derive(Debug, Default)]
pub struct CashLedger {
    balances: HashMap<AccountId, u64>,
}

impl CashLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deposit external funds into an account.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if the balance would overflow.
    pub fn deposit(&mut self, account: AccountId, amount: u64) -> Result<()> {
        let balance = self.balances.entry(account).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(MarketError::ArithmeticOverflow)?;
        Ok(())
    }

    /// The available balance of an account (0 if unknown).
    #[must_use]
    pub fn available(&self, account: AccountId) -> u64 {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    /// Remove funds from an account (funds leave the ledger, e.g. into a
    /// bid vault).
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if the account balance is too small.
    pub fn debit(&mut self, account: AccountId, amount: u64) -> Result<()> {
        let available = self.available(account);
        if available < amount {
            return Err(MarketError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        self.balances.insert(account, available - amount);
        Ok(())
    }

    /// Add funds to an account (funds enter the ledger, e.g. a bid vault
    /// refund).
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if the balance would overflow.
    pub fn credit(&mut self, account: AccountId, amount: u64) -> Result<()> {
        self.deposit(account, amount)
    }

    /// Apply a batch of transfer legs atomically, in order.
    ///
    /// All debits and credits are validated against projected balances
    /// first; only then does the batch commit. A failure applies nothing.
    ///
    /// # Errors
    /// - `InsufficientFunds` if any projected debit would go negative
    /// - `ArithmeticOverflow` if any projected credit would overflow
    pub fn apply(&mut self, legs: &[TransferLeg]) -> Result<()> {
        let mut projected: HashMap<AccountId, u64> = HashMap::new();

        for leg in legs {
            let from_balance = *projected
                .entry(leg.from)
                .or_insert_with(|| self.available(leg.from));
            if from_balance < leg.amount {
                return Err(MarketError::InsufficientFunds {
                    needed: leg.amount,
                    available: from_balance,
                });
            }
            projected.insert(leg.from, from_balance - leg.amount);

            let to_balance = *projected
                .entry(leg.to)
                .or_insert_with(|| self.available(leg.to));
            let credited = to_balance
                .checked_add(leg.amount)
                .ok_or(MarketError::ArithmeticOverflow)?;
            projected.insert(leg.to, credited);
        }

        for (account, balance) in projected {
            self.balances.insert(account, balance);
        }
        Ok(())
    }

    /// Credit several accounts atomically from funds entering the ledger
    /// (e.g. a drained bid vault being distributed).
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if any credit would overflow; nothing
    /// is applied in that case.
    pub fn payout(&mut self, credits: &[(AccountId, u64)]) -> Result<()> {
        let mut projected: HashMap<AccountId, u64> = HashMap::new();
        for &(account, amount) in credits {
            let balance = *projected
                .entry(account)
                .or_insert_with(|| self.available(account));
            let credited = balance
                .checked_add(amount)
                .ok_or(MarketError::ArithmeticOverflow)?;
            projected.insert(account, credited);
        }
        for (account, balance) in projected {
            self.balances.insert(account, balance);
        }
        Ok(())
    }

    /// Total funds held across all accounts.
    #[must_use]
    pub fn total_supply(&self) -> u128 {
        self.balances.values().map(|&balance| u128::from(balance)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_increases_available() {
        let mut ledger = CashLedger::new();
        let account = AccountId::new();
        ledger.deposit(account, 1000).unwrap();
        assert_eq!(ledger.available(account), 1000);
    }

    #[test]
    fn debit_insufficient_fails() {
        let mut ledger = CashLedger::new();
        let account = AccountId::new();
        ledger.deposit(account, 100).unwrap();
        let err = ledger.debit(account, 200).unwrap_err();
        assert!(matches!(
            err,
            MarketError::InsufficientFunds {
                needed: 200,
                available: 100
            }
        ));
        // Balance unchanged
        assert_eq!(ledger.available(account), 100);
    }

    #[test]
    fn debit_then_credit_roundtrip() {
        let mut ledger = CashLedger::new();
        let account = AccountId::new();
        ledger.deposit(account, 1000).unwrap();
        ledger.debit(account, 400).unwrap();
        assert_eq!(ledger.available(account), 600);
        ledger.credit(account, 400).unwrap();
        assert_eq!(ledger.available(account), 1000);
    }

    #[test]
    fn apply_moves_funds_between_accounts() {
        let mut ledger = CashLedger::new();
        let alice = AccountId::new();
        let bob = AccountId::new();
        ledger.deposit(alice, 1000).unwrap();

        ledger
            .apply(&[TransferLeg {
                from: alice,
                to: bob,
                amount: 300,
            }])
            .unwrap();
        assert_eq!(ledger.available(alice), 700);
        assert_eq!(ledger.available(bob), 300);
    }

    #[test]
    fn apply_is_all_or_nothing() {
        let mut ledger = CashLedger::new();
        let buyer = AccountId::new();
        let fee_collector = AccountId::new();
        let seller = AccountId::new();
        ledger.deposit(buyer, 500).unwrap();

        // Second leg exceeds the buyer's remaining balance.
        let err = ledger
            .apply(&[
                TransferLeg {
                    from: buyer,
                    to: fee_collector,
                    amount: 300,
                },
                TransferLeg {
                    from: buyer,
                    to: seller,
                    amount: 300,
                },
            ])
            .unwrap_err();
        assert!(matches!(err, MarketError::InsufficientFunds { .. }));

        // No leg applied
        assert_eq!(ledger.available(buyer), 500);
        assert_eq!(ledger.available(fee_collector), 0);
        assert_eq!(ledger.available(seller), 0);
    }

    #[test]
    fn apply_chains_within_batch() {
        // A leg may spend funds received earlier in the same batch.
        let mut ledger = CashLedger::new();
        let a = AccountId::new();
        let b = AccountId::new();
        let c = AccountId::new();
        ledger.deposit(a, 100).unwrap();

        ledger
            .apply(&[
                TransferLeg {
                    from: a,
                    to: b,
                    amount: 100,
                },
                TransferLeg {
                    from: b,
                    to: c,
                    amount: 100,
                },
            ])
            .unwrap();
        assert_eq!(ledger.available(a), 0);
        assert_eq!(ledger.available(b), 0);
        assert_eq!(ledger.available(c), 100);
    }

    #[test]
    fn payout_is_all_or_nothing() {
        let mut ledger = CashLedger::new();
        let a = AccountId::new();
        let b = AccountId::new();
        ledger.deposit(b, u64::MAX).unwrap();

        let err = ledger.payout(&[(a, 100), (b, 1)]).unwrap_err();
        assert!(matches!(err, MarketError::ArithmeticOverflow));
        assert_eq!(ledger.available(a), 0);
    }

    #[test]
    fn total_supply_sums_all_accounts() {
        let mut ledger = CashLedger::new();
        ledger.deposit(AccountId::new(), 1000).unwrap();
        ledger.deposit(AccountId::new(), 500).unwrap();
        assert_eq!(ledger.total_supply(), 1500);
    }

    #[test]
    fn apply_conserves_total_supply() {
        let mut ledger = CashLedger::new();
        let alice = AccountId::new();
        let bob = AccountId::new();
        ledger.deposit(alice, 1000).unwrap();
        let before = ledger.total_supply();

        ledger
            .apply(&[TransferLeg {
                from: alice,
                to: bob,
                amount: 750,
            }])
            .unwrap();
        assert_eq!(ledger.total_supply(), before);
    }
}
