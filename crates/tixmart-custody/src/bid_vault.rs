//! Bid vaults: holding areas for standing auction bids.
//!
//! A vault is keyed by `(listing, bidder)` and holds exactly that
//! bidder's currently-standing bid. Funding a vault debits the bidder's
//! ledger balance; draining it credits the balance back. Settlement
//! takes the winning vault's funds for distribution instead.
//!
//! Invariant: at most one vault per listing holds a non-zero balance —
//! the current high bidder's. All others have been drained by refund.

use std::collections::HashMap;

use tixmart_types::{AccountId, ListingId, MarketError, Result};

use crate::ledger::CashLedger;

/// Holds the funds behind every standing bid.
#[derive(Debug, Default)]
pub struct BidVaultBank {
    vaults: HashMap<(ListingId, AccountId), u64>,
}

impl BidVaultBank {
    /// Create a new empty vault bank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Debit `amount` from the bidder's ledger balance into a fresh vault.
    ///
    /// # Errors
    /// - `InsufficientFunds` if the bidder's balance is too small
    /// - `Internal` if a vault for this (listing, bidder) already holds
    ///   funds — the caller must drain before re-funding
    pub fn fund(
        &mut self,
        ledger: &mut CashLedger,
        listing_id: ListingId,
        bidder: AccountId,
        amount: u64,
    ) -> Result<()> {
        let key = (listing_id, bidder);
        if self.vaults.get(&key).copied().unwrap_or(0) > 0 {
            return Err(MarketError::Internal(format!(
                "bid vault for ({listing_id}, {bidder}) is already funded"
            )));
        }
        ledger.debit(bidder, amount)?;
        self.vaults.insert(key, amount);
        Ok(())
    }

    /// Drain a vault back to its bidder's ledger balance (refund).
    /// Returns the refunded amount.
    ///
    /// # Errors
    /// - `Internal` if no funded vault exists for this key
    /// - `ArithmeticOverflow` if the bidder's balance would overflow; the
    ///   vault is left untouched in that case
    pub fn drain(
        &mut self,
        ledger: &mut CashLedger,
        listing_id: ListingId,
        bidder: AccountId,
    ) -> Result<u64> {
        let key = (listing_id, bidder);
        let amount = self
            .vaults
            .get(&key)
            .copied()
            .filter(|&amount| amount > 0)
            .ok_or_else(|| {
                MarketError::Internal(format!(
                    "no funded bid vault for ({listing_id}, {bidder})"
                ))
            })?;
        ledger.credit(bidder, amount)?;
        self.vaults.remove(&key);
        Ok(amount)
    }

    /// Take a vault's funds for settlement distribution. The funds do not
    /// return to the bidder; the caller credits the payout parties.
    ///
    /// # Errors
    /// - `Internal` if no funded vault exists for this key
    /// - `ConservationViolation` if the vault balance does not match the
    ///   recorded high bid
    pub fn take(
        &mut self,
        listing_id: ListingId,
        bidder: AccountId,
        expected: u64,
    ) -> Result<u64> {
        let key = (listing_id, bidder);
        let amount = self
            .vaults
            .get(&key)
            .copied()
            .filter(|&amount| amount > 0)
            .ok_or_else(|| {
                MarketError::Internal(format!(
                    "no funded bid vault for ({listing_id}, {bidder})"
                ))
            })?;
        if amount != expected {
            return Err(MarketError::ConservationViolation {
                reason: format!(
                    "bid vault for ({listing_id}, {bidder}) holds {amount}, expected {expected}"
                ),
            });
        }
        self.vaults.remove(&key);
        Ok(amount)
    }

    /// Current vault balance for a (listing, bidder) pair.
    #[must_use]
    pub fn balance(&self, listing_id: ListingId, bidder: AccountId) -> u64 {
        self.vaults
            .get(&(listing_id, bidder))
            .copied()
            .unwrap_or(0)
    }

    /// Number of funded vaults for a listing. The bidding invariant keeps
    /// this at most 1.
    #[must_use]
    pub fn funded_count(&self, listing_id: ListingId) -> usize {
        self.vaults
            .iter()
            .filter(|&(&(listing, _), &amount)| listing == listing_id && amount > 0)
            .count()
    }

    /// Total funds held across all vaults.
    #[must_use]
    pub fn total_outstanding(&self) -> u128 {
        self.vaults.values().map(|&amount| u128::from(amount)).sum()
    }
}
