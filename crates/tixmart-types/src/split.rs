//! Proceeds split: the fee/royalty/seller arithmetic behind every
//! settlement.
//!
//! All math is integer basis-point multiplication with floor division,
//! `u128` intermediates, and explicit overflow checks. The conservation
//! invariant holds exactly for every computed split:
//!
//! ```text
//! seller_amount + platform_fee + Σ royalty_amount == price
//! ```
//!
//! The rounding remainder of each floor division is credited to the
//! seller, never dropped.

use serde::{Deserialize, Serialize};

use crate::{constants, AccountId, MarketError, Result, RoyaltySchedule};

/// One royalty recipient's computed payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyPayout {
    pub recipient: AccountId,
    pub amount: u64,
}

/// The full distribution of one settlement's proceeds.
///
/// Payout order is fixed: platform fee, then royalties in schedule order,
/// then the seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProceedsSplit {
    pub price: u64,
    pub platform_fee: u64,
    pub royalties: Vec<RoyaltyPayout>,
    pub seller_amount: u64,
}

/// `floor(price * bps / 10000)` with a `u128` intermediate.
fn bps_share(price: u64, bps: u16) -> Result<u64> {
    let share = u128::from(price) * u128::from(bps) / u128::from(constants::BPS_DENOMINATOR);
    u64::try_from(share).map_err(|_| MarketError::ArithmeticOverflow)
}

impl ProceedsSplit {
    /// Compute the split of `price` for the given fee rate and royalty
    /// schedule.
    ///
    /// # Errors
    /// - `RoyaltyExceedsLimit` if the schedule's aggregate rate exceeds
    ///   `max_royalty_bps`
    /// - `ArithmeticOverflow` if any intermediate over- or underflows
    ///   (including fees exceeding the price itself)
    pub fn compute(
        price: u64,
        platform_fee_bps: u16,
        schedule: &RoyaltySchedule,
        max_royalty_bps: u16,
    ) -> Result<Self> {
        schedule.ensure_within(max_royalty_bps)?;

        let platform_fee = bps_share(price, platform_fee_bps)?;

        let mut royalties = Vec::with_capacity(schedule.len());
        let mut royalty_total: u64 = 0;
        for share in &schedule.shares {
            let amount = bps_share(price, share.bps)?;
            royalty_total = royalty_total
                .checked_add(amount)
                .ok_or(MarketError::ArithmeticOverflow)?;
            royalties.push(RoyaltyPayout {
                recipient: share.recipient,
                amount,
            });
        }

        let seller_amount = price
            .checked_sub(platform_fee)
            .and_then(|rest| rest.checked_sub(royalty_total))
            .ok_or(MarketError::ArithmeticOverflow)?;

        Ok(Self {
            price,
            platform_fee,
            royalties,
            seller_amount,
        })
    }

    /// Sum of all royalty payouts.
    #[must_use]
    pub fn royalty_total(&self) -> u64 {
        self.royalties.iter().map(|payout| payout.amount).sum()
    }

    /// Verify the conservation invariant exactly.
    ///
    /// # Errors
    /// Returns `ConservationViolation` if the outputs do not sum to the
    /// price.
    pub fn verify(&self) -> Result<()> {
        let distributed = u128::from(self.platform_fee)
            + u128::from(self.royalty_total())
            + u128::from(self.seller_amount);
        if distributed != u128::from(self.price) {
            return Err(MarketError::ConservationViolation {
                reason: format!(
                    "split distributes {distributed}, expected {} (fee={}, royalties={}, seller={})",
                    self.price,
                    self.platform_fee,
                    self.royalty_total(),
                    self.seller_amount,
                ),
            });
        }
        Ok(())
    }
}
