//! Royalty schedules: proportional payments to an asset's creators on
//! every sale.
//!
//! A listing carries a schedule of `(recipient, bps)` shares. The
//! aggregate rate is bounded by the marketplace's `max_royalty_bps` cap,
//! re-checked at settlement time.

use serde::{Deserialize, Serialize};

use crate::{AccountId, MarketError, Result};

/// A single royalty recipient and their share in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyShare {
    /// The account receiving this share.
    pub recipient: AccountId,
    /// The share in basis points (e.g., 500 = 5%).
    pub bps: u16,
}

/// An ordered list of royalty shares attached to a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltySchedule {
    pub shares: Vec<RoyaltyShare>,
}

impl RoyaltySchedule {
    /// A schedule with no royalty recipients.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A schedule with a single recipient.
    #[must_use]
    pub fn single(recipient: AccountId, bps: u16) -> Self {
        Self {
            shares: vec![RoyaltyShare { recipient, bps }],
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Aggregate royalty rate across all shares.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if the sum exceeds `u16::MAX`.
    pub fn total_bps(&self) -> Result<u16> {
        let mut total: u16 = 0;
        for share in &self.shares {
            total = total
                .checked_add(share.bps)
                .ok_or(MarketError::ArithmeticOverflow)?;
        }
        Ok(total)
    }

    /// Check the aggregate rate against a cap.
    ///
    /// # Errors
    /// Returns `RoyaltyExceedsLimit` if the aggregate exceeds `max_bps`.
    pub fn ensure_within(&self, max_bps: u16) -> Result<()> {
        let total_bps = self.total_bps()?;
        if total_bps > max_bps {
            return Err(MarketError::RoyaltyExceedsLimit { total_bps, max_bps });
        }
        Ok(())
    }
}
