//! Marketplace configuration: authority, fee collector, fee/royalty caps,
//! and the global pause flag.
//!
//! One config exists per deployment. It is created at bootstrap, mutated
//! only by the `authority`, and never deleted. Every mutating engine
//! operation checks the pause flag before touching state.

use serde::{Deserialize, Serialize};

use crate::{constants, AccountId, MarketError, Result};

/// Per-deployment marketplace configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    /// Principal allowed to administer the marketplace.
    pub authority: AccountId,
    /// Principal receiving platform fees on every settlement.
    pub fee_collector: AccountId,
    /// Platform fee in basis points (0–10000).
    pub platform_fee_bps: u16,
    /// Upper bound on a listing's aggregate royalty rate (0–10000).
    pub max_royalty_bps: u16,
    /// Global pause flag. When false, all mutating operations fail.
    pub is_active: bool,
    /// Total trading volume settled through this deployment.
    pub total_volume: u64,
    /// Total platform fees collected by this deployment.
    pub total_fees_collected: u64,
}

impl MarketplaceConfig {
    /// Create a new configuration.
    ///
    /// # Errors
    /// Returns `InvalidFee` if either rate exceeds 10000 bps.
    pub fn new(
        authority: AccountId,
        fee_collector: AccountId,
        platform_fee_bps: u16,
        max_royalty_bps: u16,
    ) -> Result<Self> {
        if platform_fee_bps > constants::MAX_FEE_BPS {
            return Err(MarketError::InvalidFee {
                bps: platform_fee_bps,
            });
        }
        if max_royalty_bps > constants::MAX_FEE_BPS {
            return Err(MarketError::InvalidFee {
                bps: max_royalty_bps,
            });
        }
        Ok(Self {
            authority,
            fee_collector,
            platform_fee_bps,
            max_royalty_bps,
            is_active: true,
            total_volume: 0,
            total_fees_collected: 0,
        })
    }

    /// Guard a mutating operation against the pause flag.
    ///
    /// # Errors
    /// Returns `MarketplacePaused` if the marketplace is paused.
    pub fn ensure_active(&self) -> Result<()> {
        if self.is_active {
            Ok(())
        } else {
            Err(MarketError::MarketplacePaused)
        }
    }

    /// Guard an administrative operation.
    ///
    /// # Errors
    /// Returns `Unauthorized` unless `caller` is the authority.
    pub fn ensure_authority(&self, caller: AccountId) -> Result<()> {
        if caller == self.authority {
            Ok(())
        } else {
            Err(MarketError::Unauthorized {
                reason: format!("caller {caller} is not the marketplace authority"),
            })
        }
    }

    /// Project the volume/fee counters after a sale, without mutating.
    ///
    /// Settlement computes the new counter values up front so that counter
    /// overflow aborts before any funds move.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if either counter would overflow.
    pub fn project_sale(&self, price: u64, platform_fee: u64) -> Result<(u64, u64)> {
        let volume = self
            .total_volume
            .checked_add(price)
            .ok_or(MarketError::ArithmeticOverflow)?;
        let fees = self
            .total_fees_collected
            .checked_add(platform_fee)
            .ok_or(MarketError::ArithmeticOverflow)?;
        Ok((volume, fees))
    }
}
