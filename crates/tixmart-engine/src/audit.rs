//! Fund conservation audit.
//!
//! Mathematical invariant enforced after every settlement and refund:
//! ```text
//! ledger supply + outstanding bid vaults == Σ(deposits)
//! ```
//!
//! Settlement and bidding only move value between accounts and vaults;
//! nothing inside the engine mints or burns. If this invariant ever
//! breaks, something has gone catastrophically wrong and the operation
//! that detected it fails loudly.

use tixmart_types::{MarketError, Result};

/// Tracks external deposits and validates conservation against the
/// actual ledger + vault totals.
#[derive(Debug, Default)]
pub struct ConservationAudit {
    total_deposits: u128,
}

impl ConservationAudit {
    /// Create a new audit tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an external deposit entering the system.
    pub fn record_deposit(&mut self, amount: u64) {
        self.total_deposits += u128::from(amount);
    }

    /// Expected total supply: everything ever deposited.
    #[must_use]
    pub fn expected_supply(&self) -> u128 {
        self.total_deposits
    }

    /// Verify that the actual supply matches the expected supply.
    ///
    /// # Errors
    /// Returns `ConservationViolation` if actual ≠ expected.
    pub fn verify(&self, actual_supply: u128) -> Result<()> {
        if actual_supply != self.total_deposits {
            return Err(MarketError::ConservationViolation {
                reason: format!(
                    "actual supply {actual_supply} != expected {} (total deposits)",
                    self.total_deposits
                ),
            });
        }
        Ok(())
    }
}
