//! Dispute model: a buyer or seller contesting a listing's outcome, and
//! its exactly-once resolution by the marketplace authority.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, DisputeId, ListingId, MarketError, Result};

/// Lifecycle status of a dispute. `Open → Resolved`, never backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisputeStatus {
    Open,
    Resolved,
}

impl std::fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Resolved => write!(f, "RESOLVED"),
        }
    }
}

/// The authority's ruling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisputeResolution {
    /// The escrowed asset goes to the buyer-side party.
    FavorsBuyer,
    /// The escrowed asset returns to the seller.
    FavorsSeller,
}

impl std::fmt::Display for DisputeResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FavorsBuyer => write!(f, "FAVORS_BUYER"),
            Self::FavorsSeller => write!(f, "FAVORS_SELLER"),
        }
    }
}

/// A contested listing outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispute {
    pub id: DisputeId,
    pub listing_id: ListingId,
    /// The counterparty who opened the dispute.
    pub initiator: AccountId,
    pub reason: String,
    /// The buyer-side party captured at open time: the recorded buyer for
    /// a sold listing, or the standing high bidder for an active auction.
    /// `None` when the listing had no buyer-side counterparty.
    pub buyer_party: Option<AccountId>,
    pub status: DisputeStatus,
    pub resolution: Option<DisputeResolution>,
    pub opened_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Dispute {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == DisputeStatus::Open
    }

    /// Record the authority's ruling. A dispute resolves exactly once.
    ///
    /// # Errors
    /// Returns `DisputeNotOpen` if the dispute was already resolved.
    pub fn mark_resolved(
        &mut self,
        resolution: DisputeResolution,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if !self.is_open() {
            return Err(MarketError::DisputeNotOpen);
        }
        self.status = DisputeStatus::Resolved;
        self.resolution = Some(resolution);
        self.resolved_at = Some(now);
        Ok(())
    }
}
