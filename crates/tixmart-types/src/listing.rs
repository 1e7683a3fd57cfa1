//! Listing model: one asset offered for sale, fixed-price or auction.
//!
//! ## State Machine
//!
//! ```text
//!   ┌────────┐  settlement    ┌──────┐
//!   │ ACTIVE ├───────────────▶│ SOLD ├──┐
//!   └─┬────┬─┘                └──────┘  │ dispute
//!     │    │ cancel                     ▼
//!     │    │              ┌───────────────┐
//!     │    └─────────────▶│   CANCELLED   │
//!     │ dispute           └───────────────┘
//!     ▼                        ▲
//!   ┌──────────┐  resolution   │
//!   │ DISPUTED ├───────────────┴──▶ SOLD | CANCELLED
//!   └──────────┘
//! ```
//!
//! A listing never returns to `Active`. Records are retained after they
//! reach a terminal state; they are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, AssetId, EscrowId, ListingId, MarketError, Result, RoyaltySchedule};

/// Requested pricing mode for a new listing. Auctions are specified by
/// duration; the engine resolves the end time against its clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingTerms {
    FixedPrice { price: u64 },
    Auction { min_bid: u64, duration_secs: i64 },
}

/// Resolved pricing mode. Exactly one mode exists by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pricing {
    FixedPrice {
        price: u64,
    },
    Auction {
        min_bid: u64,
        end_time: DateTime<Utc>,
    },
}

impl Pricing {
    #[must_use]
    pub fn is_auction(&self) -> bool {
        matches!(self, Self::Auction { .. })
    }

    /// The listed amount: the fixed price, or the auction's minimum bid.
    #[must_use]
    pub fn amount(&self) -> u64 {
        match self {
            Self::FixedPrice { price } => *price,
            Self::Auction { min_bid, .. } => *min_bid,
        }
    }
}

/// Lifecycle status of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    Active,
    Sold,
    Cancelled,
    Disputed,
}

impl ListingStatus {
    /// Can this listing transition to the given target status?
    ///
    /// Transitions are monotonic: `Active` is never reachable again, and
    /// `Sold → Disputed` exists only so a completed sale can be contested.
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Active, Self::Sold | Self::Cancelled | Self::Disputed)
                | (Self::Sold, Self::Disputed)
                | (Self::Disputed, Self::Sold | Self::Cancelled)
        )
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Sold => write!(f, "SOLD"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Disputed => write!(f, "DISPUTED"),
        }
    }
}

/// One asset offered for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub seller: AccountId,
    pub asset_id: AssetId,
    pub pricing: Pricing,
    pub status: ListingStatus,
    pub royalties: RoyaltySchedule,
    /// Custody handle for the escrowed asset.
    pub escrow: EscrowId,
    /// Current high bidder, if any. Auctions only.
    pub highest_bidder: Option<AccountId>,
    /// Current high bid amount; 0 if none.
    pub highest_bid: u64,
    /// Number of bids accepted over the listing's lifetime.
    pub bid_count: u32,
    /// The buyer, once the listing is `Sold`.
    pub buyer: Option<AccountId>,
    /// The settled price, once the listing is `Sold`.
    pub sale_price: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ListingStatus::Active
    }

    #[must_use]
    pub fn is_auction(&self) -> bool {
        self.pricing.is_auction()
    }

    /// Whether the auction window has closed as of `now`.
    /// Always `false` for fixed-price listings.
    #[must_use]
    pub fn auction_ended(&self, now: DateTime<Utc>) -> bool {
        match self.pricing {
            Pricing::Auction { end_time, .. } => now >= end_time,
            Pricing::FixedPrice { .. } => false,
        }
    }

    /// The value a new bid must strictly exceed:
    /// `max(highest_bid, min_bid - 1)`. `None` for fixed-price listings.
    #[must_use]
    pub fn bid_floor(&self) -> Option<u64> {
        match self.pricing {
            Pricing::Auction { min_bid, .. } => {
                Some(self.highest_bid.max(min_bid.saturating_sub(1)))
            }
            Pricing::FixedPrice { .. } => None,
        }
    }

    /// Transition to a new status, enforcing the state machine.
    ///
    /// # Errors
    /// Returns `ListingNotActive` for any disallowed transition — from the
    /// caller's perspective the listing is no longer in a state that
    /// permits the operation.
    pub fn transition(&mut self, target: ListingStatus, now: DateTime<Utc>) -> Result<()> {
        if !self.status.can_transition_to(target) {
            return Err(MarketError::ListingNotActive);
        }
        self.status = target;
        self.updated_at = now;
        Ok(())
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Listing {
    pub fn dummy_fixed(seller: AccountId, price: u64) -> Self {
        let now = Utc::now();
        Self {
            id: ListingId::new(),
            seller,
            asset_id: AssetId::new(),
            pricing: Pricing::FixedPrice { price },
            status: ListingStatus::Active,
            royalties: RoyaltySchedule::empty(),
            escrow: EscrowId::new(),
            highest_bidder: None,
            highest_bid: 0,
            bid_count: 0,
            buyer: None,
            sale_price: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn dummy_auction(seller: AccountId, min_bid: u64, end_time: DateTime<Utc>) -> Self {
        let mut listing = Self::dummy_fixed(seller, min_bid);
        listing.pricing = Pricing::Auction { min_bid, end_time };
        listing
    }
}
