//! Market events: an append-only log of significant engine actions.
//!
//! Callers (a REST layer, a notification service, a projection) drain the
//! log to observe what happened without re-deriving it from entity state.

use serde::{Deserialize, Serialize};

use crate::{AccountId, AssetId, DisputeId, DisputeResolution, ListingId};

/// One significant engine action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    ListingCreated {
        listing_id: ListingId,
        seller: AccountId,
        asset_id: AssetId,
        amount: u64,
        auction: bool,
    },
    ListingUpdated {
        listing_id: ListingId,
        new_amount: u64,
    },
    ListingCancelled {
        listing_id: ListingId,
    },
    BidPlaced {
        listing_id: ListingId,
        bidder: AccountId,
        amount: u64,
    },
    BidRefunded {
        listing_id: ListingId,
        bidder: AccountId,
        amount: u64,
    },
    ItemSold {
        listing_id: ListingId,
        buyer: AccountId,
        seller: AccountId,
        price: u64,
        platform_fee: u64,
        royalty_total: u64,
    },
    DisputeOpened {
        dispute_id: DisputeId,
        listing_id: ListingId,
        initiator: AccountId,
    },
    DisputeResolved {
        dispute_id: DisputeId,
        listing_id: ListingId,
        resolution: DisputeResolution,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip() {
        let event = MarketEvent::ItemSold {
            listing_id: ListingId::new(),
            buyer: AccountId::new(),
            seller: AccountId::new(),
            price: 10_000_000,
            platform_fee: 250_000,
            royalty_total: 500_000,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: MarketEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
