//! Listing lifecycle: create, update, cancel.
//!
//! Creation moves the asset into escrow before any listing record exists;
//! a custody failure therefore leaves no partial state. Cancellation
//! refunds a standing bid in full before the asset goes back to the
//! seller.

use chrono::Duration;
use tixmart_custody::Clock;
use tixmart_types::{
    constants, AccountId, AssetId, Listing, ListingId, ListingStatus, ListingTerms, MarketError,
    MarketEvent, Pricing, Result, RoyaltySchedule,
};

use crate::engine::MarketEngine;

impl<C: Clock> MarketEngine<C> {
    /// Create a listing, moving one unit of `asset_id` into escrow.
    ///
    /// # Errors
    /// - `MarketplacePaused` while paused
    /// - `InvalidPrice` for a zero price or minimum bid
    /// - `InvalidListingConfig` for a non-positive auction duration or an
    ///   oversized royalty schedule
    /// - `RoyaltyExceedsLimit` if the schedule exceeds the configured cap
    /// - `AssetNotOwned` if the seller does not own the asset (no listing
    ///   is created)
    pub fn create_listing(
        &mut self,
        seller: AccountId,
        asset_id: AssetId,
        terms: ListingTerms,
        royalties: RoyaltySchedule,
    ) -> Result<Listing> {
        self.config.ensure_active()?;

        let now = self.clock.now();
        let pricing = match terms {
            ListingTerms::FixedPrice { price } => {
                if price == 0 {
                    return Err(MarketError::InvalidPrice);
                }
                Pricing::FixedPrice { price }
            }
            ListingTerms::Auction {
                min_bid,
                duration_secs,
            } => {
                if min_bid == 0 {
                    return Err(MarketError::InvalidPrice);
                }
                if duration_secs <= 0 {
                    return Err(MarketError::InvalidListingConfig {
                        reason: format!("auction duration must be positive, got {duration_secs}s"),
                    });
                }
                Pricing::Auction {
                    min_bid,
                    end_time: now + Duration::seconds(duration_secs),
                }
            }
        };

        if royalties.len() > constants::MAX_ROYALTY_RECIPIENTS {
            return Err(MarketError::InvalidListingConfig {
                reason: format!(
                    "at most {} royalty recipients allowed, got {}",
                    constants::MAX_ROYALTY_RECIPIENTS,
                    royalties.len()
                ),
            });
        }
        royalties.ensure_within(self.config.max_royalty_bps)?;

        let id = ListingId::new();
        // Escrow first: a custody failure must leave no listing behind.
        let escrow = self.custody.hold(id, asset_id, seller, now)?;

        let listing = Listing {
            id,
            seller,
            asset_id,
            pricing,
            status: ListingStatus::Active,
            royalties,
            escrow,
            highest_bidder: None,
            highest_bid: 0,
            bid_count: 0,
            buyer: None,
            sale_price: 0,
            created_at: now,
            updated_at: now,
        };
        self.listings.insert(listing.clone())?;

        tracing::info!(
            listing = %id,
            seller = %seller,
            asset = %asset_id,
            amount = listing.pricing.amount(),
            auction = listing.is_auction(),
            "listing created"
        );
        self.emit(MarketEvent::ListingCreated {
            listing_id: id,
            seller,
            asset_id,
            amount: listing.pricing.amount(),
            auction: listing.is_auction(),
        });
        Ok(listing)
    }

    /// Update the numeric value of a listing's existing pricing mode.
    /// The mode itself can never change.
    ///
    /// # Errors
    /// - `MarketplacePaused` while paused
    /// - `Unauthorized` unless `caller` is the seller
    /// - `ListingNotActive` unless the listing is active
    /// - `InvalidPrice` for a zero value
    pub fn update_listing(
        &mut self,
        caller: AccountId,
        listing_id: ListingId,
        new_amount: u64,
    ) -> Result<Listing> {
        self.config.ensure_active()?;

        let (mut listing, version) = self.listings.snapshot(listing_id)?;
        if caller != listing.seller {
            return Err(MarketError::Unauthorized {
                reason: format!("caller {caller} is not the seller of listing {listing_id}"),
            });
        }
        if !listing.is_active() {
            return Err(MarketError::ListingNotActive);
        }
        if new_amount == 0 {
            return Err(MarketError::InvalidPrice);
        }

        match &mut listing.pricing {
            Pricing::FixedPrice { price } => *price = new_amount,
            Pricing::Auction { min_bid, .. } => *min_bid = new_amount,
        }
        listing.updated_at = self.clock.now();
        self.listings.commit(version, listing.clone())?;

        tracing::debug!(listing = %listing_id, new_amount, "listing updated");
        self.emit(MarketEvent::ListingUpdated {
            listing_id,
            new_amount,
        });
        Ok(listing)
    }

    /// Cancel a listing: refund any standing bid in full, then return the
    /// asset to the seller.
    ///
    /// # Errors
    /// - `MarketplacePaused` while paused
    /// - `Unauthorized` unless `caller` is the seller
    /// - `ListingNotActive` unless the listing is active
    pub fn cancel_listing(&mut self, caller: AccountId, listing_id: ListingId) -> Result<Listing> {
        self.config.ensure_active()?;

        let (mut listing, version) = self.listings.snapshot(listing_id)?;
        if caller != listing.seller {
            return Err(MarketError::Unauthorized {
                reason: format!("caller {caller} is not the seller of listing {listing_id}"),
            });
        }
        if !listing.is_active() {
            return Err(MarketError::ListingNotActive);
        }
        self.custody.ensure_held(listing.escrow, listing_id)?;

        // The standing bidder must be made whole before the asset moves.
        if let Some(bidder) = listing.highest_bidder.take() {
            let refunded = self.vaults.drain(&mut self.ledger, listing_id, bidder)?;
            listing.highest_bid = 0;
            tracing::debug!(listing = %listing_id, bidder = %bidder, refunded, "standing bid refunded on cancel");
            self.emit(MarketEvent::BidRefunded {
                listing_id,
                bidder,
                amount: refunded,
            });
        }

        let now = self.clock.now();
        listing.transition(ListingStatus::Cancelled, now)?;
        self.listings.commit(version, listing.clone())?;
        self.custody.return_to(listing.escrow, listing.seller)?;
        self.verify_conservation()?;

        tracing::info!(listing = %listing_id, "listing cancelled");
        self.emit(MarketEvent::ListingCancelled { listing_id });
        Ok(listing)
    }
}
