//! Bidding protocol: monotonic bids with push refunds.
//!
//! A new bid must strictly exceed `max(highest_bid, min_bid - 1)`; equal
//! bids lose. Accepting a bid and refunding the superseded bidder form
//! one atomic unit: the new bidder's funds are verified sufficient before
//! the refund leg runs, so a rejected bid leaves both vaults untouched
//! and an accepted bid never leaves two vaults funded.
//!
//! Auction expiry is a wall-clock comparison at call time. No background
//! timer exists; the listing stays formally active until a settlement
//! call after `end_time`.

use tixmart_custody::Clock;
use tixmart_types::{AccountId, Listing, ListingId, MarketError, MarketEvent, Result};

use crate::engine::MarketEngine;

impl<C: Clock> MarketEngine<C> {
    /// Place a bid on an auction listing.
    ///
    /// `previous_bidder` is the caller's view of the current high bidder
    /// and must match the listing's record exactly; a mismatch is treated
    /// as a potential attack.
    ///
    /// # Errors
    /// - `MarketplacePaused` while paused
    /// - `NotAuction` for fixed-price listings
    /// - `ListingNotActive` if the listing left `Active` or the auction
    ///   window has closed
    /// - `SelfBidBlocked` if the seller bids on their own listing
    /// - `BidTooLow` if the amount does not strictly exceed the floor
    /// - `InvalidAccountBinding` if `previous_bidder` is stale
    /// - `InsufficientFunds` if the bidder cannot fund the vault
    pub fn place_bid(
        &mut self,
        bidder: AccountId,
        listing_id: ListingId,
        amount: u64,
        previous_bidder: Option<AccountId>,
    ) -> Result<Listing> {
        self.config.ensure_active()?;

        let (mut listing, version) = self.listings.snapshot(listing_id)?;
        let floor = listing.bid_floor().ok_or(MarketError::NotAuction)?;
        if !listing.is_active() {
            return Err(MarketError::ListingNotActive);
        }
        let now = self.clock.now();
        if listing.auction_ended(now) {
            return Err(MarketError::ListingNotActive);
        }
        if bidder == listing.seller {
            return Err(MarketError::SelfBidBlocked);
        }
        if amount <= floor {
            return Err(MarketError::BidTooLow {
                offered: amount,
                floor,
            });
        }
        if previous_bidder != listing.highest_bidder {
            return Err(MarketError::InvalidAccountBinding {
                reason: format!(
                    "previous bidder {previous_bidder:?} does not match the standing high bidder"
                ),
            });
        }

        // Verify the new bid can be funded before the refund leg runs:
        // both-or-neither.
        let available = self.ledger.available(bidder);
        if available < amount {
            return Err(MarketError::InsufficientFunds {
                needed: amount,
                available,
            });
        }

        if let Some(superseded) = listing.highest_bidder {
            let refunded = self
                .vaults
                .drain(&mut self.ledger, listing_id, superseded)?;
            tracing::debug!(
                listing = %listing_id,
                bidder = %superseded,
                refunded,
                "superseded bidder refunded"
            );
            self.emit(MarketEvent::BidRefunded {
                listing_id,
                bidder: superseded,
                amount: refunded,
            });
        }

        self.vaults
            .fund(&mut self.ledger, listing_id, bidder, amount)?;

        listing.highest_bidder = Some(bidder);
        listing.highest_bid = amount;
        listing.bid_count += 1;
        listing.updated_at = now;
        self.listings.commit(version, listing.clone())?;
        self.verify_conservation()?;

        tracing::debug!(listing = %listing_id, bidder = %bidder, amount, "bid accepted");
        self.emit(MarketEvent::BidPlaced {
            listing_id,
            bidder,
            amount,
        });
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tixmart_custody::ManualClock;
    use tixmart_types::{AssetId, ListingTerms, RoyaltySchedule};

    struct Setup {
        engine: MarketEngine<ManualClock>,
        listing_id: ListingId,
        seller: AccountId,
    }

    fn setup() -> Setup {
        let clock = ManualClock::new(Utc::now());
        let mut engine =
            MarketEngine::with_clock(AccountId::new(), AccountId::new(), 250, 1000, clock)
                .unwrap();
        let seller = AccountId::new();
        let asset = AssetId::new();
        engine.register_asset(asset, seller);
        let listing = engine
            .create_listing(
                seller,
                asset,
                ListingTerms::Auction {
                    min_bid: 1_000_000,
                    duration_secs: 3600,
                },
                RoyaltySchedule::empty(),
            )
            .unwrap();
        Setup {
            engine,
            listing_id: listing.id,
            seller,
        }
    }

    fn funded_bidder(setup: &mut Setup, balance: u64) -> AccountId {
        let bidder = AccountId::new();
        setup.engine.deposit(bidder, balance).unwrap();
        bidder
    }

    #[test]
    fn first_bid_must_reach_min_bid() {
        let mut setup = setup();
        let bidder = funded_bidder(&mut setup, 10_000_000);

        let err = setup
            .engine
            .place_bid(bidder, setup.listing_id, 999_999, None)
            .unwrap_err();
        assert!(matches!(
            err,
            MarketError::BidTooLow {
                offered: 999_999,
                floor: 999_999
            }
        ));

        // Exactly min_bid is accepted (strictly above min_bid - 1).
        let listing = setup
            .engine
            .place_bid(bidder, setup.listing_id, 1_000_000, None)
            .unwrap();
        assert_eq!(listing.highest_bid, 1_000_000);
        assert_eq!(listing.highest_bidder, Some(bidder));
        assert_eq!(listing.bid_count, 1);
    }

    #[test]
    fn reference_bid_sequence() {
        let mut setup = setup();
        let first = funded_bidder(&mut setup, 10_000_000);
        let second = funded_bidder(&mut setup, 10_000_000);

        setup
            .engine
            .place_bid(first, setup.listing_id, 2_000_000, None)
            .unwrap();

        // Outbid refunds the first bidder in full.
        setup
            .engine
            .place_bid(second, setup.listing_id, 2_500_000, Some(first))
            .unwrap();
        assert_eq!(setup.engine.available(first), 10_000_000);
        assert_eq!(setup.engine.vault_balance(setup.listing_id, first), 0);
        assert_eq!(
            setup.engine.vault_balance(setup.listing_id, second),
            2_500_000
        );

        // Equal bid rejected.
        let err = setup
            .engine
            .place_bid(first, setup.listing_id, 2_500_000, Some(second))
            .unwrap_err();
        assert!(matches!(err, MarketError::BidTooLow { .. }));

        // Lower bid rejected.
        let err = setup
            .engine
            .place_bid(first, setup.listing_id, 1_500_000, Some(second))
            .unwrap_err();
        assert!(matches!(err, MarketError::BidTooLow { .. }));
    }

    #[test]
    fn stale_previous_bidder_rejected() {
        let mut setup = setup();
        let first = funded_bidder(&mut setup, 10_000_000);
        let second = funded_bidder(&mut setup, 10_000_000);

        setup
            .engine
            .place_bid(first, setup.listing_id, 2_000_000, None)
            .unwrap();

        // Claims nobody is winning — stale view.
        let err = setup
            .engine
            .place_bid(second, setup.listing_id, 3_000_000, None)
            .unwrap_err();
        assert!(matches!(err, MarketError::InvalidAccountBinding { .. }));

        // Claims the wrong winner.
        let err = setup
            .engine
            .place_bid(second, setup.listing_id, 3_000_000, Some(second))
            .unwrap_err();
        assert!(matches!(err, MarketError::InvalidAccountBinding { .. }));

        // First bidder's vault untouched by the rejected attempts.
        assert_eq!(
            setup.engine.vault_balance(setup.listing_id, first),
            2_000_000
        );
    }

    #[test]
    fn underfunded_bid_leaves_standing_bid_intact() {
        let mut setup = setup();
        let first = funded_bidder(&mut setup, 10_000_000);
        let poor = funded_bidder(&mut setup, 1_000_000);

        setup
            .engine
            .place_bid(first, setup.listing_id, 2_000_000, None)
            .unwrap();

        let err = setup
            .engine
            .place_bid(poor, setup.listing_id, 3_000_000, Some(first))
            .unwrap_err();
        assert!(matches!(err, MarketError::InsufficientFunds { .. }));

        // Both-or-neither: the first bidder is still funded and winning.
        assert_eq!(
            setup.engine.vault_balance(setup.listing_id, first),
            2_000_000
        );
        let listing = setup.engine.listing(&setup.listing_id).unwrap();
        assert_eq!(listing.highest_bidder, Some(first));
        assert_eq!(setup.engine.available(poor), 1_000_000);
    }

    #[test]
    fn bid_on_fixed_price_rejected() {
        let mut setup = setup();
        let seller2 = AccountId::new();
        let asset = AssetId::new();
        setup.engine.register_asset(asset, seller2);
        let fixed = setup
            .engine
            .create_listing(
                seller2,
                asset,
                ListingTerms::FixedPrice { price: 1_000_000 },
                RoyaltySchedule::empty(),
            )
            .unwrap();
        let bidder = funded_bidder(&mut setup, 10_000_000);

        let err = setup
            .engine
            .place_bid(bidder, fixed.id, 2_000_000, None)
            .unwrap_err();
        assert!(matches!(err, MarketError::NotAuction));
    }

    #[test]
    fn seller_cannot_bid_on_own_listing() {
        let mut setup = setup();
        let seller = setup.seller;
        setup.engine.deposit(seller, 10_000_000).unwrap();

        let err = setup
            .engine
            .place_bid(seller, setup.listing_id, 2_000_000, None)
            .unwrap_err();
        assert!(matches!(err, MarketError::SelfBidBlocked));
    }

    #[test]
    fn bid_after_expiry_rejected() {
        let mut setup = setup();
        let bidder = funded_bidder(&mut setup, 10_000_000);
        setup.engine.clock().advance(Duration::seconds(3600));

        let err = setup
            .engine
            .place_bid(bidder, setup.listing_id, 2_000_000, None)
            .unwrap_err();
        assert!(matches!(err, MarketError::ListingNotActive));
    }

    #[test]
    fn bid_while_paused_rejected() {
        let mut setup = setup();
        let authority = setup.engine.config().authority;
        let bidder = funded_bidder(&mut setup, 10_000_000);

        setup.engine.pause(authority).unwrap();
        let err = setup
            .engine
            .place_bid(bidder, setup.listing_id, 2_000_000, None)
            .unwrap_err();
        assert!(matches!(err, MarketError::MarketplacePaused));
        assert_eq!(setup.engine.available(bidder), 10_000_000);
    }

    #[test]
    fn monotonic_bid_sequence_refunds_each_loser() {
        let mut setup = setup();
        let bidders: Vec<AccountId> = (0..4).map(|_| funded_bidder(&mut setup, 50_000_000)).collect();

        let mut previous: Option<AccountId> = None;
        let mut amount = 1_000_000;
        for &bidder in &bidders {
            setup
                .engine
                .place_bid(bidder, setup.listing_id, amount, previous)
                .unwrap();
            previous = Some(bidder);
            amount += 750_000;
        }

        // Only the final bidder's vault is funded; all others were made whole.
        for (index, &bidder) in bidders.iter().enumerate() {
            if index == bidders.len() - 1 {
                assert!(setup.engine.vault_balance(setup.listing_id, bidder) > 0);
            } else {
                assert_eq!(setup.engine.vault_balance(setup.listing_id, bidder), 0);
                assert_eq!(setup.engine.available(bidder), 50_000_000);
            }
        }
        let listing = setup.engine.listing(&setup.listing_id).unwrap();
        assert_eq!(listing.bid_count, 4);
    }
}
