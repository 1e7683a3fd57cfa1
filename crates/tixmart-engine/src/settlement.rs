//! Settlement: buy-now and accept-winning-bid.
//!
//! Both paths share the same shape:
//! 1. Validate the listing, caller, and escrow binding
//! 2. Compute the proceeds split (integer bps, floor division, remainder
//!    to the seller)
//! 3. Move funds to the fee collector, each royalty recipient, and the
//!    seller, in that fixed order, as one all-or-nothing batch
//! 4. Release the escrowed asset to the buyer
//! 5. Commit the terminal `Sold` state and append a receipt
//!
//! Every fallible step runs before the first mutation, so a failing leg
//! leaves the listing active and every balance untouched. The engine
//! re-verifies fund conservation after each settlement.

use tixmart_custody::{Clock, TransferLeg};
use tixmart_types::{
    AccountId, ListingId, ListingStatus, MarketError, MarketEvent, Pricing, ProceedsSplit, Result,
    SaleReceipt,
};

use crate::engine::MarketEngine;

impl<C: Clock> MarketEngine<C> {
    /// Buy a fixed-price listing outright.
    ///
    /// # Errors
    /// - `MarketplacePaused` while paused
    /// - `NotBuyNow` for auction listings
    /// - `ListingNotActive` unless the listing is active (a sold listing
    ///   settles at most once)
    /// - `SelfBidBlocked` if the seller buys their own listing
    /// - `RoyaltyExceedsLimit` / `ArithmeticOverflow` from the split math
    /// - `InsufficientFunds` if the buyer cannot cover the price; no leg
    ///   applies in that case
    pub fn buy_now(&mut self, buyer: AccountId, listing_id: ListingId) -> Result<SaleReceipt> {
        self.config.ensure_active()?;

        let (mut listing, version) = self.listings.snapshot(listing_id)?;
        let price = match listing.pricing {
            Pricing::FixedPrice { price } => price,
            Pricing::Auction { .. } => return Err(MarketError::NotBuyNow),
        };
        if !listing.is_active() {
            return Err(MarketError::ListingNotActive);
        }
        if buyer == listing.seller {
            return Err(MarketError::SelfBidBlocked);
        }

        let split = ProceedsSplit::compute(
            price,
            self.config.platform_fee_bps,
            &listing.royalties,
            self.config.max_royalty_bps,
        )?;
        split.verify()?;
        self.custody.ensure_held(listing.escrow, listing_id)?;
        let (total_volume, total_fees) = self.config.project_sale(price, split.platform_fee)?;

        // Fixed payout order: platform fee, royalties, seller. One batch,
        // all-or-nothing against the buyer's balance.
        let mut legs = Vec::with_capacity(split.royalties.len() + 2);
        legs.push(TransferLeg {
            from: buyer,
            to: self.config.fee_collector,
            amount: split.platform_fee,
        });
        for payout in &split.royalties {
            legs.push(TransferLeg {
                from: buyer,
                to: payout.recipient,
                amount: payout.amount,
            });
        }
        legs.push(TransferLeg {
            from: buyer,
            to: listing.seller,
            amount: split.seller_amount,
        });
        self.ledger.apply(&legs)?;

        self.custody.release(listing.escrow, buyer)?;

        let now = self.clock.now();
        listing.transition(ListingStatus::Sold, now)?;
        listing.buyer = Some(buyer);
        listing.sale_price = price;
        self.listings.commit(version, listing.clone())?;

        self.config.total_volume = total_volume;
        self.config.total_fees_collected = total_fees;

        self.finish_settlement(&listing, buyer, &split, now)
    }

    /// Settle an ended auction by accepting the winning bid. Seller only.
    ///
    /// The winning bid vault is the payment source; the split and asset
    /// release are identical to [`Self::buy_now`].
    ///
    /// # Errors
    /// - `MarketplacePaused` while paused
    /// - `NotAuction` for fixed-price listings
    /// - `Unauthorized` unless `caller` is the seller
    /// - `ListingNotActive` unless the listing is active
    /// - `NoBids` if no bid was ever accepted
    /// - `AuctionNotEnded` before the end time
    pub fn accept_winning_bid(
        &mut self,
        caller: AccountId,
        listing_id: ListingId,
    ) -> Result<SaleReceipt> {
        self.config.ensure_active()?;

        let (mut listing, version) = self.listings.snapshot(listing_id)?;
        if !listing.is_auction() {
            return Err(MarketError::NotAuction);
        }
        if caller != listing.seller {
            return Err(MarketError::Unauthorized {
                reason: format!("caller {caller} is not the seller of listing {listing_id}"),
            });
        }
        if !listing.is_active() {
            return Err(MarketError::ListingNotActive);
        }
        let Some(winner) = listing.highest_bidder else {
            return Err(MarketError::NoBids);
        };
        if listing.highest_bid == 0 {
            return Err(MarketError::NoBids);
        }
        let now = self.clock.now();
        if !listing.auction_ended(now) {
            return Err(MarketError::AuctionNotEnded);
        }

        let price = listing.highest_bid;
        let split = ProceedsSplit::compute(
            price,
            self.config.platform_fee_bps,
            &listing.royalties,
            self.config.max_royalty_bps,
        )?;
        split.verify()?;
        self.custody.ensure_held(listing.escrow, listing_id)?;
        let (total_volume, total_fees) = self.config.project_sale(price, split.platform_fee)?;

        // The winning vault must hold exactly the recorded high bid before
        // any leg runs; the payout batch is all-or-nothing, and the vault
        // take below cannot fail once this holds.
        let vault_balance = self.vaults.balance(listing_id, winner);
        if vault_balance != price {
            return Err(MarketError::ConservationViolation {
                reason: format!(
                    "winning vault for ({listing_id}, {winner}) holds {vault_balance}, expected {price}"
                ),
            });
        }

        // Fixed payout order: platform fee, royalties, seller.
        let mut credits = Vec::with_capacity(split.royalties.len() + 2);
        credits.push((self.config.fee_collector, split.platform_fee));
        for payout in &split.royalties {
            credits.push((payout.recipient, payout.amount));
        }
        credits.push((listing.seller, split.seller_amount));

        self.ledger.payout(&credits)?;
        self.vaults.take(listing_id, winner, price)?;

        self.custody.release(listing.escrow, winner)?;

        listing.transition(ListingStatus::Sold, now)?;
        listing.buyer = Some(winner);
        listing.sale_price = price;
        self.listings.commit(version, listing.clone())?;

        self.config.total_volume = total_volume;
        self.config.total_fees_collected = total_fees;

        self.finish_settlement(&listing, winner, &split, now)
    }

    fn finish_settlement(
        &mut self,
        listing: &tixmart_types::Listing,
        buyer: AccountId,
        split: &ProceedsSplit,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<SaleReceipt> {
        let receipt = SaleReceipt::from_split(listing.id, buyer, listing.seller, split, now);
        receipt.verify_conservation()?;
        self.verify_conservation()?;

        tracing::info!(
            listing = %listing.id,
            buyer = %buyer,
            seller = %listing.seller,
            price = split.price,
            platform_fee = split.platform_fee,
            royalty_total = split.royalty_total(),
            seller_amount = split.seller_amount,
            "settlement completed"
        );
        self.emit(MarketEvent::ItemSold {
            listing_id: listing.id,
            buyer,
            seller: listing.seller,
            price: split.price,
            platform_fee: split.platform_fee,
            royalty_total: split.royalty_total(),
        });
        self.receipts.push(receipt.clone());
        Ok(receipt)
    }
}
