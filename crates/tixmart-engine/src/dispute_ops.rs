//! Dispute resolution: a counterparty contests a listing, the authority
//! rules exactly once.
//!
//! Fund convention: resolution moves only the asset. Fund positions as of
//! dispute time are final — opening a dispute on an active listing
//! refunds any standing bid immediately (mirror of cancel), and opening
//! one on a sold listing re-escrows the asset from the buyer without
//! clawing back the settled proceeds.

use tixmart_custody::Clock;
use tixmart_types::{
    constants, AccountId, Dispute, DisputeId, DisputeResolution, DisputeStatus, ListingId,
    ListingStatus, MarketError, MarketEvent, Result,
};

use crate::engine::MarketEngine;

impl<C: Clock> MarketEngine<C> {
    /// Contest a listing. Allowed on `Active` or `Sold` listings, by the
    /// seller or the buyer-side party (the standing high bidder for an
    /// active auction; the recorded buyer for a sold listing).
    ///
    /// # Errors
    /// - `MarketplacePaused` while paused
    /// - `DisputeReasonTooLong` for an oversized reason
    /// - `ListingNotActive` for cancelled or already-disputed listings
    /// - `Unauthorized` if the initiator is neither counterparty
    /// - `AssetNotOwned` if a sold listing's buyer no longer holds the
    ///   asset (nothing to re-escrow; no dispute is created)
    pub fn open_dispute(
        &mut self,
        initiator: AccountId,
        listing_id: ListingId,
        reason: impl Into<String>,
    ) -> Result<Dispute> {
        self.config.ensure_active()?;

        let reason = reason.into();
        if reason.len() > constants::MAX_DISPUTE_REASON_LEN {
            return Err(MarketError::DisputeReasonTooLong {
                max: constants::MAX_DISPUTE_REASON_LEN,
            });
        }

        let (mut listing, version) = self.listings.snapshot(listing_id)?;
        let buyer_party = match listing.status {
            ListingStatus::Active => listing.highest_bidder,
            ListingStatus::Sold => listing.buyer,
            ListingStatus::Cancelled | ListingStatus::Disputed => {
                return Err(MarketError::ListingNotActive);
            }
        };
        if initiator != listing.seller && Some(initiator) != buyer_party {
            return Err(MarketError::Unauthorized {
                reason: format!(
                    "initiator {initiator} is neither the seller nor the buyer-side party of listing {listing_id}"
                ),
            });
        }

        let now = self.clock.now();
        if listing.status == ListingStatus::Active {
            // A standing bid is refunded at dispute time; only the asset
            // remains contested.
            if let Some(bidder) = listing.highest_bidder.take() {
                let refunded = self.vaults.drain(&mut self.ledger, listing_id, bidder)?;
                listing.highest_bid = 0;
                self.emit(MarketEvent::BidRefunded {
                    listing_id,
                    bidder,
                    amount: refunded,
                });
            }
        } else {
            // Sold: settlement proceeds are final; the asset returns to
            // custody so the resolution can move it.
            let buyer = buyer_party.ok_or_else(|| {
                MarketError::Internal(format!("sold listing {listing_id} has no buyer"))
            })?;
            listing.escrow = self
                .custody
                .hold(listing_id, listing.asset_id, buyer, now)?;
        }

        listing.transition(ListingStatus::Disputed, now)?;
        self.listings.commit(version, listing)?;
        self.verify_conservation()?;

        let dispute = Dispute {
            id: DisputeId::new(),
            listing_id,
            initiator,
            reason,
            buyer_party,
            status: DisputeStatus::Open,
            resolution: None,
            opened_at: now,
            resolved_at: None,
        };
        self.disputes.insert(dispute.id, dispute.clone());

        tracing::info!(
            dispute = %dispute.id,
            listing = %listing_id,
            initiator = %initiator,
            "dispute opened"
        );
        self.emit(MarketEvent::DisputeOpened {
            dispute_id: dispute.id,
            listing_id,
            initiator,
        });
        Ok(dispute)
    }

    /// Rule on an open dispute. Authority only; a dispute resolves exactly
    /// once and can never be reopened.
    ///
    /// `favors_buyer` releases the escrowed asset to the buyer-side party;
    /// otherwise the asset goes back to the seller. No funds move in
    /// either direction.
    ///
    /// # Errors
    /// - `MarketplacePaused` while paused
    /// - `Unauthorized` unless `caller` is the marketplace authority
    /// - `DisputeNotFound` / `DisputeNotOpen` for unknown or settled
    ///   disputes
    /// - `InvalidAccountBinding` if `favors_buyer` is requested but the
    ///   dispute has no buyer-side party
    pub fn resolve_dispute(
        &mut self,
        caller: AccountId,
        dispute_id: DisputeId,
        favors_buyer: bool,
    ) -> Result<Dispute> {
        self.config.ensure_active()?;
        self.config.ensure_authority(caller)?;

        let dispute = self
            .disputes
            .get(&dispute_id)
            .ok_or(MarketError::DisputeNotFound(dispute_id))?
            .clone();
        if !dispute.is_open() {
            return Err(MarketError::DisputeNotOpen);
        }

        let (mut listing, version) = self.listings.snapshot(dispute.listing_id)?;
        if listing.status != ListingStatus::Disputed {
            return Err(MarketError::Internal(format!(
                "dispute {dispute_id} is open but listing {} is {}",
                listing.id, listing.status
            )));
        }
        self.custody.ensure_held(listing.escrow, listing.id)?;

        let now = self.clock.now();
        let (resolution, recipient, terminal) = if favors_buyer {
            let buyer = dispute.buyer_party.ok_or_else(|| {
                MarketError::InvalidAccountBinding {
                    reason: format!("dispute {dispute_id} has no buyer-side party to favor"),
                }
            })?;
            (DisputeResolution::FavorsBuyer, buyer, ListingStatus::Sold)
        } else {
            (
                DisputeResolution::FavorsSeller,
                listing.seller,
                ListingStatus::Cancelled,
            )
        };

        self.custody.release(listing.escrow, recipient)?;
        if terminal == ListingStatus::Sold {
            listing.buyer = dispute.buyer_party;
        }
        listing.transition(terminal, now)?;
        self.listings.commit(version, listing)?;

        let mut resolved = dispute;
        resolved.mark_resolved(resolution, now)?;
        self.disputes.insert(dispute_id, resolved.clone());

        tracing::info!(
            dispute = %dispute_id,
            listing = %resolved.listing_id,
            resolution = %resolution,
            "dispute resolved"
        );
        self.emit(MarketEvent::DisputeResolved {
            dispute_id,
            listing_id: resolved.listing_id,
            resolution,
        });
        Ok(resolved)
    }
}
