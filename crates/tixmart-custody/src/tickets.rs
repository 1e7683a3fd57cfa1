//! Ticket custody: unique-asset ownership and escrow handles.
//!
//! The custody registry is the in-process implementation of the asset
//! custody adapter. Listing an asset moves it out of the seller's
//! ownership and into an [`EscrowHandle`]; settlement or cancellation
//! empties that handle exactly once.
//!
//! ## Handle State Machine
//!
//! ```text
//!   ┌──────┐  release (settlement / resolution)  ┌──────────┐
//!   │ HELD ├────────────────────────────────────▶│ RELEASED │
//!   └──┬───┘                                     └──────────┘
//!      │ return (cancel)
//!      ▼
//!   ┌──────────┐
//!   │ RETURNED │
//!   └──────────┘
//! ```
//!
//! Transitions are monotonic. An emptied handle can never release again,
//! which is what makes the exactly-once release guarantee hold.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tixmart_types::{AccountId, AssetId, EscrowId, ListingId, MarketError, Result};

/// Lifecycle state of an escrow handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscrowState {
    /// The asset sits in custody for its listing.
    Held,
    /// The asset was released to a buyer. **Irreversible.**
    Released,
    /// The asset went back to its depositor. **Irreversible.**
    Returned,
}

impl EscrowState {
    /// Can this handle transition to the given target state?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Held, Self::Released | Self::Returned)
        )
    }
}

impl std::fmt::Display for EscrowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Held => write!(f, "HELD"),
            Self::Released => write!(f, "RELEASED"),
            Self::Returned => write!(f, "RETURNED"),
        }
    }
}

/// A custody record binding one unit of an asset to one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowHandle {
    pub id: EscrowId,
    pub listing_id: ListingId,
    pub asset_id: AssetId,
    /// The account that moved the asset into custody.
    pub depositor: AccountId,
    pub state: EscrowState,
    pub created_at: DateTime<Utc>,
}

impl EscrowHandle {
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.state == EscrowState::Held
    }
}

/// Ownership registry and escrow manager for uniquely-owned assets.
///
/// While an asset is escrowed it has no owner in the registry; exactly
/// one `Held` handle refers to it.
#[derive(Debug, Default)]
pub struct TicketCustody {
    owners: HashMap<AssetId, AccountId>,
    escrows: HashMap<EscrowId, EscrowHandle>,
}

impl TicketCustody {
    /// Create a new empty custody registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register initial ownership of an asset (the mint analog).
    pub fn register(&mut self, asset_id: AssetId, owner: AccountId) {
        self.owners.insert(asset_id, owner);
    }

    /// The current owner of an asset. `None` while it sits in escrow.
    #[must_use]
    pub fn owner_of(&self, asset_id: AssetId) -> Option<AccountId> {
        self.owners.get(&asset_id).copied()
    }

    /// Move one unit of `asset_id` from `from` into escrow for
    /// `listing_id`.
    ///
    /// # Errors
    /// Returns `AssetNotOwned` if `from` does not own the asset; nothing
    /// changes in that case.
    pub fn hold(
        &mut self,
        listing_id: ListingId,
        asset_id: AssetId,
        from: AccountId,
        now: DateTime<Utc>,
    ) -> Result<EscrowId> {
        if self.owner_of(asset_id) != Some(from) {
            return Err(MarketError::AssetNotOwned(asset_id));
        }

        self.owners.remove(&asset_id);
        let id = EscrowId::new();
        self.escrows.insert(
            id,
            EscrowHandle {
                id,
                listing_id,
                asset_id,
                depositor: from,
                state: EscrowState::Held,
                created_at: now,
            },
        );
        tracing::debug!(escrow = %id, asset = %asset_id, listing = %listing_id, "asset held in escrow");
        Ok(id)
    }

    /// Release the escrowed asset to `to`. Exactly once per handle.
    ///
    /// # Errors
    /// - `EscrowNotFound` if the handle does not exist
    /// - `EscrowNotHeld` if the handle was already emptied
    pub fn release(&mut self, escrow_id: EscrowId, to: AccountId) -> Result<()> {
        let handle = self.transition(escrow_id, EscrowState::Released)?;
        self.owners.insert(handle.asset_id, to);
        tracing::debug!(escrow = %escrow_id, to = %to, "escrowed asset released");
        Ok(())
    }

    /// Return the escrowed asset to its depositor. Exactly once per handle.
    ///
    /// # Errors
    /// - `EscrowNotFound` / `EscrowNotHeld` as for [`Self::release`]
    /// - `InvalidAccountBinding` if `to` is not the recorded depositor
    pub fn return_to(&mut self, escrow_id: EscrowId, to: AccountId) -> Result<()> {
        let depositor = self
            .escrows
            .get(&escrow_id)
            .ok_or(MarketError::EscrowNotFound(escrow_id))?
            .depositor;
        if to != depositor {
            return Err(MarketError::InvalidAccountBinding {
                reason: format!("escrow {escrow_id} was deposited by {depositor}, not {to}"),
            });
        }
        let handle = self.transition(escrow_id, EscrowState::Returned)?;
        self.owners.insert(handle.asset_id, depositor);
        tracing::debug!(escrow = %escrow_id, to = %to, "escrowed asset returned to depositor");
        Ok(())
    }

    /// Check that a handle is held and bound to the expected listing.
    ///
    /// # Errors
    /// - `EscrowNotFound` / `EscrowNotHeld` as for [`Self::release`]
    /// - `InvalidAccountBinding` if the handle belongs to another listing
    pub fn ensure_held(&self, escrow_id: EscrowId, listing_id: ListingId) -> Result<()> {
        let handle = self
            .escrows
            .get(&escrow_id)
            .ok_or(MarketError::EscrowNotFound(escrow_id))?;
        if handle.listing_id != listing_id {
            return Err(MarketError::InvalidAccountBinding {
                reason: format!(
                    "escrow {escrow_id} is bound to listing {}, not {listing_id}",
                    handle.listing_id
                ),
            });
        }
        if !handle.is_held() {
            return Err(MarketError::EscrowNotHeld {
                id: escrow_id,
                state: handle.state.to_string(),
            });
        }
        Ok(())
    }

    /// Look up an escrow handle.
    #[must_use]
    pub fn get(&self, escrow_id: &EscrowId) -> Option<&EscrowHandle> {
        self.escrows.get(escrow_id)
    }

    /// Number of handles currently in the `Held` state.
    #[must_use]
    pub fn held_count(&self) -> usize {
        self.escrows.values().filter(|handle| handle.is_held()).count()
    }

    fn transition(&mut self, escrow_id: EscrowId, target: EscrowState) -> Result<EscrowHandle> {
        let handle = self
            .escrows
            .get_mut(&escrow_id)
            .ok_or(MarketError::EscrowNotFound(escrow_id))?;
        if !handle.state.can_transition_to(target) {
            return Err(MarketError::EscrowNotHeld {
                id: escrow_id,
                state: handle.state.to_string(),
            });
        }
        handle.state = target;
        Ok(handle.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (TicketCustody, AccountId, AssetId) {
        let mut custody = TicketCustody::new();
        let seller = AccountId::new();
        let asset = AssetId::new();
        custody.register(asset, seller);
        (custody, seller, asset)
    }

    #[test]
    fn hold_moves_ownership_into_escrow() {
        let (mut custody, seller, asset) = setup();
        let listing = ListingId::new();
        let escrow = custody.hold(listing, asset, seller, Utc::now()).unwrap();

        assert_eq!(custody.owner_of(asset), None);
        assert!(custody.get(&escrow).unwrap().is_held());
        assert_eq!(custody.held_count(), 1);
        assert!(custody.ensure_held(escrow, listing).is_ok());
    }

    #[test]
    fn hold_by_non_owner_fails() {
        let (mut custody, _seller, asset) = setup();
        let intruder = AccountId::new();
        let err = custody
            .hold(ListingId::new(), asset, intruder, Utc::now())
            .unwrap_err();
        assert!(matches!(err, MarketError::AssetNotOwned(a) if a == asset));
        // Ownership unchanged
        assert!(custody.owner_of(asset).is_some());
    }

    #[test]
    fn release_transfers_to_buyer() {
        let (mut custody, seller, asset) = setup();
        let escrow = custody
            .hold(ListingId::new(), asset, seller, Utc::now())
            .unwrap();
        let buyer = AccountId::new();

        custody.release(escrow, buyer).unwrap();
        assert_eq!(custody.owner_of(asset), Some(buyer));
        assert_eq!(custody.get(&escrow).unwrap().state, EscrowState::Released);
        assert_eq!(custody.held_count(), 0);
    }

    #[test]
    fn double_release_blocked() {
        let (mut custody, seller, asset) = setup();
        let escrow = custody
            .hold(ListingId::new(), asset, seller, Utc::now())
            .unwrap();
        let buyer = AccountId::new();
        custody.release(escrow, buyer).unwrap();

        let err = custody.release(escrow, AccountId::new()).unwrap_err();
        assert!(matches!(err, MarketError::EscrowNotHeld { .. }));
        // First release stands
        assert_eq!(custody.owner_of(asset), Some(buyer));
    }

    #[test]
    fn return_goes_back_to_depositor() {
        let (mut custody, seller, asset) = setup();
        let escrow = custody
            .hold(ListingId::new(), asset, seller, Utc::now())
            .unwrap();

        custody.return_to(escrow, seller).unwrap();
        assert_eq!(custody.owner_of(asset), Some(seller));
        assert_eq!(custody.get(&escrow).unwrap().state, EscrowState::Returned);
    }

    #[test]
    fn return_to_wrong_account_rejected() {
        let (mut custody, seller, asset) = setup();
        let escrow = custody
            .hold(ListingId::new(), asset, seller, Utc::now())
            .unwrap();

        let err = custody.return_to(escrow, AccountId::new()).unwrap_err();
        assert!(matches!(err, MarketError::InvalidAccountBinding { .. }));
        // Still escrowed
        assert!(custody.get(&escrow).unwrap().is_held());
    }

    #[test]
    fn released_cannot_be_returned() {
        let (mut custody, seller, asset) = setup();
        let escrow = custody
            .hold(ListingId::new(), asset, seller, Utc::now())
            .unwrap();
        custody.release(escrow, AccountId::new()).unwrap();

        let err = custody.return_to(escrow, seller).unwrap_err();
        assert!(matches!(err, MarketError::EscrowNotHeld { .. }));
    }

    #[test]
    fn ensure_held_checks_listing_binding() {
        let (mut custody, seller, asset) = setup();
        let listing = ListingId::new();
        let escrow = custody.hold(listing, asset, seller, Utc::now()).unwrap();

        let err = custody.ensure_held(escrow, ListingId::new()).unwrap_err();
        assert!(matches!(err, MarketError::InvalidAccountBinding { .. }));
    }

    #[test]
    fn nonexistent_escrow_errors() {
        let custody = TicketCustody::new();
        let fake = EscrowId::new();
        let err = custody.ensure_held(fake, ListingId::new()).unwrap_err();
        assert!(matches!(err, MarketError::EscrowNotFound(id) if id == fake));
    }

    #[test]
    fn rehold_after_release_creates_fresh_handle() {
        // A buyer who received the asset can escrow it again (dispute path).
        let (mut custody, seller, asset) = setup();
        let first = custody
            .hold(ListingId::new(), asset, seller, Utc::now())
            .unwrap();
        let buyer = AccountId::new();
        custody.release(first, buyer).unwrap();

        let listing = ListingId::new();
        let second = custody.hold(listing, asset, buyer, Utc::now()).unwrap();
        assert_ne!(first, second);
        assert!(custody.ensure_held(second, listing).is_ok());
        assert_eq!(custody.get(&second).unwrap().depositor, buyer);
    }

    #[test]
    fn state_transitions() {
        assert!(EscrowState::Held.can_transition_to(EscrowState::Released));
        assert!(EscrowState::Held.can_transition_to(EscrowState::Returned));
        assert!(!EscrowState::Released.can_transition_to(EscrowState::Returned));
        assert!(!EscrowState::Returned.can_transition_to(EscrowState::Released));
        assert!(!EscrowState::Released.can_transition_to(EscrowState::Held));
    }

    #[test]
    fn handle_serde_roundtrip() {
        let (mut custody, seller, asset) = setup();
        let escrow = custody
            .hold(ListingId::new(), asset, seller, Utc::now())
            .unwrap();
        let handle = custody.get(&escrow).unwrap();
        let json = serde_json::to_string(handle).unwrap();
        let back: EscrowHandle = serde_json::from_str(&json).unwrap();
        assert_eq!(*handle, back);
    }
}
