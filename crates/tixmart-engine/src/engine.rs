//! The market engine: one deployment's configuration, stores, and
//! custody, behind the public settlement API.
//!
//! The engine owns its [`MarketplaceConfig`] rather than consulting a
//! process-wide singleton, so multiple deployments can coexist in one
//! process. It has no threading model of its own: every operation is a
//! discrete call that either completes and commits, or fails and leaves
//! all state untouched (per-listing versioning enforces the single-writer
//! rule, see [`crate::store`]).

use std::collections::HashMap;

use tixmart_custody::{BidVaultBank, CashLedger, Clock, SystemClock, TicketCustody};
use tixmart_types::{
    constants, AccountId, AssetId, Dispute, DisputeId, Listing, ListingId, MarketError,
    MarketEvent, MarketplaceConfig, Result, SaleReceipt,
};

use crate::audit::ConservationAudit;
use crate::store::ListingStore;

/// One marketplace deployment.
#[derive(Debug)]
pub struct MarketEngine<C: Clock = SystemClock> {
    pub(crate) config: MarketplaceConfig,
    pub(crate) listings: ListingStore,
    pub(crate) disputes: HashMap<DisputeId, Dispute>,
    pub(crate) ledger: CashLedger,
    pub(crate) custody: TicketCustody,
    pub(crate) vaults: BidVaultBank,
    pub(crate) audit: ConservationAudit,
    pub(crate) receipts: Vec<SaleReceipt>,
    pub(crate) events: Vec<MarketEvent>,
    pub(crate) clock: C,
}

impl MarketEngine<SystemClock> {
    /// Bootstrap a deployment with the system clock.
    ///
    /// # Errors
    /// Returns `InvalidFee` if either rate exceeds 10000 bps.
    pub fn initialize(
        authority: AccountId,
        fee_collector: AccountId,
        platform_fee_bps: u16,
        max_royalty_bps: u16,
    ) -> Result<Self> {
        Self::with_clock(
            authority,
            fee_collector,
            platform_fee_bps,
            max_royalty_bps,
            SystemClock,
        )
    }
}

impl<C: Clock> MarketEngine<C> {
    /// Bootstrap a deployment with an explicit clock source.
    ///
    /// # Errors
    /// Returns `InvalidFee` if either rate exceeds 10000 bps.
    pub fn with_clock(
        authority: AccountId,
        fee_collector: AccountId,
        platform_fee_bps: u16,
        max_royalty_bps: u16,
        clock: C,
    ) -> Result<Self> {
        let config =
            MarketplaceConfig::new(authority, fee_collector, platform_fee_bps, max_royalty_bps)?;
        tracing::info!(
            authority = %config.authority,
            fee_bps = config.platform_fee_bps,
            max_royalty_bps = config.max_royalty_bps,
            "marketplace initialized"
        );
        Ok(Self {
            config,
            listings: ListingStore::new(),
            disputes: HashMap::new(),
            ledger: CashLedger::new(),
            custody: TicketCustody::new(),
            vaults: BidVaultBank::new(),
            audit: ConservationAudit::new(),
            receipts: Vec::new(),
            events: Vec::new(),
            clock,
        })
    }

    // =====================================================================
    // Configuration operations (authority only)
    // =====================================================================

    /// Update the platform fee rate.
    ///
    /// # Errors
    /// `Unauthorized` unless `caller` is the authority; `InvalidFee` above
    /// the 10000 bps cap.
    pub fn update_platform_fee(&mut self, caller: AccountId, new_bps: u16) -> Result<()> {
        self.config.ensure_authority(caller)?;
        if new_bps > constants::MAX_FEE_BPS {
            return Err(MarketError::InvalidFee { bps: new_bps });
        }
        self.config.platform_fee_bps = new_bps;
        tracing::info!(fee_bps = new_bps, "platform fee updated");
        Ok(())
    }

    /// Update the platform fee collector.
    ///
    /// # Errors
    /// `Unauthorized` unless `caller` is the authority.
    pub fn update_fee_collector(
        &mut self,
        caller: AccountId,
        new_collector: AccountId,
    ) -> Result<()> {
        self.config.ensure_authority(caller)?;
        self.config.fee_collector = new_collector;
        tracing::info!(collector = %new_collector, "fee collector updated");
        Ok(())
    }

    /// Pause the marketplace. All mutating operations fail until unpaused.
    ///
    /// # Errors
    /// `Unauthorized` unless `caller` is the authority.
    pub fn pause(&mut self, caller: AccountId) -> Result<()> {
        self.config.ensure_authority(caller)?;
        self.config.is_active = false;
        tracing::warn!("marketplace paused");
        Ok(())
    }

    /// Unpause the marketplace.
    ///
    /// # Errors
    /// `Unauthorized` unless `caller` is the authority.
    pub fn unpause(&mut self, caller: AccountId) -> Result<()> {
        self.config.ensure_authority(caller)?;
        self.config.is_active = true;
        tracing::info!("marketplace unpaused");
        Ok(())
    }

    // =====================================================================
    // Bootstrap / funding
    // =====================================================================

    /// Deposit external funds into an account's ledger balance.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if the balance would overflow.
    pub fn deposit(&mut self, account: AccountId, amount: u64) -> Result<()> {
        self.ledger.deposit(account, amount)?;
        self.audit.record_deposit(amount);
        Ok(())
    }

    /// Register initial ownership of an asset (the mint analog).
    pub fn register_asset(&mut self, asset_id: AssetId, owner: AccountId) {
        self.custody.register(asset_id, owner);
    }

    // =====================================================================
    // Read accessors
    // =====================================================================

    #[must_use]
    pub fn config(&self) -> &MarketplaceConfig {
        &self.config
    }

    #[must_use]
    pub fn listing(&self, id: &ListingId) -> Option<&Listing> {
        self.listings.get(id)
    }

    #[must_use]
    pub fn dispute(&self, id: &DisputeId) -> Option<&Dispute> {
        self.disputes.get(id)
    }

    /// The available ledger balance of an account.
    #[must_use]
    pub fn available(&self, account: AccountId) -> u64 {
        self.ledger.available(account)
    }

    /// The current owner of an asset (`None` while escrowed).
    #[must_use]
    pub fn asset_owner(&self, asset_id: AssetId) -> Option<AccountId> {
        self.custody.owner_of(asset_id)
    }

    /// The standing bid vault balance for a (listing, bidder) pair.
    #[must_use]
    pub fn vault_balance(&self, listing_id: ListingId, bidder: AccountId) -> u64 {
        self.vaults.balance(listing_id, bidder)
    }

    /// Settlement receipts, oldest first.
    #[must_use]
    pub fn receipts(&self) -> &[SaleReceipt] {
        &self.receipts
    }

    /// The engine's clock source.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Drain the pending event log.
    pub fn drain_events(&mut self) -> Vec<MarketEvent> {
        std::mem::take(&mut self.events)
    }

    // =====================================================================
    // Internal helpers shared by the operation modules
    // =====================================================================

    pub(crate) fn emit(&mut self, event: MarketEvent) {
        self.events.push(event);
    }

    /// Re-check the conservation invariant against the live ledger and
    /// vault totals.
    ///
    /// # Errors
    /// Returns `ConservationViolation` if value was minted or burned.
    pub(crate) fn verify_conservation(&self) -> Result<()> {
        let actual = self.ledger.total_supply() + self.vaults.total_outstanding();
        self.audit.verify(actual)
    }
}
