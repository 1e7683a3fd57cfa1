//! # tixmart-engine
//!
//! **Settlement plane**: the marketplace state machine behind listings,
//! auctions, atomic proceeds settlement, and disputes.
//!
//! ## Architecture
//!
//! The engine is invoked as a sequence of discrete caller-triggered
//! operations against its stores:
//! 1. Configuration gates every operation (pause flag, fee caps)
//! 2. Listing lifecycle owns `Active → {Sold, Cancelled, Disputed}`
//! 3. Bidding mutates the highest-bid fields with push refunds
//! 4. Settlement consumes a listing and produces `Sold` plus an
//!    all-or-nothing fund split and an audit receipt
//! 5. Dispute resolution reassigns the outcome exactly once
//!
//! ## Guarantees
//!
//! - **Single-writer per listing**: versioned compare-and-swap commits
//!   ([`store::ListingStore`]); a losing writer re-reads and surfaces a
//!   precondition error, never a silent overwrite
//! - **Fund conservation**: `seller + fee + Σ royalties == price` exactly
//!   for every settlement, re-verified against ledger + vault totals
//!   after every fund movement ([`audit::ConservationAudit`])
//! - **Exactly-once**: settlement per listing, release per escrow handle,
//!   resolution per dispute

pub mod audit;
pub mod bidding;
pub mod dispute_ops;
pub mod engine;
pub mod listing_ops;
pub mod settlement;
pub mod store;

pub use audit::ConservationAudit;
pub use engine::MarketEngine;
pub use store::ListingStore;
