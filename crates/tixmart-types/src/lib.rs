//! # tixmart-types
//!
//! Shared types, errors, and configuration for the **Tixmart** marketplace
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`ListingId`], [`AccountId`], [`AssetId`], [`EscrowId`], [`DisputeId`], [`ReceiptId`]
//! - **Listing model**: [`Listing`], [`ListingTerms`], [`Pricing`], [`ListingStatus`]
//! - **Royalty model**: [`RoyaltySchedule`], [`RoyaltyShare`]
//! - **Proceeds math**: [`ProceedsSplit`], [`RoyaltyPayout`]
//! - **Dispute model**: [`Dispute`], [`DisputeStatus`], [`DisputeResolution`]
//! - **Audit trail**: [`SaleReceipt`], [`MarketEvent`]
//! - **Configuration**: [`MarketplaceConfig`]
//! - **Errors**: [`MarketError`] with `TM_ERR_` prefix codes
//! - **Constants**: basis-point denominator and system-wide limits

pub mod config;
pub mod constants;
pub mod dispute;
pub mod error;
pub mod event;
pub mod ids;
pub mod listing;
pub mod receipt;
pub mod royalty;
pub mod split;

// Re-export all primary types at crate root for ergonomic imports:
//   use tixmart_types::{Listing, MarketError, ProceedsSplit, ...};

pub use config::*;
pub use dispute::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use listing::*;
pub use receipt::*;
pub use royalty::*;
pub use split::*;

// Constants are accessed via `tixmart_types::constants::FOO`
// (not re-exported to avoid name collisions).
