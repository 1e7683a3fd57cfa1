//! Error types for the Tixmart settlement engine.
//!
//! All errors use the `TM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Listing errors
//! - 2xx: Bidding errors
//! - 3xx: Funds errors
//! - 4xx: Custody / escrow errors
//! - 5xx: Configuration errors
//! - 6xx: Dispute errors
//! - 7xx: Authorization errors
//! - 8xx: Audit errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{AssetId, DisputeId, EscrowId, ListingId};

/// Central error enum for all Tixmart operations.
///
/// Every failure leaves all entities in their pre-call state; no error is
/// raised after a partial mutation became visible.
#[derive(Debug, Error)]
pub enum MarketError {
    // =================================================================
    // Listing Errors (1xx)
    // =================================================================
    /// The requested listing does not exist.
    #[error("TM_ERR_100: Listing not found: {0}")]
    ListingNotFound(ListingId),

    /// The listing has left the `Active` state (sold, cancelled, disputed,
    /// or its auction window has closed).
    #[error("TM_ERR_101: Listing is no longer active")]
    ListingNotActive,

    /// An auction-only operation was attempted on a fixed-price listing.
    #[error("TM_ERR_102: Listing is not an auction")]
    NotAuction,

    /// A fixed-price-only operation was attempted on an auction listing.
    #[error("TM_ERR_103: Listing is not a fixed-price sale")]
    NotBuyNow,

    /// The listing parameters are structurally invalid.
    #[error("TM_ERR_104: Invalid listing configuration: {reason}")]
    InvalidListingConfig { reason: String },

    /// A price or minimum bid of zero was supplied.
    #[error("TM_ERR_105: Price must be greater than zero")]
    InvalidPrice,

    // =================================================================
    // Bidding Errors (2xx)
    // =================================================================
    /// The bid does not strictly exceed the standing floor.
    #[error("TM_ERR_200: Bid too low: offered {offered}, must exceed {floor}")]
    BidTooLow { offered: u64, floor: u64 },

    /// Settlement of an auction with no accepted bids.
    #[error("TM_ERR_201: Auction has no bids")]
    NoBids,

    /// The auction's end time has not been reached yet.
    #[error("TM_ERR_202: Auction has not ended")]
    AuctionNotEnded,

    /// A seller attempted to bid on or buy their own listing.
    #[error("TM_ERR_203: Self-dealing blocked: cannot bid on or buy own listing")]
    SelfBidBlocked,

    // =================================================================
    // Funds Errors (3xx)
    // =================================================================
    /// Not enough available balance to fund the operation.
    #[error("TM_ERR_300: Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    /// Integer fee/proceeds arithmetic would overflow or underflow.
    #[error("TM_ERR_301: Arithmetic overflow in fee or proceeds math")]
    ArithmeticOverflow,

    // =================================================================
    // Custody / Escrow Errors (4xx)
    // =================================================================
    /// The escrow handle does not exist.
    #[error("TM_ERR_400: Escrow not found: {0}")]
    EscrowNotFound(EscrowId),

    /// The escrow handle is not in the HELD state.
    #[error("TM_ERR_401: Escrow {id} is {state}, not HELD")]
    EscrowNotHeld { id: EscrowId, state: String },

    /// The account does not currently own the asset.
    #[error("TM_ERR_402: Account does not own asset {0}")]
    AssetNotOwned(AssetId),

    /// A supplied reference does not match the expected derived
    /// relationship. Treated as a potential attack and rejected.
    #[error("TM_ERR_403: Account binding mismatch: {reason}")]
    InvalidAccountBinding { reason: String },

    // =================================================================
    // Configuration Errors (5xx)
    // =================================================================
    /// A fee or royalty cap above 10000 bps (100%) was supplied.
    #[error("TM_ERR_500: Invalid fee: {bps} bps exceeds the 10000 bps cap")]
    InvalidFee { bps: u16 },

    /// The marketplace pause flag is set.
    #[error("TM_ERR_501: Marketplace is paused")]
    MarketplacePaused,

    /// The listing's aggregate royalty rate exceeds the configured maximum.
    #[error("TM_ERR_502: Royalty schedule at {total_bps} bps exceeds the {max_bps} bps limit")]
    RoyaltyExceedsLimit { total_bps: u16, max_bps: u16 },

    // =================================================================
    // Dispute Errors (6xx)
    // =================================================================
    /// The requested dispute does not exist.
    #[error("TM_ERR_600: Dispute not found: {0}")]
    DisputeNotFound(DisputeId),

    /// The dispute has already been resolved.
    #[error("TM_ERR_601: Dispute is not open")]
    DisputeNotOpen,

    /// The dispute reason exceeds the allowed length.
    #[error("TM_ERR_602: Dispute reason exceeds {max} bytes")]
    DisputeReasonTooLong { max: usize },

    // =================================================================
    // Authorization Errors (7xx)
    // =================================================================
    /// The caller lacks the required role for this operation.
    #[error("TM_ERR_700: Unauthorized: {reason}")]
    Unauthorized { reason: String },

    // =================================================================
    // Audit Errors (8xx)
    // =================================================================
    /// Fund conservation invariant violated — critical safety alert.
    #[error("TM_ERR_800: Conservation invariant violation: {reason}")]
    ConservationViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// A concurrent writer committed first; re-read and retry.
    #[error("TM_ERR_900: Concurrent update detected for listing {0}")]
    VersionConflict(ListingId),

    /// Unrecoverable internal error.
    #[error("TM_ERR_901: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, MarketError>;
