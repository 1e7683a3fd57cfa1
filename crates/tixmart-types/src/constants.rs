//! System-wide constants for the Tixmart settlement engine.

/// Basis point denominator: 10000 bps = 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Maximum fee or royalty rate, in basis points (100%).
pub const MAX_FEE_BPS: u16 = 10_000;

/// Maximum number of royalty recipients per listing.
pub const MAX_ROYALTY_RECIPIENTS: usize = 8;

/// Maximum dispute reason length in bytes.
pub const MAX_DISPUTE_REASON_LEN: usize = 200;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Tixmart";
