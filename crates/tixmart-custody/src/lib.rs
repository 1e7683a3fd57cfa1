//! # tixmart-custody
//!
//! **Custody plane**: cash ledger, ticket escrow, bid vaults, and the
//! clock source.
//!
//! ## Architecture
//!
//! The custody plane sits between the settlement engine and the durable
//! value/asset stores. It implements the adapter contracts the engine
//! consumes:
//! 1. **`CashLedger`**: per-account balances with all-or-nothing
//!    multi-leg transfer batches (the value transfer adapter)
//! 2. **`TicketCustody`**: unique-asset ownership plus escrow handles
//!    with exactly-once release (the asset custody adapter)
//! 3. **`BidVaultBank`**: holding areas for standing auction bids
//! 4. **`Clock`**: wall-clock source for auction end-time comparisons
//!
//! Every mutation is atomic: either the full operation succeeds or the
//! underlying balances and handles are unchanged.

pub mod bid_vault;
pub mod clock;
pub mod ledger;
pub mod tickets;

pub use bid_vault::BidVaultBank;
pub use clock::{Clock, ManualClock, SystemClock};
pub use ledger::{CashLedger, TransferLeg};
pub use tickets::{EscrowHandle, EscrowState, TicketCustody};
