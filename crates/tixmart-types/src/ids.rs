//! Globally unique identifiers used throughout Tixmart.
//!
//! All entity IDs use UUIDv7 for time-ordered lexicographic sorting,
//! except `ReceiptId` which is derived deterministically from the
//! settlement inputs.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ListingId
// ---------------------------------------------------------------------------

/// Globally unique listing identifier. Uses UUIDv7 for time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ListingId(pub Uuid);

impl ListingId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Extract the embedded timestamp (milliseconds since UNIX epoch) from UUIDv7.
    #[must_use]
    pub fn timestamp_ms(&self) -> u64 {
        let bytes = self.0.as_bytes();
        u64::from_be_bytes([
            0, 0, bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5],
        ])
    }
}

impl Default for ListingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Unique identifier for a principal: seller, bidder, buyer, authority,
/// fee collector, or royalty recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub Uuid);

impl AccountId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AssetId
// ---------------------------------------------------------------------------

/// Unique identifier for one unit of a uniquely-owned asset (a ticket).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AssetId(pub Uuid);

impl AssetId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "asset:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// EscrowId
// ---------------------------------------------------------------------------

/// Unique identifier for a custody escrow handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EscrowId(pub Uuid);

impl EscrowId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for EscrowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EscrowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "esc:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// DisputeId
// ---------------------------------------------------------------------------

/// Unique identifier for a dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct DisputeId(pub Uuid);

impl DisputeId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for DisputeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DisputeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dsp:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ReceiptId
// ---------------------------------------------------------------------------

/// Globally unique settlement receipt identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ReceiptId(pub Uuid);

impl ReceiptId {
    /// Deterministic `ReceiptId` from the settlement inputs.
    ///
    /// The same (listing, buyer, price) triple always produces the same
    /// receipt id, so a replayed settlement attempt cannot mint a second
    /// distinct receipt for the same sale.
    #[must_use]
    pub fn deterministic(listing_id: ListingId, buyer: AccountId, price: u64) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"tixmart:receipt:v1:");
        hasher.update(listing_id.0.as_bytes());
        hasher.update(buyer.0.as_bytes());
        hasher.update(price.to_le_bytes());
        let hash = hasher.finalize();
        let bytes: [u8; 16] = hash[..16].try_into().expect("SHA-256 produces 32 bytes");
        Self(Uuid::from_bytes(bytes))
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rcpt:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_id_uniqueness() {
        let a = ListingId::new();
        let b = ListingId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn listing_id_ordering() {
        let a = ListingId::new();
        let b = ListingId::new();
        assert!(a < b);
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn listing_id_timestamp_extraction() {
        let before = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let id = ListingId::new();
        let after = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let ts = id.timestamp_ms();
        assert!(
            ts >= before && ts <= after,
            "ts={ts}, before={before}, after={after}"
        );
    }

    #[test]
    fn account_id_uniqueness() {
        let a = AccountId::new();
        let b = AccountId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn receipt_id_deterministic() {
        let listing = ListingId::new();
        let buyer = AccountId::new();
        let a = ReceiptId::deterministic(listing, buyer, 1_000_000);
        let b = ReceiptId::deterministic(listing, buyer, 1_000_000);
        assert_eq!(a, b);
        let c = ReceiptId::deterministic(listing, buyer, 1_000_001);
        assert_ne!(a, c);
        let d = ReceiptId::deterministic(listing, AccountId::new(), 1_000_000);
        assert_ne!(a, d);
    }

    #[test]
    fn display_prefixes() {
        assert!(format!("{}", EscrowId::new()).starts_with("esc:"));
        assert!(format!("{}", DisputeId::new()).starts_with("dsp:"));
        assert!(format!("{}", AssetId::new()).starts_with("asset:"));
    }

    #[test]
    fn serde_roundtrips() {
        let lid = ListingId::new();
        let json = serde_json::to_string(&lid).unwrap();
        let back: ListingId = serde_json::from_str(&json).unwrap();
        assert_eq!(lid, back);

        let aid = AccountId::new();
        let json = serde_json::to_string(&aid).unwrap();
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(aid, back);
    }
}
