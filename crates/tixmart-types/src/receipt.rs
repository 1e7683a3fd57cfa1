//! Settlement receipts for the Tixmart audit trail.
//!
//! Every successful settlement appends a [`SaleReceipt`]. Receipts are
//! append-only and carry the full proceeds breakdown, so the fund
//! conservation invariant can be re-verified from the audit trail alone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, ListingId, MarketError, ProceedsSplit, ReceiptId, Result};

/// Proof that one settlement occurred, with the full proceeds breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleReceipt {
    /// Deterministic id: same (listing, buyer, price) → same receipt id.
    pub id: ReceiptId,
    pub listing_id: ListingId,
    pub buyer: AccountId,
    pub seller: AccountId,
    pub price: u64,
    pub platform_fee: u64,
    pub royalty_total: u64,
    pub seller_amount: u64,
    pub executed_at: DateTime<Utc>,
}

impl SaleReceipt {
    /// Build a receipt from a computed proceeds split.
    #[must_use]
    pub fn from_split(
        listing_id: ListingId,
        buyer: AccountId,
        seller: AccountId,
        split: &ProceedsSplit,
        executed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReceiptId::deterministic(listing_id, buyer, split.price),
            listing_id,
            buyer,
            seller,
            price: split.price,
            platform_fee: split.platform_fee,
            royalty_total: split.royalty_total(),
            seller_amount: split.seller_amount,
            executed_at,
        }
    }

    /// Re-verify conservation from the receipt's own fields.
    ///
    /// # Errors
    /// Returns `ConservationViolation` if the recorded outputs do not sum
    /// to the recorded price.
    pub fn verify_conservation(&self) -> Result<()> {
        let distributed = u128::from(self.platform_fee)
            + u128::from(self.royalty_total)
            + u128::from(self.seller_amount);
        if distributed != u128::from(self.price) {
            return Err(MarketError::ConservationViolation {
                reason: format!(
                    "receipt {} distributes {distributed}, expected {}",
                    self.id, self.price
                ),
            });
        }
        Ok(())
    }

    /// Hex-encoded SHA-256 digest over the canonical receipt payload.
    /// Stable across serialization formats; suitable for external audit
    /// references.
    #[must_use]
    pub fn digest(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"tixmart:receipt-digest:v1:");
        hasher.update(self.id.0.as_bytes());
        hasher.update(self.listing_id.0.as_bytes());
        hasher.update(self.buyer.0.as_bytes());
        hasher.update(self.seller.0.as_bytes());
        hasher.update(self.price.to_le_bytes());
        hasher.update(self.platform_fee.to_le_bytes());
        hasher.update(self.royalty_total.to_le_bytes());
        hasher.update(self.seller_amount.to_le_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoyaltySchedule;

    fn make_receipt() -> SaleReceipt {
        let split = ProceedsSplit::compute(
            10_000_000,
            250,
            &RoyaltySchedule::single(AccountId::new(), 500),
            1000,
        )
        .unwrap();
        SaleReceipt::from_split(
            ListingId::new(),
            AccountId::new(),
            AccountId::new(),
            &split,
            Utc::now(),
        )
    }

    #[test]
    fn receipt_carries_split_breakdown() {
        let receipt = make_receipt();
        assert_eq!(receipt.price, 10_000_000);
        assert_eq!(receipt.platform_fee, 250_000);
        assert_eq!(receipt.royalty_total, 500_000);
        assert_eq!(receipt.seller_amount, 9_250_000);
        receipt.verify_conservation().unwrap();
    }

    #[test]
    fn tampered_receipt_fails_conservation() {
        let mut receipt = make_receipt();
        receipt.platform_fee += 1;
        let err = receipt.verify_conservation().unwrap_err();
        assert!(matches!(err, MarketError::ConservationViolation { .. }));
    }

    #[test]
    fn digest_is_deterministic() {
        let receipt = make_receipt();
        assert_eq!(receipt.digest(), receipt.digest());
        assert_eq!(receipt.digest().len(), 64);
    }

    #[test]
    fn digest_differs_by_contents() {
        let a = make_receipt();
        let mut b = a.clone();
        b.price += 1;
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn serde_roundtrip() {
        let receipt = make_receipt();
        let json = serde_json::to_string(&receipt).unwrap();
        let back: SaleReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(receipt, back);
    }
}
