//! Versioned listing store with optimistic concurrency.
//!
//! The underlying chain runtime serialized every operation touching one
//! account; this store reimplements that guarantee explicitly. Each
//! listing carries a monotonically increasing version. Operations read a
//! `(snapshot, version)` pair, validate and compute against the snapshot,
//! then commit with compare-and-swap on the version. A losing writer gets
//! [`MarketError::VersionConflict`], re-reads, and re-validates — it
//! never silently overwrites the winner's update.

use std::collections::HashMap;

use tixmart_types::{Listing, ListingId, MarketError, Result};

#[derive(Debug, Clone)]
struct VersionedListing {
    version: u64,
    listing: Listing,
}

/// In-memory listing store. One writer wins per version; everyone else
/// observes the post-state.
#[derive(Debug, Default)]
pub struct ListingStore {
    records: HashMap<ListingId, VersionedListing>,
}

impl ListingStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly created listing at version 1.
    ///
    /// # Errors
    /// Returns `Internal` if the id is already present.
    pub fn insert(&mut self, listing: Listing) -> Result<()> {
        let id = listing.id;
        if self.records.contains_key(&id) {
            return Err(MarketError::Internal(format!(
                "listing {id} already exists"
            )));
        }
        self.records.insert(
            id,
            VersionedListing {
                version: 1,
                listing,
            },
        );
        Ok(())
    }

    /// Read a listing snapshot and its current version.
    ///
    /// # Errors
    /// Returns `ListingNotFound` if the id is unknown.
    pub fn snapshot(&self, id: ListingId) -> Result<(Listing, u64)> {
        self.records
            .get(&id)
            .map(|record| (record.listing.clone(), record.version))
            .ok_or(MarketError::ListingNotFound(id))
    }

    /// Commit a mutated snapshot, compare-and-swapping on the version.
    ///
    /// # Errors
    /// - `ListingNotFound` if the id is unknown
    /// - `VersionConflict` if another writer committed since the snapshot
    pub fn commit(&mut self, expected_version: u64, listing: Listing) -> Result<()> {
        let id = listing.id;
        let record = self
            .records
            .get_mut(&id)
            .ok_or(MarketError::ListingNotFound(id))?;
        if record.version != expected_version {
            return Err(MarketError::VersionConflict(id));
        }
        record.version += 1;
        record.listing = listing;
        Ok(())
    }

    /// Borrow a listing without version bookkeeping (read paths).
    #[must_use]
    pub fn get(&self, id: &ListingId) -> Option<&Listing> {
        self.records.get(id).map(|record| &record.listing)
    }

    /// Number of listings tracked (terminal records included; listings
    /// are retained for audit, never deleted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of listings currently in the `Active` state.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.records
            .values()
            .filter(|record| record.listing.is_active())
            .count()
    }
}
