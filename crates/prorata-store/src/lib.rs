//! Durable property store for prorata resources.
//!
//! The core treats persistence as an external collaborator: a property
//! store hydrates a resource's full field set and writes mutations back.
//! This crate defines that collaborator as the [`PropertyStore`] trait and
//! implements it over `RocksDB` with column families:
//!
//! - `resources`: primary records, keyed by resource ULID, CBOR-encoded
//! - `resources_by_subscription`: index keyed by
//!   `subscription_id || resource_id` (empty values)
//!
//! # Concurrency
//!
//! Persisting is read-modify-write over the whole record, so concurrent
//! mutations of the same resource are last-writer-wins. Callers that allow
//! concurrent `activate`/`deactivate` on one resource must serialize them
//! externally, e.g. with a lock keyed by resource identifier. One store
//! handle can serve many threads operating on distinct resources.
//!
//! # Example
//!
//! ```no_run
//! use prorata_core::{Resource, SystemClock};
//! use prorata_store::{PropertyStore, RocksStore};
//!
//! let store = RocksStore::open("/tmp/prorata-db").unwrap();
//! let clock = SystemClock;
//!
//! let mut resource = Resource::new();
//! let id = store.persist(&mut resource).unwrap();
//! store.activate(&mut resource, &clock).unwrap();
//!
//! let hydrated = store.read(&id).unwrap();
//! assert!(hydrated.has_been_activated());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use prorata_core::{Clock, Resource, ResourceId, SubscriptionId};

/// The storage trait defining all persistence operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (e.g., `RocksDB`, in-memory for testing).
pub trait PropertyStore: Send + Sync {
    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Hydrate a resource's full field set by identifier.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no record exists for
    /// `resource_id`, or an error if the database operation fails.
    fn read(&self, resource_id: &ResourceId) -> Result<Resource>;

    /// Write the full current field set (including both timestamp
    /// sequences) back to durable storage.
    ///
    /// On first persist a fresh identifier is assigned and `date_created`
    /// is stamped; the (possibly new) identifier is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn persist(&self, resource: &mut Resource) -> Result<ResourceId>;

    /// Delete a resource record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the resource doesn't exist.
    fn delete(&self, resource_id: &ResourceId) -> Result<()>;

    /// List resources owned by a subscription, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_by_subscription(&self, subscription_id: &SubscriptionId) -> Result<Vec<Resource>>;

    // =========================================================================
    // Compound Operations
    // =========================================================================

    /// Append an activation at the clock's current instant and persist
    /// immediately.
    ///
    /// Mutations are not batched: each call writes the new history back.
    ///
    /// # Errors
    ///
    /// Returns an error if the persist fails; the in-memory append has
    /// already happened.
    fn activate(&self, resource: &mut Resource, clock: &dyn Clock) -> Result<ResourceId> {
        resource.activate(clock);
        self.persist(resource)
    }

    /// Append a deactivation at the clock's current instant and persist
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the persist fails; the in-memory append has
    /// already happened.
    fn deactivate(&self, resource: &mut Resource, clock: &dyn Clock) -> Result<ResourceId> {
        resource.deactivate(clock);
        self.persist(resource)
    }
}
