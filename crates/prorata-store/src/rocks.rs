//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the
//! [`PropertyStore`] trait.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use prorata_core::{Resource, ResourceId, SubscriptionId};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::PropertyStore;

/// RocksDB-backed property store.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Read a record without the not-found check.
    fn read_optional(&self, resource_id: &ResourceId) -> Result<Option<Resource>> {
        let cf = self.cf(cf::RESOURCES)?;
        let key = keys::resource_key(resource_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }
}

impl PropertyStore for RocksStore {
    fn read(&self, resource_id: &ResourceId) -> Result<Resource> {
        self.read_optional(resource_id)?.ok_or(StoreError::NotFound)
    }

    fn persist(&self, resource: &mut Resource) -> Result<ResourceId> {
        let cf_resources = self.cf(cf::RESOURCES)?;
        let cf_index = self.cf(cf::RESOURCES_BY_SUBSCRIPTION)?;

        let resource_id = match resource.id {
            Some(id) => id,
            None => {
                let id = ResourceId::generate();
                resource.id = Some(id);
                tracing::debug!(resource_id = %id, "assigned identifier on first persist");
                id
            }
        };
        if resource.date_created.is_none() {
            resource.date_created = Some(chrono::Utc::now());
        }

        // The previous record tells us whether a stale subscription index
        // entry must be dropped.
        let previous_subscription = self
            .read_optional(&resource_id)?
            .and_then(|previous| previous.subscription_id);

        let key = keys::resource_key(&resource_id);
        let value = Self::serialize(&*resource)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_resources, &key, &value);
        if let Some(previous) = previous_subscription {
            if resource.subscription_id != Some(previous) {
                batch.delete_cf(
                    &cf_index,
                    keys::subscription_resource_key(&previous, &resource_id),
                );
            }
        }
        if let Some(subscription_id) = resource.subscription_id {
            batch.put_cf(
                &cf_index,
                keys::subscription_resource_key(&subscription_id, &resource_id),
                [],
            );
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::trace!(resource_id = %resource_id, "persisted resource record");
        Ok(resource_id)
    }

    fn delete(&self, resource_id: &ResourceId) -> Result<()> {
        let existing = self.read_optional(resource_id)?.ok_or(StoreError::NotFound)?;

        let cf_resources = self.cf(cf::RESOURCES)?;
        let cf_index = self.cf(cf::RESOURCES_BY_SUBSCRIPTION)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_resources, keys::resource_key(resource_id));
        if let Some(subscription_id) = existing.subscription_id {
            batch.delete_cf(
                &cf_index,
                keys::subscription_resource_key(&subscription_id, resource_id),
            );
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(resource_id = %resource_id, "deleted resource record");
        Ok(())
    }

    fn list_by_subscription(&self, subscription_id: &SubscriptionId) -> Result<Vec<Resource>> {
        let cf_index = self.cf(cf::RESOURCES_BY_SUBSCRIPTION)?;
        let prefix = keys::subscription_prefix(subscription_id);

        let iter = self.db.iterator_cf(
            &cf_index,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        let mut resources = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            let resource_id = keys::extract_resource_id_from_subscription_key(&key);
            if let Some(resource) = self.read_optional(&resource_id)? {
                resources.push(resource);
            }
        }

        Ok(resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use prorata_core::FixedClock;
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn at(day: u32, hour: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn resource_crud() {
        let (store, _dir) = create_test_store();
        let subscription_id = SubscriptionId::generate();

        let mut resource = Resource::new();
        resource.subscription_id = Some(subscription_id);
        resource.external_id = Some("ext-7".to_owned());
        resource.is_prorated = true;

        // First persist assigns the identifier and stamps date_created.
        let id = store.persist(&mut resource).unwrap();
        assert_eq!(resource.id, Some(id));
        assert!(resource.date_created.is_some());

        // Read back the full field set.
        let hydrated = store.read(&id).unwrap();
        assert_eq!(hydrated, resource);

        // Update in place; the identifier is stable.
        resource.is_pre_paid = false;
        let same_id = store.persist(&mut resource).unwrap();
        assert_eq!(same_id, id);
        assert!(!store.read(&id).unwrap().is_pre_paid);

        // Delete.
        store.delete(&id).unwrap();
        assert!(matches!(store.read(&id), Err(StoreError::NotFound)));
        assert!(matches!(store.delete(&id), Err(StoreError::NotFound)));
    }

    #[test]
    fn reading_unknown_resource_is_not_found() {
        let (store, _dir) = create_test_store();
        let result = store.read(&ResourceId::generate());
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[test]
    fn ledger_survives_the_roundtrip() {
        let (store, _dir) = create_test_store();

        let mut resource = Resource::new();
        resource.ledger.set_activations(vec![at(3, 8), at(12, 9)]);
        resource.ledger.set_deactivations(vec![at(10, 8)]);

        let id = store.persist(&mut resource).unwrap();
        let hydrated = store.read(&id).unwrap();

        assert_eq!(hydrated.ledger.activations(), &[at(3, 8), at(12, 9)]);
        assert_eq!(hydrated.ledger.deactivations(), &[at(10, 8)]);
    }

    #[test]
    fn list_by_subscription_oldest_first() {
        let (store, _dir) = create_test_store();
        let subscription_id = SubscriptionId::generate();
        let other_subscription = SubscriptionId::generate();

        let mut first = Resource::new();
        first.subscription_id = Some(subscription_id);
        first.external_id = Some("first".to_owned());
        store.persist(&mut first).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(2)); // Ensure different ULIDs

        let mut second = Resource::new();
        second.subscription_id = Some(subscription_id);
        second.external_id = Some("second".to_owned());
        store.persist(&mut second).unwrap();

        let mut unrelated = Resource::new();
        unrelated.subscription_id = Some(other_subscription);
        store.persist(&mut unrelated).unwrap();

        let listed = store.list_by_subscription(&subscription_id).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].external_id.as_deref(), Some("first"));
        assert_eq!(listed[1].external_id.as_deref(), Some("second"));
    }

    #[test]
    fn reassigning_the_subscription_moves_the_index_entry() {
        let (store, _dir) = create_test_store();
        let old_subscription = SubscriptionId::generate();
        let new_subscription = SubscriptionId::generate();

        let mut resource = Resource::new();
        resource.subscription_id = Some(old_subscription);
        let id = store.persist(&mut resource).unwrap();

        resource.subscription_id = Some(new_subscription);
        store.persist(&mut resource).unwrap();

        assert!(store.list_by_subscription(&old_subscription).unwrap().is_empty());
        let listed = store.list_by_subscription(&new_subscription).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, Some(id));
    }

    #[test]
    fn compound_operations_persist_each_call() {
        let (store, _dir) = create_test_store();

        let mut resource = Resource::new();
        let id = store.persist(&mut resource).unwrap();

        store
            .activate(&mut resource, &FixedClock::new(at(3, 8)))
            .unwrap();
        let after_activation = store.read(&id).unwrap();
        assert_eq!(after_activation.ledger.activations(), &[at(3, 8)]);
        assert!(after_activation.ledger.deactivations().is_empty());

        store
            .deactivate(&mut resource, &FixedClock::new(at(10, 8)))
            .unwrap();
        let after_deactivation = store.read(&id).unwrap();
        assert_eq!(after_deactivation.ledger.activations(), &[at(3, 8)]);
        assert_eq!(after_deactivation.ledger.deactivations(), &[at(10, 8)]);
    }
}
