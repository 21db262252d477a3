//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in
//! column families.

use prorata_core::{ResourceId, SubscriptionId};

/// Create a resource key from a resource ID.
#[must_use]
pub fn resource_key(resource_id: &ResourceId) -> Vec<u8> {
    resource_id.to_bytes().to_vec()
}

/// Create a subscription-resource index key.
///
/// Format: `subscription_id (16 bytes) || resource_id (16 bytes)`
///
/// Since ULIDs are time-ordered, resources under a subscription will be
/// sorted by creation time.
#[must_use]
pub fn subscription_resource_key(
    subscription_id: &SubscriptionId,
    resource_id: &ResourceId,
) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(subscription_id.as_bytes());
    key.extend_from_slice(&resource_id.to_bytes());
    key
}

/// Create a prefix for iterating all resources under a subscription.
#[must_use]
pub fn subscription_prefix(subscription_id: &SubscriptionId) -> Vec<u8> {
    subscription_id.as_bytes().to_vec()
}

/// Extract the resource ID from a subscription-resource index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_resource_id_from_subscription_key(key: &[u8]) -> ResourceId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..32]);
    ResourceId::from_bytes(bytes).expect("valid ULID bytes")
}
