//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary resource records, keyed by `resource_id` (ULID).
    pub const RESOURCES: &str = "resources";

    /// Index: resources by subscription, keyed by
    /// `subscription_id || resource_id`. Value is empty (index only).
    pub const RESOURCES_BY_SUBSCRIPTION: &str = "resources_by_subscription";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::RESOURCES, cf::RESOURCES_BY_SUBSCRIPTION]
}
