//! The billable resource aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::ids::{ResourceId, SubscriptionId};
use crate::ledger::ActivityLedger;

/// Property keys understood by [`Resource`]'s property container.
pub mod prop {
    /// Store-assigned resource identifier.
    pub const ID: &str = "id";

    /// Identifier of the linked object in the external system.
    pub const EXTERNAL_ID: &str = "external_id";

    /// Owning subscription identifier.
    pub const SUBSCRIPTION_ID: &str = "subscription_id";

    /// Instant the record was first persisted.
    pub const DATE_CREATED: &str = "date_created";

    /// Whether the subscriber pays before each billing period.
    pub const IS_PRE_PAID: &str = "is_pre_paid";

    /// Whether cost is apportioned to the fraction of a period used.
    pub const IS_PRORATED: &str = "is_prorated";

    /// Full activation history.
    pub const ACTIVATION_TIMESTAMPS: &str = "activation_timestamps";

    /// Full deactivation history.
    pub const DEACTIVATION_TIMESTAMPS: &str = "deactivation_timestamps";
}

/// A billable capability or entitlement linked to a subscription, with its
/// own activation history.
///
/// A resource is constructed either empty ([`Resource::new`]) or hydrated
/// from persisted state through the property store. Mutations are
/// in-memory; the store's compound operations persist them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Store-assigned identifier; `None` until first persisted.
    pub id: Option<ResourceId>,

    /// Identifier of a linked object in another system; `None` means unset.
    pub external_id: Option<String>,

    /// Owning subscription; `None` means unset.
    pub subscription_id: Option<SubscriptionId>,

    /// Stamped by the store on first persist; `None` only for a
    /// not-yet-persisted instance.
    pub date_created: Option<DateTime<Utc>>,

    /// Whether the subscriber pays before consuming each billing period's
    /// benefit.
    pub is_pre_paid: bool,

    /// Whether cost is apportioned to the fraction of a period actually
    /// used.
    pub is_prorated: bool,

    /// The activation/deactivation history.
    pub ledger: ActivityLedger,
}

impl Resource {
    /// Create a new, not-yet-persisted resource.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: None,
            external_id: None,
            subscription_id: None,
            date_created: None,
            is_pre_paid: true,
            is_prorated: false,
            ledger: ActivityLedger::new(),
        }
    }

    /// Record an activation at the clock's current instant.
    ///
    /// The append is in-memory; persisting the new history is the property
    /// store's compound operation.
    pub fn activate(&mut self, clock: &dyn Clock) {
        self.ledger.record_activation(clock.now());
    }

    /// Record a deactivation at the clock's current instant.
    pub fn deactivate(&mut self, clock: &dyn Clock) {
        self.ledger.record_deactivation(clock.now());
    }

    /// Whether the resource has ever been activated.
    #[must_use]
    pub fn has_been_activated(&self) -> bool {
        self.ledger.has_been_activated()
    }
}

impl Default for Resource {
    fn default() -> Self {
        Self::new()
    }
}
