//! Activation history for one resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The ordered record of activation and deactivation instants for one
/// billable resource.
///
/// Both sequences are append-only during normal operation and replaceable
/// wholesale when hydrating from storage. Insertion order is chronological
/// under normal use but is not validated, and no alternation invariant is
/// enforced; the accounting layer tolerates irregular histories (two
/// deactivations in a row, more deactivations than activations).
///
/// A ledger is owned by exactly one resource and is not designed for
/// concurrent mutation; callers that allow concurrent toggling of the same
/// resource must serialize externally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLedger {
    activations: Vec<DateTime<Utc>>,
    deactivations: Vec<DateTime<Utc>>,
}

impl ActivityLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an activation instant.
    pub fn record_activation(&mut self, at: DateTime<Utc>) {
        self.activations.push(at);
    }

    /// Append a deactivation instant.
    pub fn record_deactivation(&mut self, at: DateTime<Utc>) {
        self.deactivations.push(at);
    }

    /// Whether the resource has ever been activated.
    #[must_use]
    pub fn has_been_activated(&self) -> bool {
        !self.activations.is_empty()
    }

    /// The full activation history, in insertion order.
    #[must_use]
    pub fn activations(&self) -> &[DateTime<Utc>] {
        &self.activations
    }

    /// The full deactivation history, in insertion order.
    #[must_use]
    pub fn deactivations(&self) -> &[DateTime<Utc>] {
        &self.deactivations
    }

    /// Replace the activation history wholesale (hydration path).
    ///
    /// No ordering validation is performed; callers are trusted.
    pub fn set_activations(&mut self, activations: Vec<DateTime<Utc>>) {
        self.activations = activations;
    }

    /// Replace the deactivation history wholesale (hydration path).
    ///
    /// No ordering validation is performed; callers are trusted.
    pub fn set_deactivations(&mut self, deactivations: Vec<DateTime<Utc>>) {
        self.deactivations = deactivations;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn new_ledger_was_never_activated() {
        let ledger = ActivityLedger::new();
        assert!(!ledger.has_been_activated());
        assert!(ledger.activations().is_empty());
        assert!(ledger.deactivations().is_empty());
    }

    #[test]
    fn appends_preserve_insertion_order() {
        let mut ledger = ActivityLedger::new();
        ledger.record_activation(at(3, 8));
        ledger.record_activation(at(1, 8)); // out of order on purpose
        ledger.record_deactivation(at(2, 8));

        assert!(ledger.has_been_activated());
        assert_eq!(ledger.activations(), &[at(3, 8), at(1, 8)]);
        assert_eq!(ledger.deactivations(), &[at(2, 8)]);
    }

    #[test]
    fn deactivation_alone_does_not_count_as_activated() {
        let mut ledger = ActivityLedger::new();
        ledger.record_deactivation(at(2, 8));
        assert!(!ledger.has_been_activated());
    }

    #[test]
    fn setters_replace_wholesale() {
        let mut ledger = ActivityLedger::new();
        ledger.record_activation(at(1, 0));

        ledger.set_activations(vec![at(5, 0), at(7, 0)]);
        ledger.set_deactivations(vec![at(6, 0)]);

        assert_eq!(ledger.activations(), &[at(5, 0), at(7, 0)]);
        assert_eq!(ledger.deactivations(), &[at(6, 0)]);
    }
}
