//! Validation errors for prorata-core.

use crate::ids::IdError;

/// Errors raised when a property setter or instant parser receives a value
/// of the wrong shape.
///
/// Validation failures propagate immediately and leave the target field
/// unchanged. The usage accountant itself has no error conditions: it
/// degrades to a zero-day result instead, since proration should never
/// hard-fail a billing calculation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The property key is not part of the container.
    #[error("unknown property: {name}")]
    UnknownProperty {
        /// The key that was not recognized.
        name: String,
    },

    /// The value does not have the shape the property requires.
    #[error("wrong shape for property {property}: expected {expected}")]
    WrongShape {
        /// The property being set.
        property: String,
        /// A short description of the expected shape.
        expected: &'static str,
    },

    /// The value could not be read as an instant.
    #[error("malformed instant: {value}")]
    MalformedInstant {
        /// The rejected input.
        value: String,
    },

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),
}
