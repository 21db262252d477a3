//! Core types for prorata.
//!
//! This crate provides the domain model for activation-day accounting:
//!
//! - **Identifiers**: `ResourceId`, `SubscriptionId`
//! - **Resources**: `Resource`, the billable aggregate
//! - **Ledger**: `ActivityLedger`, the activation/deactivation history
//! - **Accounting**: `days_active`, the whole-day usage count
//! - **Capabilities**: `Clock`, `PropertyContainer`
//!
//! # Days-active unit
//!
//! A day is a UTC calendar day. Any partial day of activity counts as one
//! whole day, and several activation cycles touching the same calendar day
//! count that day exactly once. The count drives proration elsewhere; this
//! crate never prices it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod clock;
pub mod error;
pub mod ids;
pub mod instant;
pub mod ledger;
pub mod property;
pub mod resource;
pub mod usage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::ValidationError;
pub use ids::{IdError, ResourceId, SubscriptionId};
pub use instant::{parse_instant, SECONDS_PER_DAY};
pub use ledger::ActivityLedger;
pub use property::{AccessContext, PropertyContainer, PropertyValue};
pub use resource::{prop, Resource};
pub use usage::{days_active, days_active_until_now};
