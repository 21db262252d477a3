//! The usage accountant: whole active days within a query window.
//!
//! [`days_active`] reconciles a possibly-irregular activation history
//! against an arbitrary `[from, to]` window. Each UTC calendar day the
//! resource was active counts exactly once no matter how many activation
//! cycles touch it, and a resource still active at the window end is
//! active through that boundary.

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::instant::whole_days_ceil;
use crate::resource::Resource;

/// Count the whole days the resource was active within `[from, to]`.
///
/// A resource that was never activated counts zero days for any window,
/// and an inverted window (`from > to`) is treated as empty. Irregular
/// histories (unpaired or out-of-order events) degrade to whatever the
/// window filtering produces rather than failing; the result is always
/// non-negative. Two calls with identical arguments on an unmutated
/// resource return identical results.
#[must_use]
pub fn days_active(resource: &Resource, from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    if !resource.has_been_activated() || from > to {
        return 0;
    }

    let in_window = |at: &DateTime<Utc>| *at >= from && *at <= to;

    // Window filtering keeps each instant's index in the unfiltered
    // history; closing instants are matched by that index below.
    let mut activations: Vec<(usize, DateTime<Utc>)> = resource
        .ledger
        .activations()
        .iter()
        .enumerate()
        .filter(|(_, at)| in_window(*at))
        .map(|(index, at)| (index, *at))
        .collect();
    let deactivations: Vec<(usize, DateTime<Utc>)> = resource
        .ledger
        .deactivations()
        .iter()
        .enumerate()
        .filter(|(_, at)| in_window(*at))
        .map(|(index, at)| (index, *at))
        .collect();

    // Already active when the window opened: no activation inside the
    // window, or the first in-window deactivation precedes the first
    // in-window activation. Seed a boundary activation at
    // max(date_created, from) - a resource cannot have been active before
    // it existed. The prepend re-numbers activation indices densely from
    // zero; the deactivations keep their original indices.
    let starts_active = match (activations.first(), deactivations.first()) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some((_, first_activation)), Some((_, first_deactivation))) => {
            first_deactivation < first_activation
        }
    };
    if starts_active {
        let opened = resource
            .date_created
            .map_or(from, |created| created.max(from));
        activations = std::iter::once(opened)
            .chain(activations.into_iter().map(|(_, at)| at))
            .enumerate()
            .collect();
    }

    // Pair each activation with the deactivation holding the same index;
    // no such deactivation means the interval runs to the window end.
    let closing_for = |index: usize| {
        deactivations
            .iter()
            .find(|(deactivation_index, _)| *deactivation_index == index)
            .map_or(to, |(_, at)| *at)
    };
    let intervals: Vec<(DateTime<Utc>, DateTime<Utc>)> = activations
        .iter()
        .map(|(index, opened_at)| (*opened_at, closing_for(*index)))
        .collect();

    let mut total = 0;
    for (position, (opened_at, closed_at)) in intervals.iter().enumerate() {
        if position > 0 {
            let (_, previous_close) = intervals[position - 1];
            // This calendar day already closed the previous interval.
            if previous_close.date_naive() == closed_at.date_naive() {
                continue;
            }
        }

        total += whole_days_ceil((*closed_at - *opened_at).num_seconds());

        if position > 0 {
            let (previous_open, _) = intervals[position - 1];
            // The opening day was already counted by the previous interval.
            if previous_open.date_naive() == opened_at.date_naive() {
                total -= 1;
            }
        }
    }

    total.max(0)
}

/// [`days_active`] with the window end defaulted to the clock's now.
#[must_use]
pub fn days_active_until_now(
    resource: &Resource,
    from: DateTime<Utc>,
    clock: &dyn Clock,
) -> i64 {
    days_active(resource, from, clock.now())
}
