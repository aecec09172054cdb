//! Collaborator interfaces for calendar data sources.
//!
//! The week view never owns calendar data. It holds cheap handles that
//! implement these traits and compares them with `PartialEq` for identity.

pub mod memory;

use chrono::TimeDelta;
use focal_core::types::Rgba;
use focal_rfc::ical::core::EventTime;

/// Read access to the properties of one calendar component.
pub trait Component {
    /// DTSTART. Events without a start contribute nothing to the view.
    fn dtstart(&self) -> Option<&EventTime>;

    fn dtend(&self) -> Option<&EventTime>;

    /// Explicit DURATION, which takes precedence over DTEND.
    fn duration(&self) -> Option<TimeDelta>;

    /// RRULE value, with or without the property name prefix.
    fn rrule(&self) -> Option<&str>;

    fn summary(&self) -> &str;

    /// The component's own timezone, used for floating start and end values.
    fn tzid(&self) -> Option<&str>;
}

/// A handle to a source calendar.
///
/// Handles are cloned freely into occurrence records; equality of two
/// handles means they refer to the same calendar.
pub trait Calendar: Clone + PartialEq {
    type Event: Component + Clone + PartialEq;

    fn color(&self) -> Rgba;

    /// Calls `visitor` once for every event of the calendar.
    fn for_each_event(&self, visitor: &mut dyn FnMut(&Self::Event));
}
