//! iCalendar time handling for the week view: zoned event times, interval
//! overlap and recurrence expansion.

pub mod error;
pub mod ical;
