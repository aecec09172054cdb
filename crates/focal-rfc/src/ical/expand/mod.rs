//! Timezone conversion and RRULE expansion.

pub mod recurrence;
pub mod timezone;

pub use recurrence::{Expansion, ExpansionIter, RecurrenceExpander, parse_rule};
pub use timezone::{
    ConversionError, TimeZoneResolver, convert_to_utc_lenient, localize_naive, to_display_zone,
};
