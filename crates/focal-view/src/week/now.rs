use chrono::{DateTime, Datelike, Timelike, Utc};

use super::{DisplayWindow, week_of};

/// Where the current time falls relative to the shown week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NowMarker {
    pub within_shown_range: bool,
    pub day_of_month: u32,
    /// Column of today in the shown week layout
    pub day: usize,
    /// Minutes since local midnight
    pub minutes: i32,
    pub week: u32,
    pub year: i32,
}

impl NowMarker {
    #[must_use]
    pub fn at(instant: DateTime<Utc>, window: &DisplayWindow) -> Self {
        let local = instant.with_timezone(&window.timezone());
        let (year, week) = week_of(local.date_naive(), window.first_weekday());
        let minutes = i32::try_from(local.hour() * 60 + local.minute()).unwrap_or_default();

        Self {
            within_shown_range: window.span().contains(instant),
            day_of_month: local.day(),
            day: window.day_index(local.weekday()),
            minutes,
            week,
            year,
        }
    }
}
