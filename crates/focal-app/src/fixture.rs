//! Calendar files: one TOML document per calendar.
//!
//! ```toml
//! name = "Work"
//! color = "#3465a4"
//!
//! [[events]]
//! summary = "Standup"
//! start = "2026-10-19T09:00:00"
//! duration = "PT15M"
//! tzid = "Europe/Berlin"
//! rrule = "FREQ=WEEKLY;BYDAY=MO,TU,WE,TH,FR"
//! ```
//!
//! `start` and `end` accept `YYYY-MM-DD` for all-day events, or a date-time
//! with an optional trailing `Z`. `duration` is an iCalendar DURATION.

use focal_core::types::Rgba;
use focal_rfc::ical::core::{EventTime, parse_duration};
use focal_view::model::memory::{Event, MemoryCalendar};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarFixture {
    pub name: String,
    pub color: Option<String>,
    #[serde(default)]
    pub events: Vec<EventFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventFixture {
    pub summary: String,
    pub start: String,
    pub end: Option<String>,
    pub duration: Option<String>,
    pub tzid: Option<String>,
    pub rrule: Option<String>,
}

impl EventFixture {
    /// ## Summary
    /// Converts the raw fields into an event.
    ///
    /// ## Errors
    /// Returns an error if a time or duration value cannot be parsed.
    pub fn to_event(&self) -> AppResult<Event> {
        let tzid = self.tzid.as_deref();
        let mut event = Event::new(&self.summary, EventTime::parse(&self.start, tzid)?);

        if let Some(end) = &self.end {
            event = event.with_end(EventTime::parse(end, tzid)?);
        }
        if let Some(duration) = &self.duration {
            event = event.with_duration(parse_duration(duration)?);
        }
        if let Some(rrule) = &self.rrule {
            event = event.with_rrule(rrule);
        }
        if let Some(tzid) = tzid {
            event = event.with_tzid(tzid);
        }
        Ok(event)
    }
}

impl CalendarFixture {
    /// ## Summary
    /// Reads a calendar file. The format is taken from the file extension.
    ///
    /// ## Errors
    /// Returns `AppError::FixtureError` if the file is missing or malformed.
    pub fn load(path: &str) -> AppResult<Self> {
        let to_error = |source| AppError::FixtureError {
            path: path.to_string(),
            source,
        };

        config::Config::builder()
            .add_source(config::File::with_name(path).required(true))
            .build()
            .map_err(to_error)?
            .try_deserialize::<Self>()
            .map_err(to_error)
    }

    /// ## Summary
    /// Builds an in-memory calendar. Events that cannot be parsed are
    /// skipped with a warning.
    ///
    /// ## Errors
    /// Returns an error if the calendar color is malformed.
    pub fn into_calendar(self) -> AppResult<MemoryCalendar> {
        let color = match self.color.as_deref() {
            Some(hex) => Rgba::from_hex(hex)?,
            None => Rgba::default(),
        };
        let calendar = MemoryCalendar::new(self.name, color);

        for fixture in &self.events {
            match fixture.to_event() {
                Ok(event) => {
                    calendar.insert(event);
                }
                Err(err) => {
                    tracing::warn!(
                        calendar = calendar.name(),
                        summary = %fixture.summary,
                        error = %err,
                        "Skipping malformed event"
                    );
                }
            }
        }

        tracing::debug!(
            calendar = calendar.name(),
            events = calendar.len(),
            "Loaded calendar"
        );
        Ok(calendar)
    }
}

/// ## Summary
/// Loads every calendar file in `paths`.
///
/// ## Errors
/// Returns the first load error.
pub fn load_calendars<S: AsRef<str>>(paths: &[S]) -> AppResult<Vec<MemoryCalendar>> {
    paths
        .iter()
        .map(|path| CalendarFixture::load(path.as_ref())?.into_calendar())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use focal_view::model::Component;

    fn fixture(start: &str) -> EventFixture {
        EventFixture {
            summary: "Standup".to_string(),
            start: start.to_string(),
            end: None,
            duration: Some("PT15M".to_string()),
            tzid: Some("Europe/Berlin".to_string()),
            rrule: Some("FREQ=DAILY".to_string()),
        }
    }

    #[test]
    fn event_fixture_converts_fields() {
        let event = fixture("2026-10-19T09:00:00").to_event().expect("valid fixture");
        assert_eq!(event.summary(), "Standup");
        assert_eq!(event.duration(), Some(TimeDelta::minutes(15)));
        assert_eq!(event.rrule(), Some("FREQ=DAILY"));
        assert_eq!(
            event.dtstart().and_then(EventTime::tzid),
            Some("Europe/Berlin")
        );
    }

    #[test_log::test]
    fn malformed_events_are_skipped() {
        let calendar = CalendarFixture {
            name: "Work".to_string(),
            color: Some("#ff8800".to_string()),
            events: vec![fixture("2026-10-19T09:00:00"), fixture("soon")],
        }
        .into_calendar()
        .expect("calendar builds");

        assert_eq!(calendar.name(), "Work");
        assert_eq!(calendar.len(), 1);
    }

    #[test]
    fn malformed_color_is_an_error() {
        let result = CalendarFixture {
            name: "Work".to_string(),
            color: Some("orange".to_string()),
            events: Vec::new(),
        }
        .into_calendar();
        assert!(result.is_err());
    }
}
