//! Turns events into per-day placements for one display window.

use chrono::{DateTime, Datelike, TimeDelta, Timelike};
use chrono_tz::Tz;
use focal_core::constants::MINUTES_PER_DAY;
use focal_rfc::ical::core::DurationParts;
use focal_rfc::ical::expand::{RecurrenceExpander, TimeZoneResolver, to_display_zone};
use focal_rfc::ical::span::make_span;

use crate::error::{ViewError, ViewResult};
use crate::model::Component;
use crate::week::DisplayWindow;

/// Which per-day list an occurrence belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    Timed,
    AllDay,
}

/// One occurrence of an event, before it is attached to its calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub day: usize,
    pub lane: Lane,
    pub minute_from: i32,
    pub minute_to: i32,
}

/// An indexed occurrence. `minute_to` is not clamped and may exceed a day.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence<E, C> {
    pub event: E,
    pub calendar: C,
    pub minute_from: i32,
    pub minute_to: i32,
}

impl<E, C> Occurrence<E, C> {
    /// `minute_from <= minute < minute_to`
    #[must_use]
    pub const fn contains_minute(&self, minute: i32) -> bool {
        self.minute_from <= minute && minute < self.minute_to
    }
}

/// Minutes since local midnight, ignoring seconds.
#[must_use]
pub fn minute_of_day(time: &DateTime<Tz>) -> i32 {
    i32::try_from(time.hour() * 60 + time.minute()).unwrap_or_default()
}

/// ## Summary
/// Minute extents of an occurrence computed from its start and the hour and
/// minute fields of its duration. Whole days of the duration do not count.
#[must_use]
pub fn duration_extents(start: &DateTime<Tz>, duration: TimeDelta) -> (i32, i32) {
    let parts = DurationParts::from(duration);
    let hour = i64::from(start.hour());
    let minute = i64::from(start.minute());

    let from = hour * 60 + minute;
    let to = (hour + parts.hours) * 60 + minute + parts.minutes;
    (
        i32::try_from(from).unwrap_or_default(),
        i32::try_from(to).unwrap_or(i32::MAX),
    )
}

/// Event times after conversion into the display timezone.
#[derive(Debug, Clone, Copy)]
struct Resolved {
    start: DateTime<Tz>,
    end: Option<DateTime<Tz>>,
    duration: TimeDelta,
    all_day: bool,
}

impl Resolved {
    fn lane(&self) -> Lane {
        if self.all_day { Lane::AllDay } else { Lane::Timed }
    }
}

/// Computes placements of events within a display window.
///
/// Holds the timezone cache and the recurrence iteration limit; otherwise
/// stateless, so indexing the same event twice gives the same result.
#[derive(Debug, Default)]
pub struct OccurrenceIndexer {
    expander: RecurrenceExpander,
    resolver: TimeZoneResolver,
}

impl OccurrenceIndexer {
    #[must_use]
    pub fn new(max_iterations: usize) -> Self {
        Self {
            expander: RecurrenceExpander::new(max_iterations),
            resolver: TimeZoneResolver::new(),
        }
    }

    fn resolve<E: Component>(&mut self, event: &E, zone: Tz) -> ViewResult<Resolved> {
        let dtstart = event.dtstart().ok_or(ViewError::MissingProperty("DTSTART"))?;
        let start = to_display_zone(dtstart, event.tzid(), zone, &mut self.resolver)?;
        let end = event
            .dtend()
            .map(|dtend| to_display_zone(dtend, event.tzid(), zone, &mut self.resolver))
            .transpose()?;
        let all_day = dtstart.is_date();

        let duration = match (event.duration(), end) {
            (Some(duration), _) => duration,
            (None, Some(end)) => end - start,
            // A date start without end or duration lasts one day
            (None, None) if all_day => TimeDelta::days(1),
            (None, None) => TimeDelta::zero(),
        };
        if duration < TimeDelta::zero() {
            return Err(ViewError::InvalidDuration(format!(
                "'{}' ends before it starts ({duration})",
                event.summary()
            )));
        }

        Ok(Resolved {
            start,
            end,
            duration,
            all_day,
        })
    }

    /// ## Summary
    /// The event start in the display timezone and whether it is a date value.
    ///
    /// ## Errors
    /// Returns an error if the start is missing or its timezone cannot be resolved.
    pub fn local_start<E: Component>(
        &mut self,
        event: &E,
        window: &DisplayWindow,
    ) -> ViewResult<(DateTime<Tz>, Lane)> {
        let resolved = self.resolve(event, window.timezone())?;
        Ok((resolved.start, resolved.lane()))
    }

    /// ## Summary
    /// Placement of the event's anchor start, with extents taken from the
    /// start and duration only. No overlap or recurrence checks are made.
    ///
    /// ## Errors
    /// Returns an error if the event times cannot be resolved.
    pub fn anchor_placement<E: Component>(
        &mut self,
        event: &E,
        window: &DisplayWindow,
    ) -> ViewResult<Placement> {
        let resolved = self.resolve(event, window.timezone())?;
        Ok(Self::place(&resolved.start, resolved.duration, resolved.lane(), window))
    }

    fn place(
        start: &DateTime<Tz>,
        duration: TimeDelta,
        lane: Lane,
        window: &DisplayWindow,
    ) -> Placement {
        let (minute_from, minute_to) = match lane {
            Lane::AllDay => (0, MINUTES_PER_DAY),
            Lane::Timed => duration_extents(start, duration),
        };
        Placement {
            day: window.day_index(start.weekday()),
            lane,
            minute_from,
            minute_to,
        }
    }

    /// ## Summary
    /// Computes the placements of `event` inside `window`.
    ///
    /// A single event yields at most one placement and must start in the
    /// window's year. A recurring event is expanded over the window's year and
    /// yields one placement per occurrence overlapping the window.
    ///
    /// ## Errors
    /// Returns an error for a missing start, an unresolvable timezone, a
    /// negative duration or an unusable recurrence rule.
    pub fn try_index_event<E: Component>(
        &mut self,
        event: &E,
        window: &DisplayWindow,
    ) -> ViewResult<Vec<Placement>> {
        let resolved = self.resolve(event, window.timezone())?;
        let lane = resolved.lane();
        let visible = window.span();

        let Some(rule) = event.rrule() else {
            let span = make_span(&resolved.start, resolved.duration);
            if !span.overlaps(&visible) || resolved.start.year() != window.year() {
                return Ok(Vec::new());
            }

            let mut placement = Self::place(&resolved.start, resolved.duration, lane, window);
            if lane == Lane::Timed {
                // Displayed end comes from the converted DTEND, not start + duration
                let end = resolved.end.unwrap_or(resolved.start + resolved.duration);
                placement.minute_to = minute_of_day(&end);
            }
            return Ok(vec![placement]);
        };

        let expansion =
            self.expander
                .try_expand(rule, resolved.start, resolved.duration, window.year())?;

        let mut placements = Vec::new();
        for (start, span) in expansion.spans() {
            if span.start >= visible.end {
                break;
            }
            if span.overlaps(&visible) {
                placements.push(Self::place(&start, resolved.duration, lane, window));
            }
        }

        tracing::trace!(
            summary = event.summary(),
            rule,
            count = placements.len(),
            "Expanded recurring event"
        );

        Ok(placements)
    }

    /// Like [`Self::try_index_event`], but errors are reported as warnings and
    /// the event contributes no placements.
    pub fn index_event<E: Component>(
        &mut self,
        event: &E,
        window: &DisplayWindow,
    ) -> Vec<Placement> {
        self.try_index_event(event, window).unwrap_or_else(|err| {
            tracing::warn!(
                summary = event.summary(),
                error = %err,
                "Skipping event that cannot be placed"
            );
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::memory::Event;
    use chrono::{NaiveDate, TimeZone};
    use focal_rfc::ical::core::EventTime;

    fn window(week: u32) -> DisplayWindow {
        DisplayWindow::for_week(2026, week, Tz::UTC, 0).unwrap()
    }

    fn utc(value: &str) -> EventTime {
        EventTime::parse(value, None).unwrap()
    }

    #[test]
    fn single_event_inside_window() {
        let event = Event::new("Standup", utc("2026-10-19T09:00:00Z"))
            .with_end(utc("2026-10-19T10:00:00Z"));

        let placements = OccurrenceIndexer::default().index_event(&event, &window(43));
        assert_eq!(
            placements,
            vec![Placement {
                day: 1,
                lane: Lane::Timed,
                minute_from: 540,
                minute_to: 600,
            }]
        );
    }

    #[test]
    fn single_event_outside_window() {
        let event = Event::new("Standup", utc("2026-10-19T09:00:00Z"))
            .with_duration(TimeDelta::hours(1));
        assert!(
            OccurrenceIndexer::default()
                .index_event(&event, &window(44))
                .is_empty()
        );
    }

    #[test]
    fn single_event_end_is_taken_from_dtend() {
        // Runs past midnight: minute_to wraps instead of exceeding a day
        let event = Event::new("Late", utc("2026-10-20T23:00:00Z"))
            .with_end(utc("2026-10-21T01:30:00Z"));

        let placements = OccurrenceIndexer::default().index_event(&event, &window(43));
        assert_eq!(placements.len(), 1);
        assert_eq!(
            (placements[0].minute_from, placements[0].minute_to),
            (1380, 90)
        );
    }

    #[test]
    fn recurring_event_extents_come_from_duration() {
        let event = Event::new("Late", utc("2026-10-05T23:00:00Z"))
            .with_duration(TimeDelta::minutes(150))
            .with_rrule("FREQ=WEEKLY;BYDAY=TU");

        let placements = OccurrenceIndexer::default().index_event(&event, &window(43));
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].day, 2);
        assert_eq!(
            (placements[0].minute_from, placements[0].minute_to),
            (1380, 1530)
        );
    }

    #[test]
    fn zero_length_event_is_not_placed() {
        let event = Event::new("Reminder", utc("2026-10-19T09:00:00Z"));
        assert!(
            OccurrenceIndexer::default()
                .index_event(&event, &window(43))
                .is_empty()
        );
    }

    #[test]
    fn all_day_event_uses_all_day_lane() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 21).unwrap();
        let event = Event::new("Holiday", EventTime::Date(date));

        let placements = OccurrenceIndexer::default().index_event(&event, &window(43));
        assert_eq!(
            placements,
            vec![Placement {
                day: 3,
                lane: Lane::AllDay,
                minute_from: 0,
                minute_to: MINUTES_PER_DAY,
            }]
        );
    }

    #[test_log::test]
    fn broken_events_contribute_nothing() {
        let mut indexer = OccurrenceIndexer::default();
        let window = window(43);

        let no_start = Event::default();
        assert!(matches!(
            indexer.try_index_event(&no_start, &window),
            Err(ViewError::MissingProperty("DTSTART"))
        ));

        let backwards = Event::new("Backwards", utc("2026-10-19T10:00:00Z"))
            .with_end(utc("2026-10-19T09:00:00Z"));
        assert!(matches!(
            indexer.try_index_event(&backwards, &window),
            Err(ViewError::InvalidDuration(_))
        ));

        let bad_zone = Event::new(
            "Nowhere",
            EventTime::parse("2026-10-19T10:00:00", Some("Mars/Olympus_Mons")).unwrap(),
        );
        assert!(indexer.try_index_event(&bad_zone, &window).is_err());

        let bad_rule = Event::new("Sometimes", utc("2026-10-19T10:00:00Z"))
            .with_duration(TimeDelta::hours(1))
            .with_rrule("FREQ=SOMETIMES");
        assert!(matches!(
            indexer.try_index_event(&bad_rule, &window),
            Err(ViewError::Rfc(_))
        ));

        for event in [no_start, backwards, bad_zone, bad_rule] {
            assert!(indexer.index_event(&event, &window).is_empty());
        }
    }

    #[test]
    fn duration_extents_drop_whole_days() {
        let start = Tz::UTC.with_ymd_and_hms(2026, 10, 19, 9, 15, 0).unwrap();
        assert_eq!(duration_extents(&start, TimeDelta::minutes(45)), (555, 600));
        assert_eq!(
            duration_extents(&start, TimeDelta::hours(26)),
            (555, 555 + 120)
        );
    }

    #[test]
    fn occurrence_minute_range_is_half_open() {
        let occurrence = Occurrence {
            event: (),
            calendar: (),
            minute_from: 540,
            minute_to: 600,
        };
        assert!(occurrence.contains_minute(540));
        assert!(occurrence.contains_minute(599));
        assert!(!occurrence.contains_minute(600));
    }
}
