//! Week view state: the shown window, the now marker and the per-day
//! occurrence index.

use std::collections::VecDeque;

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;
use focal_core::config::Settings;
use focal_core::constants::{
    DAYS_PER_WEEK, DEFAULT_MAX_RECURRENCE_ITERATIONS, NEW_EVENT_LENGTH_MINUTES,
    NEW_EVENT_SNAP_MINUTES, NEW_EVENT_SUMMARY,
};
use focal_rfc::ical::core::EventTime;

use crate::error::ViewResult;
use crate::geometry::{HitTarget, Rect, WeekGeometry};
use crate::model::{Calendar, Component};
use crate::occurrence::{Lane, Occurrence, OccurrenceIndexer};
use crate::week::{DisplayWindow, NowMarker};

/// Fixed parameters of a week view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewConfig {
    pub timezone: Tz,
    /// 0 = Sunday
    pub first_weekday: u8,
    pub max_iterations: usize,
}

impl ViewConfig {
    #[must_use]
    pub const fn new(timezone: Tz) -> Self {
        Self {
            timezone,
            first_weekday: 0,
            max_iterations: DEFAULT_MAX_RECURRENCE_ITERATIONS,
        }
    }

    #[must_use]
    pub const fn with_first_weekday(mut self, first_weekday: u8) -> Self {
        self.first_weekday = first_weekday;
        self
    }

    /// Takes everything but the timezone from `settings`.
    #[must_use]
    pub const fn from_settings(settings: &Settings, timezone: Tz) -> Self {
        Self {
            timezone,
            first_weekday: settings.display.first_weekday,
            max_iterations: settings.recurrence.max_iterations,
        }
    }
}

/// Kind of pointer press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    Single,
    Double,
}

/// A new event the caller should create in `calendar` and then pass to
/// [`WeekView::add_event`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewEventRequest<C> {
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
    pub calendar: C,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PressOutcome<E, C> {
    Selected { event: E, calendar: C, rect: Rect },
    Create(NewEventRequest<C>),
    Deselected,
    Ignored,
}

type Day<C> = VecDeque<Occurrence<<C as Calendar>::Event, C>>;

/// Occurrences of all known calendars within one displayed week.
///
/// Each day keeps two lists, timed and all-day, with the most recently
/// added occurrence first.
pub struct WeekView<C: Calendar> {
    config: ViewConfig,
    window: DisplayWindow,
    now: NowMarker,
    clock: DateTime<Utc>,
    calendars: Vec<C>,
    timed: [Day<C>; DAYS_PER_WEEK],
    all_day: [Day<C>; DAYS_PER_WEEK],
    indexer: OccurrenceIndexer,
}

impl<C: Calendar> std::fmt::Debug for WeekView<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeekView")
            .field("config", &self.config)
            .field("window", &self.window)
            .field("now", &self.now)
            .field("calendars", &self.calendars.len())
            .field("occurrences", &self.len())
            .finish_non_exhaustive()
    }
}

impl<C: Calendar> WeekView<C> {
    /// ## Summary
    /// Creates an empty view showing the current week.
    ///
    /// ## Errors
    /// Returns an error if the configured first weekday is out of range.
    pub fn new(config: ViewConfig) -> ViewResult<Self> {
        Self::new_at(config, Utc::now())
    }

    /// ## Summary
    /// Creates an empty view showing the week containing `now`.
    ///
    /// ## Errors
    /// Returns an error if the configured first weekday is out of range.
    pub fn new_at(config: ViewConfig, now: DateTime<Utc>) -> ViewResult<Self> {
        let window = DisplayWindow::containing_instant(now, config.timezone, config.first_weekday)?;

        tracing::debug!(
            timezone = %config.timezone,
            year = window.year(),
            week = window.week(),
            "Created week view"
        );

        Ok(Self {
            config,
            window,
            now: NowMarker::at(now, &window),
            clock: now,
            calendars: Vec::new(),
            timed: std::array::from_fn(|_| VecDeque::new()),
            all_day: std::array::from_fn(|_| VecDeque::new()),
            indexer: OccurrenceIndexer::new(config.max_iterations),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ViewConfig {
        &self.config
    }

    #[must_use]
    pub const fn window(&self) -> &DisplayWindow {
        &self.window
    }

    #[must_use]
    pub const fn now(&self) -> &NowMarker {
        &self.now
    }

    #[must_use]
    pub const fn current_week_number(&self) -> u32 {
        self.window.week()
    }

    #[must_use]
    pub const fn current_year(&self) -> i32 {
        self.window.year()
    }

    #[must_use]
    pub fn calendars(&self) -> &[C] {
        &self.calendars
    }

    /// Timed occurrences of column `day`, newest first.
    pub fn occurrences(&self, day: usize) -> impl Iterator<Item = &Occurrence<C::Event, C>> {
        self.timed.get(day).into_iter().flatten()
    }

    /// All-day occurrences of column `day`, newest first.
    pub fn all_day(&self, day: usize) -> impl Iterator<Item = &Occurrence<C::Event, C>> {
        self.all_day.get(day).into_iter().flatten()
    }

    #[must_use]
    pub fn has_all_day(&self) -> bool {
        self.all_day.iter().any(|day| !day.is_empty())
    }

    /// Total number of indexed occurrences in both lanes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timed
            .iter()
            .chain(self.all_day.iter())
            .map(VecDeque::len)
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lane_mut(&mut self, lane: Lane) -> &mut [Day<C>; DAYS_PER_WEEK] {
        match lane {
            Lane::Timed => &mut self.timed,
            Lane::AllDay => &mut self.all_day,
        }
    }

    /// ## Summary
    /// Indexes `event` against the shown week and inserts each occurrence at
    /// the front of its day. Adding the same event twice indexes it twice.
    pub fn add_event(&mut self, event: &C::Event, calendar: &C) {
        let placements = self.indexer.index_event(event, &self.window);

        tracing::trace!(
            summary = event.summary(),
            count = placements.len(),
            "Adding event occurrences"
        );

        for placement in placements {
            let Some(day) = self.lane_mut(placement.lane).get_mut(placement.day) else {
                continue;
            };
            day.push_front(Occurrence {
                event: event.clone(),
                calendar: calendar.clone(),
                minute_from: placement.minute_from,
                minute_to: placement.minute_to,
            });
        }
    }

    /// ## Summary
    /// Removes `event` from the index and returns the number of records removed.
    ///
    /// For a single event only the first matching record on the day of its
    /// converted start is removed. A recurring event is removed from every day.
    /// Removing an event that is not indexed does nothing.
    pub fn remove_event(&mut self, event: &C::Event) -> usize {
        if event.rrule().is_some() {
            let mut removed = 0;
            for day in self.timed.iter_mut().chain(self.all_day.iter_mut()) {
                let before = day.len();
                day.retain(|occurrence| occurrence.event != *event);
                removed += before - day.len();
            }
            tracing::debug!(summary = event.summary(), removed, "Removed recurring event");
            return removed;
        }

        let (start, lane) = match self.indexer.local_start(event, &self.window) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(
                    summary = event.summary(),
                    error = %err,
                    "Cannot locate event for removal"
                );
                return 0;
            }
        };
        let day_index = self.window.day_of(&start);

        let Some(day) = self.lane_mut(lane).get_mut(day_index) else {
            return 0;
        };
        match day.iter().position(|occurrence| occurrence.event == *event) {
            Some(position) => {
                day.remove(position);
                1
            }
            None => 0,
        }
    }

    fn index_calendar(&mut self, calendar: &C) {
        calendar.for_each_event(&mut |event| self.add_event(event, calendar));
    }

    /// Remembers `calendar` and indexes all of its events.
    pub fn add_calendar(&mut self, calendar: C) {
        self.index_calendar(&calendar);
        self.calendars.push(calendar);
        tracing::debug!(calendars = self.calendars.len(), "Added calendar");
    }

    /// Forgets `calendar` and rebuilds the index without it.
    pub fn remove_calendar(&mut self, calendar: &C) {
        self.calendars.retain(|known| known != calendar);
        self.rebuild_for_window(self.window);
    }

    /// ## Summary
    /// Shows `window`: clears the index, refreshes the now marker and indexes
    /// every event of every known calendar again.
    pub fn rebuild_for_window(&mut self, window: DisplayWindow) {
        for day in self.timed.iter_mut().chain(self.all_day.iter_mut()) {
            day.clear();
        }
        self.window = window;
        self.now = NowMarker::at(self.clock, &self.window);

        let calendars = self.calendars.clone();
        for calendar in &calendars {
            self.index_calendar(calendar);
        }

        tracing::debug!(
            year = window.year(),
            week = window.week(),
            occurrences = self.len(),
            "Rebuilt week view"
        );
    }

    /// ## Summary
    /// Shows the following week.
    ///
    /// ## Errors
    /// Returns an error if the following week cannot be represented.
    pub fn goto_next(&mut self) -> ViewResult<DisplayWindow> {
        let window = self.window.next()?;
        self.rebuild_for_window(window);
        Ok(window)
    }

    /// ## Summary
    /// Shows the preceding week.
    ///
    /// ## Errors
    /// Returns an error if the preceding week cannot be represented.
    pub fn goto_previous(&mut self) -> ViewResult<DisplayWindow> {
        let window = self.window.previous()?;
        self.rebuild_for_window(window);
        Ok(window)
    }

    /// ## Summary
    /// Shows the week containing the last refreshed current time.
    ///
    /// ## Errors
    /// Returns an error if the window cannot be built.
    pub fn goto_current(&mut self) -> ViewResult<DisplayWindow> {
        let window = DisplayWindow::containing_instant(
            self.clock,
            self.config.timezone,
            self.config.first_weekday,
        )?;
        self.rebuild_for_window(window);
        Ok(window)
    }

    /// ## Summary
    /// Shows week `week` of `year`.
    ///
    /// ## Errors
    /// Returns `ViewError::InvalidWeek` if the week does not exist.
    pub fn goto_week(&mut self, year: i32, week: u32) -> ViewResult<DisplayWindow> {
        let window =
            DisplayWindow::for_week(year, week, self.config.timezone, self.config.first_weekday)?;
        self.rebuild_for_window(window);
        Ok(window)
    }

    /// ## Summary
    /// Shows the week containing the start of `event`.
    ///
    /// ## Errors
    /// Returns an error if the event start cannot be resolved.
    pub fn focus_event(&mut self, event: &C::Event) -> ViewResult<DisplayWindow> {
        let (start, _) = self.indexer.local_start(event, &self.window)?;
        let window = DisplayWindow::containing(
            start.date_naive(),
            self.config.timezone,
            self.config.first_weekday,
        )?;
        self.rebuild_for_window(window);
        Ok(window)
    }

    /// ## Summary
    /// Recomputes the minute extents of every record of `event` from its
    /// start and duration, after the event was edited in place. Returns the
    /// number of records updated. A change of day or lane needs
    /// `remove_event` and `add_event` instead.
    pub fn refresh_event(&mut self, event: &C::Event) -> usize {
        let placement = match self.indexer.anchor_placement(event, &self.window) {
            Ok(placement) => placement,
            Err(err) => {
                tracing::warn!(
                    summary = event.summary(),
                    error = %err,
                    "Cannot refresh event"
                );
                return 0;
            }
        };

        let mut updated = 0;
        for occurrence in self
            .lane_mut(placement.lane)
            .iter_mut()
            .flatten()
            .filter(|occurrence| occurrence.event == *event)
        {
            occurrence.minute_from = placement.minute_from;
            occurrence.minute_to = placement.minute_to;
            updated += 1;
        }
        updated
    }

    /// Updates the now marker from the system clock.
    pub fn refresh_now(&mut self) -> &NowMarker {
        self.refresh_now_at(Utc::now())
    }

    /// Updates the now marker for `instant`. The index is not touched.
    pub fn refresh_now_at(&mut self, instant: DateTime<Utc>) -> &NowMarker {
        self.clock = instant;
        self.now = NowMarker::at(instant, &self.window);
        &self.now
    }

    /// First timed record of `day` whose `[minute_from, minute_to)` contains `minute`.
    #[must_use]
    pub fn find_occurrence(&self, day: usize, minute: i32) -> Option<&Occurrence<C::Event, C>> {
        self.occurrences(day)
            .find(|occurrence| occurrence.contains_minute(minute))
    }

    /// Most recently added all-day record of `day`.
    #[must_use]
    pub fn find_all_day(&self, day: usize) -> Option<&Occurrence<C::Event, C>> {
        self.all_day.get(day).and_then(VecDeque::front)
    }

    /// ## Summary
    /// Handles a primary-button press at `(x, y)`.
    ///
    /// A press on an occurrence selects it. A double-click on empty space asks
    /// for a new event in the first known calendar, snapped down to the quarter
    /// hour. Any other press on the grid deselects.
    pub fn press(
        &self,
        geometry: &WeekGeometry,
        x: f64,
        y: f64,
        click: Click,
    ) -> PressOutcome<C::Event, C> {
        let has_all_day = self.has_all_day();

        let (day, minute) = match geometry.hit(x, y, has_all_day) {
            HitTarget::Outside => return PressOutcome::Ignored,
            HitTarget::AllDay { day } => {
                if let Some(found) = self.find_all_day(day) {
                    return PressOutcome::Selected {
                        event: found.event.clone(),
                        calendar: found.calendar.clone(),
                        rect: geometry.all_day_rect(day),
                    };
                }
                (day, None)
            }
            HitTarget::Timed { day, minute } => {
                if let Some(found) = self.find_occurrence(day, minute) {
                    return PressOutcome::Selected {
                        event: found.event.clone(),
                        calendar: found.calendar.clone(),
                        rect: geometry.occurrence_rect(
                            day,
                            found.minute_from,
                            found.minute_to,
                            has_all_day,
                        ),
                    };
                }
                (day, Some(minute))
            }
        };

        if click == Click::Single {
            return PressOutcome::Deselected;
        }

        let Some(calendar) = self.calendars.first() else {
            tracing::warn!("No calendar configured, cannot create event");
            return PressOutcome::Ignored;
        };
        let Some(date) = self.window.date_of(day) else {
            return PressOutcome::Ignored;
        };

        let tzid = self.config.timezone.name().to_string();
        let (start, end, rect) = match minute {
            None => (
                EventTime::Date(date),
                EventTime::Date(date),
                geometry.all_day_rect(day),
            ),
            Some(minute) => {
                let snapped = minute.div_euclid(NEW_EVENT_SNAP_MINUTES) * NEW_EVENT_SNAP_MINUTES;
                let start = date.and_time(NaiveTime::MIN) + TimeDelta::minutes(i64::from(snapped));
                let end = start + TimeDelta::minutes(NEW_EVENT_LENGTH_MINUTES);
                let length = i32::try_from(NEW_EVENT_LENGTH_MINUTES).unwrap_or(30);
                (
                    EventTime::Zoned {
                        datetime: start,
                        tzid: tzid.clone(),
                    },
                    EventTime::Zoned {
                        datetime: end,
                        tzid,
                    },
                    geometry.occurrence_rect(day, snapped, snapped + length, has_all_day),
                )
            }
        };

        PressOutcome::Create(NewEventRequest {
            summary: NEW_EVENT_SUMMARY.to_string(),
            start,
            end,
            calendar: calendar.clone(),
            rect,
        })
    }
}
