//! Week numbering and the seven-day display window.
//!
//! Weeks are numbered 1-based like ISO 8601 weeks, but start on the
//! configured first weekday (0 = Sunday). Week `n` begins on the ISO Monday
//! of week `n` shifted by `first_weekday - 1` days, so with a Sunday start the
//! week containing Monday 2026-10-19 is week 43 and begins on Sunday
//! 2026-10-18. libical's Sunday-based `icaltime_week_number() + 1` numbers
//! that same week 42.

pub mod now;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use focal_core::constants::DAYS_PER_WEEK;
use focal_core::error::CoreError;
use focal_rfc::ical::expand::localize_naive;
use focal_rfc::ical::span::TimeSpan;

use crate::error::{ViewError, ViewResult};

pub use now::NowMarker;

/// Number of weeks in `year` (52 or 53).
#[must_use]
pub fn weeks_in_year(year: i32) -> u32 {
    // Dec 28 always falls in the last week of its year
    NaiveDate::from_ymd_opt(year, 12, 28).map_or(52, |date| date.iso_week().week())
}

/// Column of `weekday` in a week starting on `first_weekday`.
#[must_use]
pub fn day_index(weekday: Weekday, first_weekday: u8) -> usize {
    let from_sunday = weekday.num_days_from_sunday() as usize;
    (from_sunday + DAYS_PER_WEEK - usize::from(first_weekday)) % DAYS_PER_WEEK
}

/// First day of week `week` of `year`, or `None` if the week does not exist.
#[must_use]
pub fn week_start(year: i32, week: u32, first_weekday: u8) -> Option<NaiveDate> {
    let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?;
    monday.checked_add_signed(TimeDelta::days(i64::from(first_weekday) - 1))
}

/// `(year, week)` of the week containing `date`.
#[must_use]
pub fn week_of(date: NaiveDate, first_weekday: u8) -> (i32, u32) {
    let offset = day_index(date.weekday(), first_weekday);
    let start = date - TimeDelta::days(i64::try_from(offset).unwrap_or_default());
    let monday = start + TimeDelta::days(1 - i64::from(first_weekday));
    let iso = monday.iso_week();
    (iso.year(), iso.week())
}

fn check_first_weekday(first_weekday: u8) -> ViewResult<()> {
    if first_weekday > 6 {
        return Err(ViewError::Core(CoreError::InvalidInput(format!(
            "first weekday must be 0..=6, got {first_weekday}"
        ))));
    }
    Ok(())
}

/// The week currently shown: seven days starting at local midnight of the
/// first weekday, as an absolute `[start, start + 7 * 24h)` span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayWindow {
    year: i32,
    week: u32,
    timezone: Tz,
    first_weekday: u8,
    first_day: NaiveDate,
    span: TimeSpan,
}

impl DisplayWindow {
    /// ## Summary
    /// Builds the window for week `week` of `year`.
    ///
    /// ## Errors
    /// Returns `ViewError::InvalidWeek` if the week does not exist in that
    /// year, or an input error for a first weekday outside `0..=6`.
    pub fn for_week(year: i32, week: u32, timezone: Tz, first_weekday: u8) -> ViewResult<Self> {
        check_first_weekday(first_weekday)?;
        if week == 0 || week > weeks_in_year(year) {
            return Err(ViewError::InvalidWeek { year, week });
        }
        let first_day =
            week_start(year, week, first_weekday).ok_or(ViewError::InvalidWeek { year, week })?;

        let start = localize_naive(first_day.and_time(NaiveTime::MIN), timezone)?;
        let start = start.with_timezone(&Utc);
        let days = i64::try_from(DAYS_PER_WEEK).unwrap_or(7);
        let span = TimeSpan::new(start, start + TimeDelta::days(days));

        tracing::trace!(year, week, first_day = %first_day, "Built display window");

        Ok(Self {
            year,
            week,
            timezone,
            first_weekday,
            first_day,
            span,
        })
    }

    /// ## Summary
    /// Builds the window of the week containing `date`.
    ///
    /// ## Errors
    /// Returns an input error for a first weekday outside `0..=6`.
    pub fn containing(date: NaiveDate, timezone: Tz, first_weekday: u8) -> ViewResult<Self> {
        check_first_weekday(first_weekday)?;
        let (year, week) = week_of(date, first_weekday);
        Self::for_week(year, week, timezone, first_weekday)
    }

    /// ## Summary
    /// Builds the window of the week containing `instant` in `timezone`.
    ///
    /// ## Errors
    /// Returns an input error for a first weekday outside `0..=6`.
    pub fn containing_instant(
        instant: DateTime<Utc>,
        timezone: Tz,
        first_weekday: u8,
    ) -> ViewResult<Self> {
        let local = instant.with_timezone(&timezone);
        Self::containing(local.date_naive(), timezone, first_weekday)
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn week(&self) -> u32 {
        self.week
    }

    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    #[must_use]
    pub const fn first_weekday(&self) -> u8 {
        self.first_weekday
    }

    #[must_use]
    pub const fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    #[must_use]
    pub const fn span(&self) -> TimeSpan {
        self.span
    }

    /// Local date shown in column `day`.
    #[must_use]
    pub fn date_of(&self, day: usize) -> Option<NaiveDate> {
        if day >= DAYS_PER_WEEK {
            return None;
        }
        self.first_day
            .checked_add_signed(TimeDelta::days(i64::try_from(day).ok()?))
    }

    #[must_use]
    pub fn day_index(&self, weekday: Weekday) -> usize {
        day_index(weekday, self.first_weekday)
    }

    /// Column of an instant after conversion to the display timezone.
    #[must_use]
    pub fn day_of<Z: TimeZone>(&self, instant: &DateTime<Z>) -> usize {
        self.day_index(instant.with_timezone(&self.timezone).weekday())
    }

    /// ## Summary
    /// The following week, rolling over into the next year after its last week.
    ///
    /// ## Errors
    /// Returns an error if the following week cannot be represented.
    pub fn next(&self) -> ViewResult<Self> {
        let week = self.week % weeks_in_year(self.year) + 1;
        let year = if week == 1 { self.year + 1 } else { self.year };
        Self::for_week(year, week, self.timezone, self.first_weekday)
    }

    /// ## Summary
    /// The preceding week, rolling back to the last week of the previous year.
    ///
    /// ## Errors
    /// Returns an error if the preceding week cannot be represented.
    pub fn previous(&self) -> ViewResult<Self> {
        let (year, week) = if self.week <= 1 {
            (self.year - 1, weeks_in_year(self.year - 1))
        } else {
            (self.year, self.week - 1)
        };
        Self::for_week(year, week, self.timezone, self.first_weekday)
    }
}
