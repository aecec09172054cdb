//! Half-open absolute time spans.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

/// `[start, end)` in absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSpan {
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// True iff both spans share a non-empty interval. Touching spans do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start.max(other.start) < self.end.min(other.end)
    }

    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// `[start, start + duration)`
#[must_use]
pub fn make_span<Tz: TimeZone>(start: &DateTime<Tz>, duration: TimeDelta) -> TimeSpan {
    let start = start.with_timezone(&Utc);
    TimeSpan::new(start, start + duration)
}

#[must_use]
pub fn overlaps(a: &TimeSpan, b: &TimeSpan) -> bool {
    a.overlaps(b)
}
