//! Value types for event start/end properties.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};

use crate::error::{RfcError, RfcResult};

/// A DTSTART/DTEND value as carried by a calendar component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTime {
    /// All-day value (`VALUE=DATE`).
    Date(NaiveDate),
    /// Local wall-clock time without a zone of its own.
    Floating(NaiveDateTime),
    /// UTC time (`...Z`).
    Utc(DateTime<Utc>),
    /// Local time with a `TZID` parameter.
    Zoned {
        datetime: NaiveDateTime,
        tzid: String,
    },
}

impl EventTime {
    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// The `TZID` carried by the value itself, if any.
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        match self {
            Self::Zoned { tzid, .. } => Some(tzid),
            Self::Utc(_) => Some("UTC"),
            Self::Date(_) | Self::Floating(_) => None,
        }
    }

    /// Wall-clock fields of the value; dates are midnight.
    #[must_use]
    pub fn naive_local(&self) -> NaiveDateTime {
        match self {
            Self::Date(date) => date.and_time(NaiveTime::MIN),
            Self::Floating(datetime) | Self::Zoned { datetime, .. } => *datetime,
            Self::Utc(datetime) => datetime.naive_utc(),
        }
    }

    /// ## Summary
    /// Parses an event time from either the iCalendar basic form
    /// (`20261019T090000Z`, `20261019`) or the extended ISO form
    /// (`2026-10-19T09:00:00Z`, `2026-10-19`).
    ///
    /// A trailing `Z` produces a UTC value. Otherwise a `tzid` makes the value
    /// zoned and its absence makes it floating. Dates ignore `tzid`.
    ///
    /// ## Errors
    /// Returns `RfcError::ParseError` if the value matches none of the forms.
    pub fn parse(value: &str, tzid: Option<&str>) -> RfcResult<Self> {
        let value = value.trim();

        for format in ["%Y%m%d", "%Y-%m-%d"] {
            if let Ok(date) = NaiveDate::parse_from_str(value, format) {
                return Ok(Self::Date(date));
            }
        }

        let (body, utc) = match value.strip_suffix('Z') {
            Some(body) => (body, true),
            None => (value, false),
        };

        let datetime = ["%Y%m%dT%H%M%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(body, format).ok())
            .ok_or_else(|| RfcError::ParseError(format!("unrecognized date-time '{value}'")))?;

        Ok(match (utc, tzid) {
            (true, _) => Self::Utc(datetime.and_utc()),
            (false, Some(tzid)) => Self::Zoned {
                datetime,
                tzid: tzid.to_string(),
            },
            (false, None) => Self::Floating(datetime),
        })
    }
}

/// A duration split into the fields of an iCalendar DURATION value.
///
/// Whole weeks are only used when the duration is an exact number of weeks;
/// otherwise the value is split into days, hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationParts {
    pub negative: bool,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

const SECONDS_PER_WEEK: i64 = 7 * 24 * 60 * 60;
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

impl From<TimeDelta> for DurationParts {
    fn from(delta: TimeDelta) -> Self {
        let total = delta.num_seconds();
        let negative = total < 0;
        let mut rest = total.abs();

        if rest != 0 && rest % SECONDS_PER_WEEK == 0 {
            return Self {
                negative,
                weeks: rest / SECONDS_PER_WEEK,
                ..Self::default()
            };
        }

        let days = rest / SECONDS_PER_DAY;
        rest -= days * SECONDS_PER_DAY;
        let hours = rest / 3600;
        rest -= hours * 3600;
        let minutes = rest / 60;

        Self {
            negative,
            weeks: 0,
            days,
            hours,
            minutes,
            seconds: rest - minutes * 60,
        }
    }
}

/// ## Summary
/// Parses an iCalendar DURATION value such as `PT1H30M`, `P1D`, `P2W` or `-PT15M`.
///
/// ## Errors
/// Returns `RfcError::ParseError` for anything that is not a duration value.
pub fn parse_duration(value: &str) -> RfcResult<TimeDelta> {
    let invalid = || RfcError::ParseError(format!("invalid duration '{value}'"));
    let text = value.trim();

    let (negative, text) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let text = text.strip_prefix('P').ok_or_else(invalid)?;
    if text.is_empty() {
        return Err(invalid());
    }

    let mut total = TimeDelta::zero();
    let mut in_time = false;
    let mut last_unit_in_time = false;
    let mut parts = 0;
    let mut digits = String::new();
    for c in text.chars() {
        match c {
            '0'..='9' => digits.push(c),
            'T' if !in_time && digits.is_empty() => in_time = true,
            unit => {
                let amount: i64 = digits.parse().map_err(|_err| invalid())?;
                digits.clear();
                total += match (unit, in_time) {
                    ('W', false) => TimeDelta::try_weeks(amount),
                    ('D', false) => TimeDelta::try_days(amount),
                    ('H', true) => TimeDelta::try_hours(amount),
                    ('M', true) => TimeDelta::try_minutes(amount),
                    ('S', true) => TimeDelta::try_seconds(amount),
                    _ => None,
                }
                .ok_or_else(invalid)?;
                parts += 1;
                last_unit_in_time = in_time;
            }
        }
    }
    // "PT" and "P1DT" carry a time designator without a time part
    if !digits.is_empty() || parts == 0 || in_time != last_unit_in_time {
        return Err(invalid());
    }

    Ok(if negative { -total } else { total })
}
