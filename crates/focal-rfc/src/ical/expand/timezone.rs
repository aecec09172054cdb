//! Timezone lookup and conversion of event times into the display zone.
//!
//! TZIDs found in the wild are not always IANA names. Windows zone names and
//! retired aliases are mapped through ICU4X before the `chrono-tz` lookup.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;

use crate::ical::core::EventTime;

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Unrecognized timezone identifier '{0}'")]
    UnknownTimezone(String),

    /// Local time skipped by a DST transition.
    #[error("Local time does not exist: {0}")]
    NonExistentTime(String),
}

/// Prefixes some clients put in front of IANA names
const VENDOR_PREFIXES: [&str; 2] = ["/mozilla.org/", "/softwarestudio.org/"];

fn strip_vendor_prefix(tzid: &str) -> &str {
    VENDOR_PREFIXES
        .iter()
        .find_map(|prefix| tzid.strip_prefix(prefix))
        .unwrap_or(tzid)
}

fn windows_to_iana(name: &str) -> Option<String> {
    let zone = WindowsParser::new().parse(name, None)?;
    IanaParserExtended::new()
        .iter()
        .find(|entry| entry.time_zone == zone)
        .map(|entry| entry.canonical.to_string())
}

fn canonical_iana(name: &str) -> Option<String> {
    let parsed = IanaParserExtended::new().parse(name);
    (parsed.time_zone != icu::time::TimeZone::UNKNOWN).then(|| parsed.canonical.to_string())
}

/// Maps a TZID to the name `chrono-tz` should know it by
/// (`Eastern Standard Time` -> `America/New_York`, `Europe/Kiev` -> `Europe/Kyiv`).
fn normalize_tzid(tzid: &str) -> String {
    let name = strip_vendor_prefix(tzid);
    windows_to_iana(name)
        .or_else(|| canonical_iana(name))
        .unwrap_or_else(|| name.to_string())
}

/// Resolves TZIDs to zones, remembering every identifier it has seen.
#[derive(Debug, Default)]
pub struct TimeZoneResolver {
    known: HashMap<String, Tz>,
}

impl TimeZoneResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Looks up the zone for `tzid`, accepting IANA names, their aliases and
    /// Windows zone names.
    ///
    /// ## Errors
    /// Returns `ConversionError::UnknownTimezone` if no zone matches.
    pub fn resolve(&mut self, tzid: &str) -> Result<Tz, ConversionError> {
        if let Some(&tz) = self.known.get(tzid) {
            return Ok(tz);
        }

        let tz: Tz = normalize_tzid(tzid)
            .parse()
            .map_err(|_err| ConversionError::UnknownTimezone(tzid.to_string()))?;

        tracing::trace!(tzid, zone = %tz, "Resolved timezone");
        self.known.insert(tzid.to_string(), tz);
        Ok(tz)
    }
}

/// ## Summary
/// Attaches `tz` to wall-clock fields. A repeated hour resolves to its first
/// occurrence and a skipped hour is moved forward by one hour.
///
/// ## Errors
/// Returns `ConversionError::NonExistentTime` if the shifted time still does not exist.
pub fn localize_naive(local_time: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>, ConversionError> {
    tz.from_local_datetime(&local_time)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(local_time + TimeDelta::hours(1)))
                .earliest()
        })
        .ok_or_else(|| ConversionError::NonExistentTime(format!("{local_time} in {tz}")))
}

/// ## Summary
/// Interprets `local_time` in zone `tzid` and returns the UTC instant.
/// Times inside a DST gap move forward one hour and a repeated hour resolves
/// to its first occurrence.
///
/// ## Errors
/// Returns an error for an unknown zone.
pub fn convert_to_utc_lenient(
    local_time: NaiveDateTime,
    tzid: &str,
    resolver: &mut TimeZoneResolver,
) -> Result<DateTime<Utc>, ConversionError> {
    let tz = resolver.resolve(tzid)?;
    localize_naive(local_time, tz).map(|dt| dt.with_timezone(&Utc))
}

/// ## Summary
/// Converts an event time into the display timezone.
///
/// Zone precedence: the TZID carried by the value, then `event_tzid` (the
/// component's own zone), then the display zone itself. Falling back to the
/// display zone is reported as a warning. Date values are taken as midnight
/// in the display zone.
///
/// ## Errors
/// Returns an error if a named zone cannot be resolved.
pub fn to_display_zone(
    time: &EventTime,
    event_tzid: Option<&str>,
    display_zone: Tz,
    resolver: &mut TimeZoneResolver,
) -> Result<DateTime<Tz>, ConversionError> {
    let in_display = |utc: DateTime<Utc>| utc.with_timezone(&display_zone);

    match time {
        EventTime::Date(_) => localize_naive(time.naive_local(), display_zone),
        EventTime::Utc(dt) => Ok(in_display(*dt)),
        EventTime::Zoned { datetime, tzid } => {
            convert_to_utc_lenient(*datetime, tzid, resolver).map(in_display)
        }
        EventTime::Floating(datetime) => {
            if let Some(tzid) = event_tzid {
                return convert_to_utc_lenient(*datetime, tzid, resolver).map(in_display);
            }
            tracing::warn!(
                time = %datetime,
                display = %display_zone,
                "Event time has no timezone, interpreting in display zone"
            );
            localize_naive(*datetime, display_zone)
        }
    }
}
