//! RRULE expansion filtered to a single calendar year.
//!
//! Occurrences are generated in the anchor's zone so they keep the anchor's
//! wall-clock time across DST changes. Iteration skips occurrences before the
//! filter year and stops at the first one after it.

use chrono::{DateTime, Datelike, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;
use focal_core::constants::DEFAULT_MAX_RECURRENCE_ITERATIONS;
use rrule::{RRule, RRuleSet, Unvalidated};

use crate::error::{RfcError, RfcResult};
use crate::ical::core::EventTime;
use crate::ical::expand::timezone::localize_naive;
use crate::ical::span::{TimeSpan, make_span};

fn strip_property_prefix(rule: &str) -> &str {
    let text = rule.trim();
    text.strip_prefix("RRULE:").unwrap_or(text)
}

/// ## Summary
/// Parses RRULE text, with or without the `RRULE:` property prefix.
///
/// ## Errors
/// Returns `RfcError::RecurrenceRule` if the text is not a valid rule.
pub fn parse_rule(rule: &str) -> RfcResult<RRule<Unvalidated>> {
    let text = strip_property_prefix(rule);

    text.parse::<RRule<Unvalidated>>()
        .map_err(|err| RfcError::RecurrenceRule(format!("'{text}': {err}")))
}

/// Splits the `UNTIL` part off a rule, returning the remaining parts and the
/// raw `UNTIL` value.
fn split_until(text: &str) -> (String, Option<&str>) {
    let mut until = None;
    let rest: Vec<&str> = text
        .split(';')
        .filter(|part| match part.split_once('=') {
            Some((key, value)) if key.trim().eq_ignore_ascii_case("UNTIL") => {
                until = Some(value.trim());
                false
            }
            _ => true,
        })
        .collect();
    (rest.join(";"), until)
}

/// ## Summary
/// Turns an `UNTIL` value into a UTC instant. Floating values are wall-clock
/// time in `zone` and a date bound covers the whole of that day.
///
/// ## Errors
/// Returns `RfcError::RecurrenceRule` if the value is not a date or date-time.
fn resolve_until(value: &str, zone: Tz) -> RfcResult<DateTime<Utc>> {
    let local = match EventTime::parse(value, None)
        .map_err(|err| RfcError::RecurrenceRule(format!("UNTIL '{value}': {err}")))?
    {
        EventTime::Utc(until) => return Ok(until),
        EventTime::Date(date) => {
            date.and_time(NaiveTime::MIN) + TimeDelta::days(1) - TimeDelta::seconds(1)
        }
        EventTime::Floating(datetime) | EventTime::Zoned { datetime, .. } => datetime,
    };
    Ok(localize_naive(local, zone)?.with_timezone(&Utc))
}

/// Expands recurrence rules with a bounded amount of work per pass.
#[derive(Debug, Clone, Copy)]
pub struct RecurrenceExpander {
    max_iterations: usize,
}

impl Default for RecurrenceExpander {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECURRENCE_ITERATIONS)
    }
}

impl RecurrenceExpander {
    #[must_use]
    pub const fn new(max_iterations: usize) -> Self {
        Self { max_iterations }
    }

    /// ## Summary
    /// Builds the occurrence sequence of `rule` anchored at `anchor`, limited
    /// to occurrences whose local year equals `year_filter`.
    ///
    /// ## Errors
    /// Returns `RfcError::RecurrenceRule` if the rule cannot be parsed or
    /// fails validation against the anchor.
    pub fn try_expand(
        &self,
        rule: &str,
        anchor: DateTime<Tz>,
        duration: TimeDelta,
        year_filter: i32,
    ) -> RfcResult<Expansion> {
        let zone = anchor.timezone();
        let rrule_zone: rrule::Tz = zone.into();

        let (text, until) = split_until(strip_property_prefix(rule));
        let mut parsed = parse_rule(&text)?;
        if let Some(value) = until {
            let until = resolve_until(value, zone)?;
            parsed = parsed.until(until.with_timezone(&rrule::Tz::from(Tz::UTC)));
        }

        let rule_set = parsed
            .build(anchor.with_timezone(&rrule_zone))
            .map_err(|err| RfcError::RecurrenceRule(err.to_string()))?;

        tracing::trace!(rule, anchor = %anchor, year_filter, "Built recurrence set");

        Ok(Expansion {
            rule_set: Some(rule_set),
            zone,
            duration,
            year_filter,
            max_iterations: self.max_iterations,
        })
    }

    /// Like [`Self::try_expand`], but a bad rule is reported as a warning and
    /// yields an empty expansion.
    #[must_use]
    pub fn expand(
        &self,
        rule: &str,
        anchor: DateTime<Tz>,
        duration: TimeDelta,
        year_filter: i32,
    ) -> Expansion {
        self.try_expand(rule, anchor, duration, year_filter)
            .unwrap_or_else(|err| {
                tracing::warn!(rule, error = %err, "Ignoring unusable recurrence rule");
                Expansion::empty(anchor.timezone(), duration, year_filter)
            })
    }
}

/// The occurrences of one recurrence rule within one year.
///
/// Restartable: every call to [`Expansion::iter`] starts again from the anchor.
#[derive(Debug, Clone)]
pub struct Expansion {
    rule_set: Option<RRuleSet>,
    zone: Tz,
    duration: TimeDelta,
    year_filter: i32,
    max_iterations: usize,
}

impl Expansion {
    #[must_use]
    pub const fn empty(zone: Tz, duration: TimeDelta, year_filter: i32) -> Self {
        Self {
            rule_set: None,
            zone,
            duration,
            year_filter,
            max_iterations: 0,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rule_set.is_none()
    }

    #[must_use]
    pub const fn duration(&self) -> TimeDelta {
        self.duration
    }

    #[must_use]
    pub const fn year_filter(&self) -> i32 {
        self.year_filter
    }

    /// Occurrence starts in ascending order.
    #[must_use]
    pub fn iter(&self) -> ExpansionIter<'_> {
        ExpansionIter {
            inner: self
                .rule_set
                .as_ref()
                .map(|set| {
                    Box::new(set.into_iter()) as Box<dyn Iterator<Item = DateTime<rrule::Tz>> + '_>
                }),
            zone: self.zone,
            year_filter: self.year_filter,
            remaining: self.max_iterations,
            finished: false,
        }
    }

    /// Occurrence starts paired with their `[start, start + duration)` span.
    pub fn spans(&self) -> impl Iterator<Item = (DateTime<Tz>, TimeSpan)> + '_ {
        self.iter()
            .map(|start| (start, make_span(&start, self.duration)))
    }
}

impl<'a> IntoIterator for &'a Expansion {
    type Item = DateTime<Tz>;
    type IntoIter = ExpansionIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct ExpansionIter<'a> {
    inner: Option<Box<dyn Iterator<Item = DateTime<rrule::Tz>> + 'a>>,
    zone: Tz,
    year_filter: i32,
    remaining: usize,
    finished: bool,
}

impl Iterator for ExpansionIter<'_> {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let Some(inner) = self.inner.as_mut() else {
            self.finished = true;
            return None;
        };

        loop {
            if self.remaining == 0 {
                tracing::warn!(
                    year = self.year_filter,
                    "Recurrence expansion hit its iteration limit"
                );
                self.finished = true;
                return None;
            }
            self.remaining -= 1;

            let Some(next) = inner.next() else {
                self.finished = true;
                return None;
            };
            let local = next.with_timezone(&self.zone);

            if local.year() < self.year_filter {
                continue;
            }
            if local.year() > self.year_filter {
                self.finished = true;
                return None;
            }
            return Some(local);
        }
    }
}
