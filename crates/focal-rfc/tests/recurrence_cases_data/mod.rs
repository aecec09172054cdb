use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;
use focal_rfc::ical::expand::RecurrenceExpander;

pub struct RecurrenceCase {
    pub name: &'static str,
    pub rule: &'static str,
    /// Local anchor time, `YYYY-MM-DDTHH:MM:SS`
    pub anchor: &'static str,
    pub tzid: &'static str,
    pub year: i32,
    pub expected: Option<&'static [&'static str]>,
    pub expected_len: Option<usize>,
}

pub fn recurrence_cases() -> Vec<RecurrenceCase> {
    vec![
        RecurrenceCase {
            name: "weekly_basic",
            rule: "FREQ=WEEKLY;COUNT=3;BYDAY=TU,TH",
            anchor: "2026-09-01T09:00:00",
            tzid: "UTC",
            year: 2026,
            expected: Some(&[
                "2026-09-01T09:00:00+00:00",
                "2026-09-03T09:00:00+00:00",
                "2026-09-08T09:00:00+00:00",
            ]),
            expected_len: None,
        },
        RecurrenceCase {
            name: "monthly_across_four_years",
            rule: "FREQ=MONTHLY;COUNT=48;BYMONTHDAY=15",
            anchor: "2025-01-15T10:00:00",
            tzid: "UTC",
            year: 2026,
            expected: None,
            expected_len: Some(12),
        },
        RecurrenceCase {
            name: "yearly_unbounded_single_hit",
            rule: "FREQ=YEARLY;BYMONTH=7;BYMONTHDAY=4",
            anchor: "2019-07-04T12:00:00",
            tzid: "UTC",
            year: 2026,
            expected: Some(&["2026-07-04T12:00:00+00:00"]),
            expected_len: None,
        },
        RecurrenceCase {
            name: "count_exhausted_before_year",
            rule: "FREQ=DAILY;COUNT=10",
            anchor: "2024-01-01T08:00:00",
            tzid: "UTC",
            year: 2026,
            expected: None,
            expected_len: Some(0),
        },
        RecurrenceCase {
            name: "until_inside_year",
            rule: "FREQ=WEEKLY;UNTIL=20260201T000000Z",
            anchor: "2026-01-05T09:00:00",
            tzid: "UTC",
            year: 2026,
            expected: Some(&[
                "2026-01-05T09:00:00+00:00",
                "2026-01-12T09:00:00+00:00",
                "2026-01-19T09:00:00+00:00",
                "2026-01-26T09:00:00+00:00",
            ]),
            expected_len: None,
        },
        RecurrenceCase {
            name: "date_until_covers_its_whole_day",
            rule: "FREQ=DAILY;UNTIL=20260105",
            anchor: "2026-01-01T00:00:00",
            tzid: "Europe/Berlin",
            year: 2026,
            expected: Some(&[
                "2026-01-01T00:00:00+01:00",
                "2026-01-02T00:00:00+01:00",
                "2026-01-03T00:00:00+01:00",
                "2026-01-04T00:00:00+01:00",
                "2026-01-05T00:00:00+01:00",
            ]),
            expected_len: None,
        },
        RecurrenceCase {
            name: "floating_until_is_anchor_local",
            rule: "FREQ=WEEKLY;UNTIL=20260126T090000",
            anchor: "2026-01-05T09:00:00",
            tzid: "America/New_York",
            year: 2026,
            expected: Some(&[
                "2026-01-05T09:00:00-05:00",
                "2026-01-12T09:00:00-05:00",
                "2026-01-19T09:00:00-05:00",
                "2026-01-26T09:00:00-05:00",
            ]),
            expected_len: None,
        },
        RecurrenceCase {
            name: "dst_berlin_keeps_wall_clock",
            rule: "FREQ=DAILY;COUNT=3",
            anchor: "2026-03-28T09:00:00",
            tzid: "Europe/Berlin",
            year: 2026,
            expected: Some(&[
                "2026-03-28T09:00:00+01:00",
                "2026-03-29T09:00:00+02:00",
                "2026-03-30T09:00:00+02:00",
            ]),
            expected_len: None,
        },
        RecurrenceCase {
            name: "every_day_in_january",
            rule: "FREQ=YEARLY;BYMONTH=1;BYDAY=SU,MO,TU,WE,TH,FR,SA",
            anchor: "2025-01-01T09:00:00",
            tzid: "America/New_York",
            year: 2026,
            expected: None,
            expected_len: Some(31),
        },
        RecurrenceCase {
            name: "biweekly_wednesday",
            rule: "FREQ=WEEKLY;INTERVAL=2;BYDAY=WE",
            anchor: "2026-01-07T14:00:00",
            tzid: "UTC",
            year: 2026,
            expected: None,
            expected_len: Some(26),
        },
    ]
}

pub fn assert_case(case: &RecurrenceCase) {
    let tz: Tz = case
        .tzid
        .parse()
        .unwrap_or_else(|err| panic!("Bad zone in {}: {}", case.name, err));
    let naive = NaiveDateTime::parse_from_str(case.anchor, "%Y-%m-%dT%H:%M:%S")
        .unwrap_or_else(|err| panic!("Bad anchor in {}: {}", case.name, err));
    let anchor = tz
        .from_local_datetime(&naive)
        .single()
        .unwrap_or_else(|| panic!("Ambiguous anchor in {}", case.name));

    let expansion = RecurrenceExpander::default()
        .try_expand(case.rule, anchor, TimeDelta::hours(1), case.year)
        .unwrap_or_else(|err| panic!("Failed to expand {}: {}", case.name, err));

    let starts: Vec<_> = expansion.iter().collect();
    assert!(
        starts.iter().all(|start| start.year() == case.year),
        "Case {} leaked occurrences outside {}",
        case.name,
        case.year
    );

    if let Some(expected) = case.expected {
        let actual: Vec<i64> = starts.iter().map(DateTime::timestamp).collect();
        let expected: Vec<i64> = expected
            .iter()
            .map(|value| parse_rfc3339(value).timestamp())
            .collect();
        assert_eq!(actual, expected, "Case {} did not match", case.name);
    }

    if let Some(expected_len) = case.expected_len {
        assert_eq!(
            starts.len(),
            expected_len,
            "Case {} expected {} occurrences",
            case.name,
            expected_len
        );
    }
}

fn parse_rfc3339(value: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(value)
        .unwrap_or_else(|err| panic!("Failed to parse rfc3339 value {value}: {err}"))
}
