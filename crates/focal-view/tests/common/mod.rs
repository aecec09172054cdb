use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use focal_core::types::Rgba;
use focal_rfc::ical::core::EventTime;
use focal_view::model::memory::MemoryCalendar;
use focal_view::state::{ViewConfig, WeekView};

/// Monday of week 43, 2026
pub fn monday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 7, 0, 0)
        .single()
        .expect("valid instant")
}

pub fn view_in(timezone: Tz) -> WeekView<MemoryCalendar> {
    WeekView::new_at(ViewConfig::new(timezone), monday()).expect("view should build")
}

pub fn calendar(name: &str) -> MemoryCalendar {
    MemoryCalendar::new(name, Rgba::from_hex("#3465a4").expect("valid color"))
}

pub fn time(value: &str) -> EventTime {
    EventTime::parse(value, None).expect("valid event time")
}

pub fn zoned(value: &str, tzid: &str) -> EventTime {
    EventTime::parse(value, Some(tzid)).expect("valid event time")
}

/// `(day, minute_from, minute_to)` of every timed record, day by day
pub fn timed_records(view: &WeekView<MemoryCalendar>) -> Vec<(usize, i32, i32)> {
    (0..7)
        .flat_map(|day| {
            view.occurrences(day)
                .map(move |o| (day, o.minute_from, o.minute_to))
        })
        .collect()
}
