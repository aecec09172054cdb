//! Plain-text rendering of a week view.

use focal_core::constants::DAYS_PER_WEEK;
use focal_view::model::Component;
use focal_view::model::memory::MemoryCalendar;
use focal_view::state::WeekView;

/// `HH:MM`, with hours past midnight counting on from 24.
#[must_use]
pub fn format_minutes(minutes: i32) -> String {
    format!("{:02}:{:02}", minutes.div_euclid(60), minutes.rem_euclid(60))
}

/// ## Summary
/// Renders the shown week as an agenda, one block per day. Timed
/// occurrences are listed by start time and the current time is marked
/// when it falls inside the week.
#[must_use]
pub fn render_week(view: &WeekView<MemoryCalendar>) -> String {
    let window = view.window();
    let now = view.now();
    let mut lines = Vec::new();

    let last_day = window.date_of(DAYS_PER_WEEK - 1).unwrap_or(window.first_day());
    lines.push(format!(
        "Week {}, {} ({} to {}, {})",
        window.week(),
        window.year(),
        window.first_day(),
        last_day,
        window.timezone()
    ));

    for day in 0..DAYS_PER_WEEK {
        let Some(date) = window.date_of(day) else {
            continue;
        };
        let today = now.within_shown_range && now.day == day;
        lines.push(String::new());
        lines.push(format!(
            "{}{}",
            date.format("%a %d %b"),
            if today { "  (today)" } else { "" }
        ));

        for occurrence in view.all_day(day) {
            lines.push(format!(
                "  all day      {} [{}]",
                occurrence.event.summary(),
                occurrence.calendar.name()
            ));
        }

        let mut timed: Vec<_> = view.occurrences(day).collect();
        timed.sort_by_key(|occurrence| (occurrence.minute_from, occurrence.minute_to));

        let mut marker_pending = today;
        for occurrence in timed {
            if marker_pending && occurrence.minute_from > now.minutes {
                lines.push(now_line(now.minutes));
                marker_pending = false;
            }
            lines.push(format!(
                "  {}-{}  {} [{}]",
                format_minutes(occurrence.minute_from),
                format_minutes(occurrence.minute_to),
                occurrence.event.summary(),
                occurrence.calendar.name()
            ));
        }
        if marker_pending {
            lines.push(now_line(now.minutes));
        }
    }

    lines.join("\n")
}

fn now_line(minutes: i32) -> String {
    format!("  --- now {} ---", format_minutes(minutes))
}
