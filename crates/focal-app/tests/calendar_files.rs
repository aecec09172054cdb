use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use focal_app::fixture::{CalendarFixture, load_calendars};
use focal_app::render::render_week;
use focal_view::state::{ViewConfig, WeekView};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test_log::test]
fn calendar_file_populates_week() {
    let calendars = load_calendars(&[fixture_path("work.toml")]).expect("fixture loads");
    assert_eq!(calendars.len(), 1);
    assert_eq!(calendars[0].len(), 3);

    let now = Utc.with_ymd_and_hms(2026, 10, 19, 6, 0, 0).unwrap();
    let mut view = WeekView::new_at(ViewConfig::new(Tz::Europe__Berlin), now).unwrap();
    for calendar in calendars {
        view.add_calendar(calendar);
    }

    // Five standups, one call and one all-day offsite
    assert_eq!(view.len(), 7);
    assert!(view.has_all_day());

    // 10:00 EDT is 16:00 CEST
    let call = view.find_occurrence(2, 16 * 60 + 30).expect("call is placed");
    assert_eq!(call.event.summary, "Customer call");
    assert_eq!((call.minute_from, call.minute_to), (960, 1020));

    let text = render_week(&view);
    assert!(text.contains("09:00-09:15  Standup [Work]"));
    assert!(text.contains("all day      Offsite [Work]"));
}

#[test]
fn missing_fields_are_reported() {
    assert!(CalendarFixture::load(&fixture_path("broken.toml")).is_err());
    assert!(CalendarFixture::load(&fixture_path("missing.toml")).is_err());
}
