/// Application name, used for the config file and environment prefix
pub const APP_NAME: &str = "focal";
pub const CONFIG_FILE_NAME: &str = const_str::concat!(APP_NAME, ".toml");
pub const CONFIG_ENV_PREFIX: &str = "FOCAL";

pub const DAYS_PER_WEEK: usize = 7;
pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// Seconds between two refreshes of the current-time marker
pub const NOW_REFRESH_INTERVAL_SECS: u64 = 120;

/// Upper bound on raw occurrences examined in one recurrence expansion pass
pub const DEFAULT_MAX_RECURRENCE_ITERATIONS: usize = 200_000;

/// Week view pixel geometry
pub const HEADER_HEIGHT: f64 = 35.5;
pub const ALLDAY_HEIGHT: f64 = 20.0;
pub const SIDEBAR_WIDTH: f64 = 25.5;
pub const HALFHOUR_HEIGHT: f64 = 30.0;
pub const DEFAULT_SCROLL_POS: f64 = 410.0;

/// Events created by double-click snap to this many minutes and last this long
pub const NEW_EVENT_SNAP_MINUTES: i32 = 15;
pub const NEW_EVENT_LENGTH_MINUTES: i64 = 30;
pub const NEW_EVENT_SUMMARY: &str = "New Event";
