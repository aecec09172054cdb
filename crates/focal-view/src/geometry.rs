//! Pixel layout of the week grid.
//!
//! The grid has a header row, an optional all-day row, a sidebar with hour
//! labels and seven equally wide day columns. Timed content scrolls
//! vertically; one half hour is `HALFHOUR_HEIGHT` pixels tall.

use focal_core::constants::{
    ALLDAY_HEIGHT, DAYS_PER_WEEK, DEFAULT_SCROLL_POS, HALFHOUR_HEIGHT, HEADER_HEIGHT,
    SIDEBAR_WIDTH,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// What a pointer position lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Sidebar or beyond the last column.
    Outside,
    /// Header or all-day row of a column.
    AllDay { day: usize },
    /// The scrolled time grid. `minute` is minutes since midnight.
    Timed { day: usize, minute: i32 },
}

/// Current widget width and vertical scroll offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekGeometry {
    pub width: f64,
    pub scroll_pos: f64,
}

impl Default for WeekGeometry {
    fn default() -> Self {
        Self::new(800.0)
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "day indices and minutes are small"
)]
fn to_f64(value: usize) -> f64 {
    value as f64
}

impl WeekGeometry {
    #[must_use]
    pub const fn new(width: f64) -> Self {
        Self {
            width,
            scroll_pos: DEFAULT_SCROLL_POS,
        }
    }

    #[must_use]
    pub const fn with_scroll(mut self, scroll_pos: f64) -> Self {
        self.scroll_pos = scroll_pos;
        self
    }

    /// Top of the timed grid.
    #[must_use]
    pub fn day_begin(has_all_day: bool) -> f64 {
        HEADER_HEIGHT + if has_all_day { ALLDAY_HEIGHT } else { 0.0 }
    }

    #[must_use]
    pub fn column_width(&self) -> f64 {
        (self.width - SIDEBAR_WIDTH) / to_f64(DAYS_PER_WEEK)
    }

    #[must_use]
    pub fn column_x(&self, day: usize) -> f64 {
        to_f64(day) * self.column_width() + SIDEBAR_WIDTH
    }

    /// Full height of the scrollable grid.
    #[must_use]
    pub fn content_height(has_all_day: bool) -> f64 {
        24.0 * 2.0 * HALFHOUR_HEIGHT + if has_all_day { ALLDAY_HEIGHT } else { 0.0 }
    }

    #[must_use]
    pub fn minute_y(&self, minute: i32, has_all_day: bool) -> f64 {
        Self::day_begin(has_all_day) + f64::from(minute) * HALFHOUR_HEIGHT / 30.0 - self.scroll_pos
    }

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "values are bounds-checked before the cast"
    )]
    #[must_use]
    pub fn hit(&self, x: f64, y: f64, has_all_day: bool) -> HitTarget {
        if x < SIDEBAR_WIDTH || self.width <= SIDEBAR_WIDTH {
            return HitTarget::Outside;
        }
        let column = to_f64(DAYS_PER_WEEK) * (x - SIDEBAR_WIDTH) / (self.width - SIDEBAR_WIDTH);
        if column >= to_f64(DAYS_PER_WEEK) {
            return HitTarget::Outside;
        }
        let day = column.floor() as usize;

        let day_begin = Self::day_begin(has_all_day);
        if y < day_begin {
            return HitTarget::AllDay { day };
        }
        let minute = ((y - day_begin + self.scroll_pos) * 30.0 / HALFHOUR_HEIGHT).floor() as i32;
        HitTarget::Timed { day, minute }
    }

    #[must_use]
    pub fn occurrence_rect(
        &self,
        day: usize,
        minute_from: i32,
        minute_to: i32,
        has_all_day: bool,
    ) -> Rect {
        Rect {
            x: self.column_x(day),
            y: self.minute_y(minute_from, has_all_day),
            width: self.column_width(),
            height: f64::from(minute_to - minute_from) * HALFHOUR_HEIGHT / 30.0,
        }
    }

    #[must_use]
    pub fn all_day_rect(&self, day: usize) -> Rect {
        Rect {
            x: self.column_x(day),
            y: HEADER_HEIGHT,
            width: self.column_width(),
            height: ALLDAY_HEIGHT,
        }
    }

    /// Vertical position of the current-time line.
    #[must_use]
    pub fn now_marker_y(&self, minutes: i32, has_all_day: bool) -> f64 {
        self.minute_y(minutes, has_all_day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn geometry() -> WeekGeometry {
        // Columns of 100px
        WeekGeometry::new(SIDEBAR_WIDTH + 700.0).with_scroll(0.0)
    }

    #[test]
    fn sidebar_and_overflow_are_outside() {
        let g = geometry();
        assert_eq!(g.hit(10.0, 200.0, false), HitTarget::Outside);
        assert_eq!(g.hit(g.width + 1.0, 200.0, false), HitTarget::Outside);
    }

    #[test]
    fn hit_maps_columns_and_minutes() {
        let g = geometry();
        let y = HEADER_HEIGHT + 540.0;
        assert_eq!(
            g.hit(SIDEBAR_WIDTH + 150.0, y, false),
            HitTarget::Timed { day: 1, minute: 540 }
        );
        assert_eq!(
            g.hit(SIDEBAR_WIDTH + 5.0, HEADER_HEIGHT - 1.0, false),
            HitTarget::AllDay { day: 0 }
        );
        // The all-day row pushes the grid down
        assert_eq!(
            g.hit(SIDEBAR_WIDTH + 650.0, HEADER_HEIGHT + 10.0, true),
            HitTarget::AllDay { day: 6 }
        );
    }

    #[test]
    fn hit_accounts_for_scroll() {
        let g = geometry().with_scroll(DEFAULT_SCROLL_POS);
        assert_eq!(
            g.hit(SIDEBAR_WIDTH + 1.0, HEADER_HEIGHT, false),
            HitTarget::Timed { day: 0, minute: 410 }
        );
    }

    #[test]
    fn occurrence_rect_matches_hit() {
        let g = geometry();
        let rect = g.occurrence_rect(1, 540, 600, false);
        assert!((rect.x - (SIDEBAR_WIDTH + 100.0)).abs() < EPS);
        assert!((rect.y - (HEADER_HEIGHT + 540.0)).abs() < EPS);
        assert!((rect.height - 60.0).abs() < EPS);
        assert!((rect.width - 100.0).abs() < EPS);

        let inside = g.hit(rect.x + 1.0, rect.y + 1.0, false);
        assert_eq!(inside, HitTarget::Timed { day: 1, minute: 541 });
    }

    #[test]
    fn scrolled_rect_maps_back_to_its_minute() {
        let g = geometry().with_scroll(DEFAULT_SCROLL_POS);
        let rect = g.occurrence_rect(2, 600, 630, true);
        assert!(
            (rect.y - (HEADER_HEIGHT + ALLDAY_HEIGHT + 600.0 - DEFAULT_SCROLL_POS)).abs() < EPS
        );
        assert_eq!(
            g.hit(rect.x + 1.0, rect.y + 1.0, true),
            HitTarget::Timed { day: 2, minute: 601 }
        );
    }

    #[test]
    fn all_day_rect_sits_under_header() {
        let rect = geometry().all_day_rect(3);
        assert!((rect.y - HEADER_HEIGHT).abs() < EPS);
        assert!((rect.height - ALLDAY_HEIGHT).abs() < EPS);
    }

    #[test]
    fn content_and_marker_heights() {
        assert!((WeekGeometry::content_height(false) - 1440.0).abs() < EPS);
        assert!((WeekGeometry::content_height(true) - 1460.0).abs() < EPS);

        let g = geometry().with_scroll(60.0);
        assert!((g.now_marker_y(60, true) - (HEADER_HEIGHT + ALLDAY_HEIGHT)).abs() < EPS);
    }
}
