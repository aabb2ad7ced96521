//! Horizontal virtual scrolling over the day strip
//!
//! All measurements are in host units (pixels in a browser, terminal columns
//! in the TUI). The position is kept in `0..=max_position()` at all times.

use tracing::trace;

pub const DEFAULT_SCROLL_STEP: f64 = 120.0;

/// Thumb never shrinks below this share of the track
pub const MIN_THUMB_PERCENT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ThumbDrag {
    start_x: f64,
    start_position: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportScroller {
    position: f64,
    container_width: f64,
    content_width: f64,
    /// Width of each period along the strip (months in year view)
    period_widths: Vec<f64>,
    current_period: usize,
    scroll_step: f64,
    thumb_drag: Option<ThumbDrag>,
}

impl Default for ViewportScroller {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_STEP)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl ViewportScroller {
    pub fn new(scroll_step: f64) -> Self {
        Self {
            position: 0.0,
            container_width: 0.0,
            content_width: 0.0,
            period_widths: Vec::new(),
            current_period: 0,
            scroll_step: finite_or_zero(scroll_step).max(0.0),
            thumb_drag: None,
        }
    }

    /// Measure the strip and re-clamp the position
    pub fn recompute_dimensions(&mut self, container_width: f64, total_days: usize, cell_width: f64) {
        self.container_width = finite_or_zero(container_width).max(0.0);
        self.content_width = total_days as f64 * finite_or_zero(cell_width).max(0.0);
        trace!(
            "SCROLL: container={} content={} max={}",
            self.container_width,
            self.content_width,
            self.max_position()
        );
        self.set_position(self.position);
        self.update_current_period();
    }

    /// Replace the period layout (e.g. the twelve month widths of a year)
    pub fn set_period_widths(&mut self, widths: Vec<f64>) {
        self.period_widths = widths.into_iter().map(|w| finite_or_zero(w).max(0.0)).collect();
        self.update_current_period();
    }

    pub fn period_widths(&self) -> &[f64] {
        &self.period_widths
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    pub fn content_width(&self) -> f64 {
        self.content_width
    }

    pub fn max_position(&self) -> f64 {
        (self.content_width - self.container_width).max(0.0)
    }

    pub fn scroll_step(&self) -> f64 {
        self.scroll_step
    }

    pub fn current_period(&self) -> usize {
        self.current_period
    }

    pub fn scroll_to(&mut self, target: f64) {
        self.set_position(target);
        self.update_current_period();
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_to(self.position + finite_or_zero(delta));
    }

    pub fn scroll_left(&mut self) {
        self.scroll_by(-self.scroll_step);
    }

    pub fn scroll_right(&mut self) {
        self.scroll_by(self.scroll_step);
    }

    fn set_position(&mut self, target: f64) {
        self.position = if target.is_nan() {
            0.0
        } else {
            target.clamp(0.0, self.max_position())
        };
    }

    /// Center period `index` using the stored period widths
    pub fn center_on_period(&mut self, index: usize) {
        let widths = self.period_widths.clone();
        self.center_on_period_with(index, |i| widths.get(i).copied().unwrap_or(0.0));
    }

    /// Center period `index` given a width function for every period
    ///
    /// The offset is the total width of the preceding periods, shifted left
    /// by half the slack between container and period width, then clamped.
    pub fn center_on_period_with<F>(&mut self, index: usize, period_width: F)
    where
        F: Fn(usize) -> f64,
    {
        let offset: f64 = (0..index).map(&period_width).sum();
        let width = period_width(index);
        let target = offset - (self.container_width - width) / 2.0;
        trace!("SCROLL: centering period {} at {}", index, target);
        self.scroll_to(target);
    }

    /// Period whose midpoint the scroll position has not yet passed
    ///
    /// Falls back to the last period when the position is past every
    /// midpoint, and to 0 when no periods are laid out.
    pub fn current_period_from_position(&self) -> usize {
        let mut accumulated = 0.0;
        for (i, width) in self.period_widths.iter().enumerate() {
            if self.position < accumulated + width / 2.0 {
                return i;
            }
            accumulated += width;
        }
        self.period_widths.len().saturating_sub(1)
    }

    fn update_current_period(&mut self) {
        self.current_period = self.current_period_from_position();
    }

    fn last_period(&self) -> Option<usize> {
        self.period_widths.len().checked_sub(1)
    }

    pub fn can_scroll_previous(&self) -> bool {
        self.current_period > 0
    }

    pub fn can_scroll_next(&self) -> bool {
        self.last_period().map_or(false, |last| self.current_period < last)
    }

    /// Step back one period. Returns false at the first period.
    pub fn previous_period(&mut self) -> bool {
        if !self.can_scroll_previous() {
            return false;
        }
        self.current_period -= 1;
        self.center_on_period(self.current_period);
        true
    }

    /// Step forward one period. Returns false at the last period.
    pub fn next_period(&mut self) -> bool {
        if !self.can_scroll_next() {
            return false;
        }
        self.current_period += 1;
        self.center_on_period(self.current_period);
        true
    }

    /// Center `index`, clamped to the laid-out periods
    pub fn go_to_period(&mut self, index: usize) -> bool {
        match self.last_period() {
            Some(last) => {
                self.center_on_period(index.min(last));
                true
            }
            None => false,
        }
    }

    /// Thumb width as a percentage of the track
    pub fn thumb_width_percent(&self) -> f64 {
        if self.container_width <= 0.0
            || self.content_width <= 0.0
            || self.content_width <= self.container_width
        {
            return 100.0;
        }
        (self.container_width / self.content_width * 100.0).max(MIN_THUMB_PERCENT)
    }

    /// Thumb offset as a percentage of the track
    pub fn thumb_position_percent(&self) -> f64 {
        let max = self.max_position();
        if max <= 0.0 {
            return 0.0;
        }
        let pct = self.position / max * (100.0 - self.thumb_width_percent());
        finite_or_zero(pct)
    }

    pub fn begin_thumb_drag(&mut self, x: f64) {
        self.thumb_drag = Some(ThumbDrag {
            start_x: finite_or_zero(x),
            start_position: self.position,
        });
    }

    /// Map the pointer's travel since [`begin_thumb_drag`](Self::begin_thumb_drag)
    /// onto the scroll range. No-op when no thumb drag is in progress.
    pub fn drag_thumb_to(&mut self, x: f64) -> bool {
        let Some(drag) = self.thumb_drag else {
            return false;
        };
        if self.container_width <= 0.0 {
            return false;
        }
        let ratio = (finite_or_zero(x) - drag.start_x) / self.container_width;
        self.scroll_to(drag.start_position + ratio * self.max_position());
        true
    }

    pub fn end_thumb_drag(&mut self) -> bool {
        self.thumb_drag.take().is_some()
    }

    pub fn is_dragging_thumb(&self) -> bool {
        self.thumb_drag.is_some()
    }

    /// Half-open range of item indices (of width `cell_width`) that
    /// intersect the viewport
    pub fn visible_range(&self, cell_width: f64, total: usize) -> std::ops::Range<usize> {
        if cell_width <= 0.0 || !cell_width.is_finite() || total == 0 {
            return 0..0;
        }
        let first = (self.position / cell_width).floor() as usize;
        let end = ((self.position + self.container_width) / cell_width).ceil() as usize;
        first.min(total)..end.min(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::period::month_lengths;

    fn year_scroller(container: f64) -> ViewportScroller {
        let mut scroller = ViewportScroller::default();
        scroller.recompute_dimensions(container, 365, 24.0);
        scroller.set_period_widths(month_lengths(2025).iter().map(|d| *d as f64 * 24.0).collect());
        scroller
    }

    #[test]
    fn test_max_position() {
        let scroller = year_scroller(800.0);
        assert_eq!(scroller.content_width(), 8760.0);
        assert_eq!(scroller.max_position(), 7960.0);
    }

    #[test]
    fn test_scroll_to_clamps() {
        let mut scroller = year_scroller(800.0);
        scroller.scroll_to(-50.0);
        assert_eq!(scroller.position(), 0.0);
        scroller.scroll_to(999_999.0);
        assert_eq!(scroller.position(), 7960.0);
        scroller.scroll_to(f64::NAN);
        assert_eq!(scroller.position(), 0.0);
    }

    #[test]
    fn test_scroll_by_steps() {
        let mut scroller = year_scroller(800.0);
        scroller.scroll_right();
        scroller.scroll_right();
        assert_eq!(scroller.position(), 240.0);
        scroller.scroll_left();
        scroller.scroll_left();
        scroller.scroll_left();
        assert_eq!(scroller.position(), 0.0);
    }

    #[test]
    fn test_center_stays_in_range_for_every_month() {
        let mut scroller = year_scroller(800.0);
        for month in 0..12 {
            scroller.center_on_period(month);
            let pos = scroller.position();
            assert!((0.0..=scroller.max_position()).contains(&pos), "month {}", month);
        }

        scroller.center_on_period(0);
        assert_eq!(scroller.position(), 0.0);
        scroller.center_on_period(11);
        assert_eq!(scroller.position(), 7960.0);
        assert_eq!(scroller.current_period(), 11);
    }

    #[test]
    fn test_center_middle_month() {
        let mut scroller = year_scroller(800.0);
        // June starts after 151 days; 30 days wide
        scroller.center_on_period(5);
        let expected = 151.0 * 24.0 - (800.0 - 720.0) / 2.0;
        assert_eq!(scroller.position(), expected);
        assert_eq!(scroller.current_period(), 5);
    }

    #[test]
    fn test_current_period_uses_midpoints() {
        let mut scroller = year_scroller(800.0);
        // January is 744 wide, midpoint 372
        scroller.scroll_to(371.0);
        assert_eq!(scroller.current_period(), 0);
        scroller.scroll_to(372.0);
        assert_eq!(scroller.current_period(), 1);
    }

    #[test]
    fn test_month_navigation_bounds() {
        let mut scroller = year_scroller(800.0);
        assert!(!scroller.can_scroll_previous());
        assert!(!scroller.previous_period());

        assert!(scroller.go_to_period(40));
        assert_eq!(scroller.current_period(), 11);
        assert!(!scroller.can_scroll_next());
        assert!(!scroller.next_period());

        assert!(scroller.previous_period());
        assert_eq!(scroller.current_period(), 10);
    }

    #[test]
    fn test_navigation_without_periods_is_a_no_op() {
        let mut scroller = ViewportScroller::default();
        scroller.recompute_dimensions(800.0, 31, 24.0);
        assert!(!scroller.go_to_period(3));
        assert!(!scroller.next_period());
        assert_eq!(scroller.current_period(), 0);
    }

    #[test]
    fn test_thumb_geometry() {
        let mut scroller = year_scroller(2190.0);
        let width = scroller.thumb_width_percent();
        assert!((width - 25.0).abs() < 1e-9);
        assert_eq!(scroller.thumb_position_percent(), 0.0);

        scroller.scroll_to(6570.0);
        assert!((scroller.thumb_position_percent() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_thumb_width_floor() {
        // 800 / 8760 is about 9.1%, below the floor
        let mut scroller = year_scroller(800.0);
        assert_eq!(scroller.thumb_width_percent(), MIN_THUMB_PERCENT);
        scroller.scroll_to(7960.0);
        assert!((scroller.thumb_position_percent() - (100.0 - MIN_THUMB_PERCENT)).abs() < 1e-9);

        scroller.recompute_dimensions(100.0, 365, 24.0);
        assert_eq!(scroller.thumb_width_percent(), MIN_THUMB_PERCENT);
    }

    #[test]
    fn test_nothing_to_scroll() {
        let mut scroller = ViewportScroller::default();
        scroller.recompute_dimensions(1000.0, 31, 24.0);
        assert_eq!(scroller.max_position(), 0.0);
        assert_eq!(scroller.thumb_width_percent(), 100.0);
        assert_eq!(scroller.thumb_position_percent(), 0.0);

        let unmeasured = ViewportScroller::default();
        assert_eq!(unmeasured.thumb_width_percent(), 100.0);
        assert_eq!(unmeasured.thumb_position_percent(), 0.0);
    }

    #[test]
    fn test_thumb_drag_maps_pointer_travel() {
        let mut scroller = year_scroller(800.0);
        assert!(!scroller.drag_thumb_to(10.0));

        scroller.begin_thumb_drag(100.0);
        assert!(scroller.drag_thumb_to(500.0));
        // 400 / 800 of the 7960 range
        assert_eq!(scroller.position(), 3980.0);

        scroller.drag_thumb_to(-10_000.0);
        assert_eq!(scroller.position(), 0.0);

        assert!(scroller.end_thumb_drag());
        assert!(!scroller.is_dragging_thumb());
    }

    #[test]
    fn test_shrinking_content_reclamps_position() {
        let mut scroller = year_scroller(800.0);
        scroller.scroll_to(5000.0);
        scroller.recompute_dimensions(800.0, 31, 24.0);
        assert_eq!(scroller.position(), 0.0);
    }

    #[test]
    fn test_visible_range() {
        let mut scroller = year_scroller(800.0);
        assert_eq!(scroller.visible_range(24.0, 365), 0..34);
        scroller.scroll_to(7960.0);
        assert_eq!(scroller.visible_range(24.0, 365), 331..365);
        assert_eq!(scroller.visible_range(0.0, 365), 0..0);
    }
}
