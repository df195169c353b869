//! Visible window and point selection over the filtered series.
//!
//! Bounds are inclusive indices into the series. For a non-empty series
//! `0 <= start <= end <= len - 1` holds after every operation and the window
//! never shrinks below two points once the series has two. An empty series
//! keeps the degenerate `[0, 0]` bounds with both zoom directions disabled.

use log::debug;
use std::ops::Range;

use crate::types::RatePoint;

const MIN_WINDOW: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    start: usize,
    end: usize,
    series_len: usize,
    selected_index: usize,
    is_point_selected: bool,
}

impl Viewport {
    /// Full window over a series of `series_len` points, nothing selected.
    pub fn new(series_len: usize) -> Self {
        Self {
            start: 0,
            end: series_len.saturating_sub(1),
            series_len,
            selected_index: 0,
            is_point_selected: false,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn series_len(&self) -> usize {
        self.series_len
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn is_point_selected(&self) -> bool {
        self.is_point_selected
    }

    /// Number of visible points.
    pub fn window_len(&self) -> usize {
        if self.series_len == 0 {
            0
        } else {
            self.end - self.start + 1
        }
    }

    /// Visible indices as a half-open range, empty for an empty series.
    pub fn visible_range(&self) -> Range<usize> {
        if self.series_len == 0 {
            0..0
        } else {
            self.start..self.end + 1
        }
    }

    pub fn can_zoom_in(&self) -> bool {
        self.window_len() as i64 > MIN_WINDOW
    }

    pub fn can_zoom_out(&self) -> bool {
        !(self.start == 0 && self.end as i64 >= self.max_end())
    }

    /// Select the point whose date equals `date_key`. A miss leaves the
    /// previous selection untouched and returns `false`.
    pub fn select_point(&mut self, date_key: &str, series: &[RatePoint]) -> bool {
        match series.iter().position(|point| point.date == date_key) {
            Some(index) => {
                self.selected_index = index;
                self.is_point_selected = true;
                debug!("selected point {} ({})", index, date_key);
                true
            }
            None => {
                debug!("no point for date key {}, selection kept", date_key);
                false
            }
        }
    }

    /// Show the whole series and clear the selection flag. The selected index
    /// is kept so a later zoom still centers on it.
    pub fn reset(&mut self) {
        self.start = 0;
        self.end = self.series_len.saturating_sub(1);
        self.is_point_selected = false;
    }

    /// Shrink the window by a fifth around the selected index.
    pub fn zoom_in(&mut self) -> bool {
        if !self.can_zoom_in() {
            return false;
        }
        let max_end = self.max_end();
        let new_len = (self.window_len() as i64 * 4 / 5).max(MIN_WINDOW);
        let (mut start, mut end) = self.centered(new_len);

        if start < 0 {
            start = 0;
            end = max_end.min(new_len - 1);
        }
        if end > max_end {
            end = max_end;
            start = (max_end - new_len + 1).max(0);
        }
        if end - start < 1 {
            return false;
        }

        self.set_window(start, end);
        true
    }

    /// Grow the window by a quarter around the selected index, capped at the
    /// full series.
    pub fn zoom_out(&mut self) -> bool {
        if !self.can_zoom_out() {
            return false;
        }
        let max_end = self.max_end();
        let current = self.window_len() as i64;
        let new_len = (max_end + 1).min((current * 5 + 3) / 4);
        let (mut start, mut end) = self.centered(new_len);

        // Unlike zoom_in, hitting the left edge keeps one extra point.
        if start <= 0 {
            start = 0;
            end = max_end.min(new_len);
        }
        if end > max_end {
            end = max_end;
            start = (end - new_len).max(0);
        }

        self.set_window(start, end);
        true
    }

    pub fn can_pan_left(&self) -> bool {
        self.series_len > 0 && self.start > 0
    }

    pub fn can_pan_right(&self) -> bool {
        self.series_len > 0 && (self.end as i64) < self.max_end()
    }

    /// Slide the window by `delta` points, keeping its length. Positive moves
    /// towards later dates. The window stops at either end of the series and
    /// the selection is left alone.
    pub fn pan(&mut self, delta: i64) -> bool {
        if self.series_len == 0 || delta == 0 {
            return false;
        }
        let len = self.window_len() as i64;
        let start = (self.start as i64 + delta).clamp(0, self.max_end() - len + 1);
        if start == self.start as i64 {
            return false;
        }
        self.set_window(start, start + len - 1);
        true
    }

    fn max_end(&self) -> i64 {
        self.series_len as i64 - 1
    }

    /// Window of `len` points centered on the selection; even lengths lean left.
    fn centered(&self, len: i64) -> (i64, i64) {
        let focus = self.selected_index as i64;
        let half = len / 2;
        let start = focus - half;
        let end = if len % 2 == 0 { start + len - 1 } else { focus + half };
        (start, end)
    }

    fn set_window(&mut self, start: i64, end: i64) {
        debug!(
            "viewport [{}, {}] -> [{}, {}] of {}",
            self.start, self.end, start, end, self.series_len
        );
        self.start = start as usize;
        self.end = end as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn series(len: usize) -> Vec<RatePoint> {
        (0..len).map(|i| RatePoint::new(format!("d{}", i))).collect()
    }

    fn bounds(viewport: &Viewport) -> (usize, usize) {
        (viewport.start(), viewport.end())
    }

    fn selected_at(len: usize, index: usize) -> Viewport {
        let mut viewport = Viewport::new(len);
        assert!(viewport.select_point(&format!("d{}", index), &series(len)));
        viewport
    }

    #[test]
    fn test_new_covers_full_series() {
        let viewport = Viewport::new(10);
        assert_eq!(bounds(&viewport), (0, 9));
        assert_eq!(viewport.window_len(), 10);
        assert!(!viewport.can_zoom_out());
        assert!(viewport.can_zoom_in());
    }

    #[test]
    fn test_zoom_in_clamps_at_left_edge() {
        let mut viewport = Viewport::new(10);
        assert!(viewport.zoom_in());
        assert_eq!(bounds(&viewport), (0, 7));
        assert!(viewport.zoom_in());
        assert_eq!(bounds(&viewport), (0, 5));
    }

    #[test]
    fn test_zoom_in_even_window_leans_left() {
        let mut viewport = Viewport::new(10);
        viewport.zoom_in();
        viewport.zoom_in();
        assert!(viewport.select_point("d5", &series(10)));
        assert!(viewport.zoom_in());
        // 6 * 0.8 -> 4 points centered on 5: [3, 6].
        assert_eq!(bounds(&viewport), (3, 6));
    }

    #[test]
    fn test_zoom_in_clamps_at_right_edge() {
        let mut viewport = selected_at(10, 9);
        assert!(viewport.zoom_in());
        assert_eq!(bounds(&viewport), (2, 9));
    }

    #[test]
    fn test_zoom_out_walks_back_to_full() {
        let mut viewport = Viewport::new(10);
        viewport.zoom_in();
        viewport.zoom_in();
        viewport.select_point("d5", &series(10));
        viewport.zoom_in();

        let mut windows = Vec::new();
        while viewport.zoom_out() {
            windows.push(bounds(&viewport));
        }
        assert_eq!(windows, vec![(3, 7), (2, 8), (1, 9), (0, 9)]);
        assert!(!viewport.can_zoom_out());
    }

    #[test]
    fn test_zoom_out_left_edge_keeps_extra_point() {
        let mut viewport = selected_at(10, 1);
        viewport.zoom_in();
        viewport.zoom_in();
        viewport.zoom_in();
        assert_eq!(bounds(&viewport), (0, 3));

        assert!(viewport.zoom_out());
        // New length is 5 but the left clamp ends at index 5.
        assert_eq!(bounds(&viewport), (0, 5));
    }

    #[test]
    fn test_zoom_out_right_edge() {
        let mut viewport = selected_at(10, 9);
        viewport.zoom_in();
        assert!(viewport.zoom_out());
        assert_eq!(bounds(&viewport), (0, 9));
    }

    #[test]
    fn test_zoom_in_converges_to_two_points() {
        let mut viewport = selected_at(50, 20);
        let mut calls = 0;
        while viewport.zoom_in() {
            calls += 1;
            assert!(calls < 50, "zoom in never stopped");
        }
        assert_eq!(viewport.window_len(), 2);
        assert!(!viewport.can_zoom_in());
        let before = viewport;
        assert!(!viewport.zoom_in());
        assert_eq!(viewport, before);
    }

    #[test]
    fn test_select_point_miss_is_sticky() {
        let mut viewport = selected_at(5, 3);
        assert!(!viewport.select_point("missing", &series(5)));
        assert_eq!(viewport.selected_index(), 3);
        assert!(viewport.is_point_selected());
    }

    #[test]
    fn test_reset_restores_full_window() {
        let mut viewport = selected_at(12, 6);
        viewport.zoom_in();
        viewport.zoom_in();
        viewport.reset();
        assert_eq!(bounds(&viewport), (0, 11));
        assert!(!viewport.is_point_selected());
        assert_eq!(viewport.selected_index(), 6);
    }

    #[test]
    fn test_tiny_series_cannot_zoom() {
        for len in 0..=2 {
            let mut viewport = Viewport::new(len);
            assert!(!viewport.zoom_in(), "len {}", len);
            assert!(!viewport.zoom_out(), "len {}", len);
            assert_eq!(bounds(&viewport), (0, len.saturating_sub(1)));
        }
        assert_eq!(Viewport::new(0).visible_range(), 0..0);
        assert_eq!(Viewport::new(1).visible_range(), 0..1);
    }

    #[test]
    fn test_pan_keeps_length_and_clamps() {
        let mut viewport = selected_at(10, 5);
        viewport.zoom_in();
        viewport.zoom_in();
        assert_eq!(bounds(&viewport), (2, 7));
        assert!(viewport.can_pan_left() && viewport.can_pan_right());

        assert!(viewport.pan(1));
        assert_eq!(bounds(&viewport), (3, 8));
        assert!(viewport.pan(100));
        assert_eq!(bounds(&viewport), (4, 9));
        assert!(!viewport.can_pan_right());
        assert!(!viewport.pan(3));

        assert!(viewport.pan(-2));
        assert_eq!(bounds(&viewport), (2, 7));
        assert!(viewport.pan(-100));
        assert_eq!(bounds(&viewport), (0, 5));
        assert!(!viewport.can_pan_left());
        assert!(!viewport.pan(-1));

        // Panning never touches the selection.
        assert_eq!(viewport.selected_index(), 5);
        assert!(viewport.is_point_selected());
    }

    #[test]
    fn test_pan_full_or_empty_window_is_noop() {
        let mut full = Viewport::new(8);
        assert!(!full.pan(2));
        assert!(!full.pan(-2));
        assert_eq!(bounds(&full), (0, 7));

        let mut empty = Viewport::new(0);
        assert!(!empty.pan(1));
        assert!(!empty.can_pan_left() && !empty.can_pan_right());
        assert_eq!(bounds(&empty), (0, 0));
    }

    #[test]
    fn test_random_operations_keep_bounds() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for len in 0..40 {
            let points = series(len);
            let mut viewport = Viewport::new(len);
            for _ in 0..200 {
                let before = viewport.window_len();
                match rng.gen_range(0..5) {
                    0 => {
                        viewport.zoom_in();
                    }
                    1 => {
                        viewport.zoom_out();
                    }
                    2 => viewport.reset(),
                    3 => {
                        viewport.pan(rng.gen_range(-15..=15));
                        assert_eq!(viewport.window_len(), before, "pan changed the window length");
                    }
                    _ => {
                        let key = format!("d{}", rng.gen_range(0..len.max(1) + 1));
                        viewport.select_point(&key, &points);
                    }
                }

                if len == 0 {
                    assert_eq!(bounds(&viewport), (0, 0));
                    continue;
                }
                assert!(viewport.start() <= viewport.end());
                assert!(viewport.end() <= len - 1);
                assert!(viewport.selected_index() < len);
                if len >= 2 {
                    assert!(viewport.window_len() >= 2, "len {} window {:?}", len, bounds(&viewport));
                }
            }
        }
    }
}
