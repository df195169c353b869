//! Top-level chart state.
//!
//! Inputs are the selected variation, the granularity and the chart kind.
//! Every input change re-derives, in order: the projected series (aggregated
//! first for weekly granularity, cached per granularity), the filtered series
//! and the y-axis ceiling. Only after that is complete does a variation or
//! granularity change replace the viewport, so zoom and selection never
//! outlive the series they index into.

use log::debug;
use std::sync::Arc;

use super::viewport::Viewport;
use crate::analysis::{filter_series, project_series, top_reference_line, SeriesCache};
use crate::error::{ChartError, Result};
use crate::plotting::{ChartScene, Tooltip};
use crate::types::{
    ChartData, ChartKind, DateMode, Granularity, RatePoint, VariationIndex, VariationSelection,
    ALL_VARIATIONS,
};
use crate::utils::{display_date, format_date};

pub struct ChartState {
    data: Arc<ChartData>,
    index: VariationIndex,
    variation_names: Vec<String>,
    variation: VariationSelection,
    granularity: Granularity,
    kind: ChartKind,
    cache: SeriesCache,
    filtered: Arc<Vec<RatePoint>>,
    top_reference_y: f64,
    viewport: Viewport,
}

impl ChartState {
    /// Build the state for a loaded document: first variation selected,
    /// daily granularity, smooth lines, full viewport.
    pub fn new(data: ChartData) -> Result<Self> {
        let index = VariationIndex::new(&data.variations)?;
        let variation_names = index.names();
        let variation = variation_names
            .first()
            .map(|name| VariationSelection::Single(name.clone()))
            .unwrap_or(VariationSelection::All);

        let mut state = Self {
            data: Arc::new(data),
            index,
            variation_names,
            variation,
            granularity: Granularity::Day,
            kind: ChartKind::Smooth,
            cache: SeriesCache::new(),
            filtered: Arc::new(Vec::new()),
            top_reference_y: 0.0,
            viewport: Viewport::new(0),
        };
        let projected = state.projected(Granularity::Day)?;
        state.refilter(&projected);
        state.reset_view();
        Ok(state)
    }

    pub fn data(&self) -> &ChartData {
        &self.data
    }

    pub fn variation(&self) -> &VariationSelection {
        &self.variation
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    /// Variation names in display order.
    pub fn variation_names(&self) -> &[String] {
        &self.variation_names
    }

    /// Choices offered by the variation selector: every name, then the sentinel.
    pub fn variation_options(&self) -> Vec<String> {
        let mut options = self.variation_names.clone();
        options.push(ALL_VARIATIONS.to_string());
        options
    }

    /// The series after variation filtering; the viewport indexes into this.
    pub fn filtered_series(&self) -> &Arc<Vec<RatePoint>> {
        &self.filtered
    }

    pub fn top_reference_y(&self) -> f64 {
        self.top_reference_y
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Switch the variation filter. Returns whether anything changed.
    pub fn set_variation(&mut self, selection: VariationSelection) -> Result<bool> {
        if let VariationSelection::Single(name) = &selection {
            if !self.index.contains_name(name) {
                return Err(ChartError::UnknownVariation(name.clone()));
            }
        }
        if selection == self.variation {
            return Ok(false);
        }

        let projected = self.projected(self.granularity)?;
        self.variation = selection;
        self.refilter(&projected);
        self.reset_view();
        Ok(true)
    }

    /// Switch between daily and weekly units. A projection failure leaves the
    /// current state untouched.
    pub fn set_granularity(&mut self, granularity: Granularity) -> Result<bool> {
        if granularity == self.granularity {
            return Ok(false);
        }

        let projected = self.projected(granularity)?;
        self.granularity = granularity;
        self.refilter(&projected);
        self.reset_view();
        Ok(true)
    }

    /// Change how the series are painted; the viewport is kept.
    pub fn set_kind(&mut self, kind: ChartKind) -> bool {
        let changed = kind != self.kind;
        self.kind = kind;
        changed
    }

    /// Point click from the rendering surface.
    pub fn handle_point_click(&mut self, date_key: &str) -> bool {
        self.viewport.select_point(date_key, &self.filtered)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.viewport.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.viewport.zoom_out()
    }

    pub fn reset_zoom(&mut self) {
        self.viewport.reset();
    }

    /// Slide the visible window by `delta` points.
    pub fn pan(&mut self, delta: i64) -> bool {
        self.viewport.pan(delta)
    }

    pub fn can_pan_left(&self) -> bool {
        self.viewport.can_pan_left()
    }

    pub fn can_pan_right(&self) -> bool {
        self.viewport.can_pan_right()
    }

    pub fn can_zoom_in(&self) -> bool {
        self.viewport.can_zoom_in()
    }

    pub fn can_zoom_out(&self) -> bool {
        self.viewport.can_zoom_out()
    }

    /// Date key at the selected index, whether or not the selection flag is set.
    pub fn selected_date(&self) -> Option<&str> {
        self.filtered
            .get(self.viewport.selected_index())
            .map(|point| point.date.as_str())
    }

    pub fn is_point_selected(&self) -> bool {
        self.viewport.is_point_selected()
    }

    /// Format a date key for the current granularity.
    pub fn format_date(&self, date_key: &str, mode: DateMode) -> Result<String> {
        format_date(date_key, mode, self.granularity)
    }

    /// Tooltip for the selected point, when a point is selected.
    pub fn tooltip(&self) -> Option<Tooltip> {
        if !self.viewport.is_point_selected() {
            return None;
        }
        self.filtered
            .get(self.viewport.selected_index())
            .map(|point| self.tooltip_for(point))
    }

    /// Tooltip for whichever point carries `date_key`, selected or not.
    pub fn tooltip_at(&self, date_key: &str) -> Option<Tooltip> {
        self.filtered
            .iter()
            .find(|point| point.date == date_key)
            .map(|point| self.tooltip_for(point))
    }

    fn tooltip_for(&self, point: &RatePoint) -> Tooltip {
        let title = display_date(&point.date, DateMode::Full, self.granularity);
        Tooltip::for_point(point, &self.variation_names, title)
    }

    /// Snapshot of the visible window for the renderer.
    pub fn scene(&self) -> ChartScene {
        let range = self.viewport.visible_range();
        ChartScene {
            first_index: range.start,
            points: self.filtered[range].to_vec(),
            series_len: self.filtered.len(),
            variation_names: self.variation_names.clone(),
            top_reference_y: self.top_reference_y,
            kind: self.kind,
            granularity: self.granularity,
            selected: self
                .viewport
                .is_point_selected()
                .then(|| self.viewport.selected_index()),
        }
    }

    fn projected(&mut self, granularity: Granularity) -> Result<Arc<Vec<RatePoint>>> {
        let data = &self.data;
        let index = &self.index;
        self.cache.get_or_try_insert_with(granularity, || {
            debug!("projecting {} series", granularity);
            project_series(granularity, &data.data, index)
        })
    }

    fn refilter(&mut self, projected: &Arc<Vec<RatePoint>>) {
        self.filtered = filter_series(projected, &self.variation);
        let columns = match &self.variation {
            VariationSelection::All => self.variation_names.clone(),
            VariationSelection::Single(name) => vec![name.clone()],
        };
        self.top_reference_y = top_reference_line(&self.filtered, &columns);
        debug!(
            "{} / {}: {} points, ceiling {}",
            self.variation,
            self.granularity,
            self.filtered.len(),
            self.top_reference_y
        );
    }

    fn reset_view(&mut self) {
        self.viewport = Viewport::new(self.filtered.len());
    }
}
