use eframe::App as EApp;
use egui::TextureHandle;
use log::{error, warn};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::orchestrator::ChartState;
use crate::config::ChartConfig;
use crate::error::{ChartError, ExportError};
use crate::plotting::{
    hit_test, render_png, ChartStyle, ChartTheme, DirectorySink, ExportOutcome, Exporter,
    PlotError, SceneRaster, Tooltip,
};
use crate::types::{ChartKind, Granularity, VariationSelection};

/// Main application state
pub struct App {
    pub chart: ChartState,
    pub config: ChartConfig,
    pub theme: ChartTheme,
    pub style: ChartStyle,
    pub exporter: Exporter,
    pub plot_texture: Option<TextureHandle>,
    pub update_needed: bool,
    /// Drag distance, in points, not yet applied as a pan.
    drag_remainder: f64,
    pub status_message: Option<String>,
    pub error_message: Option<String>,
}

impl App {
    pub fn new(chart: ChartState, config: ChartConfig) -> Self {
        let theme = if config.dark_theme {
            ChartTheme::default()
        } else {
            ChartTheme::light()
        };
        Self {
            chart,
            exporter: Exporter::new(config.export_delay()),
            config,
            theme,
            style: ChartStyle::default(),
            plot_texture: None,
            update_needed: true,
            drag_remainder: 0.0,
            status_message: None,
            error_message: None,
        }
    }

    pub fn select_variation(&mut self, option: &str) {
        let result = self.chart.set_variation(VariationSelection::from(option));
        self.apply(result);
    }

    pub fn select_granularity(&mut self, granularity: Granularity) {
        let result = self.chart.set_granularity(granularity);
        self.apply(result);
    }

    pub fn select_kind(&mut self, kind: ChartKind) {
        self.update_needed |= self.chart.set_kind(kind);
    }

    pub fn zoom_in(&mut self) {
        self.update_needed |= self.chart.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.update_needed |= self.chart.zoom_out();
    }

    pub fn reset_zoom(&mut self) {
        self.chart.reset_zoom();
        self.update_needed = true;
    }

    pub fn set_dark_theme(&mut self, dark: bool) {
        if dark == self.config.dark_theme {
            return;
        }
        self.config.dark_theme = dark;
        self.theme = if dark {
            ChartTheme::default()
        } else {
            ChartTheme::light()
        };
        self.update_needed = true;
    }

    pub fn pan(&mut self, delta: i64) {
        self.update_needed |= self.chart.pan(delta);
    }

    /// Points moved by one press of a pan button.
    pub fn pan_step(&self) -> i64 {
        (self.chart.viewport().window_len() as i64 / 5).max(1)
    }

    /// Whether image row `y_px` falls on the range strip.
    pub fn in_brush(&self, y_px: f64) -> bool {
        y_px >= f64::from(self.style.brush_top(self.config.preview_size.1))
    }

    /// Drag across the preview by `dx_px` image pixels. On the range strip the
    /// window follows the pointer at series scale; on the plot the content
    /// follows it, so the window moves the other way at window scale.
    pub fn drag_by(&mut self, dx_px: f64, on_brush: bool) {
        let (left, right) = self.style.plot_x_span(self.config.preview_size.0);
        let span = right - left;
        let viewport = self.chart.viewport();
        let (points, direction) = if on_brush {
            (viewport.series_len(), 1.0)
        } else {
            (viewport.window_len(), -1.0)
        };
        if span <= 0.0 || points == 0 {
            return;
        }

        self.drag_remainder += direction * dx_px * points as f64 / span;
        let whole = self.drag_remainder.trunc();
        if whole != 0.0 {
            self.drag_remainder -= whole;
            self.pan(whole as i64);
        }
    }

    pub fn end_drag(&mut self) {
        self.drag_remainder = 0.0;
    }

    /// Tooltip for the point nearest to horizontal pixel `x_px`.
    pub fn hover_tooltip(&self, x_px: f64) -> Option<Tooltip> {
        let scene = self.chart.scene();
        let date = hit_test(&scene, x_px, self.config.preview_size.0, &self.style)?;
        self.chart.tooltip_at(date)
    }

    /// Click on the preview image at horizontal pixel `x_px` (image space).
    pub fn click_at(&mut self, x_px: f64) {
        let scene = self.chart.scene();
        let Some(date) = hit_test(&scene, x_px, self.config.preview_size.0, &self.style) else {
            return;
        };
        let date = date.to_string();
        self.update_needed |= self.chart.handle_point_click(&date);
    }

    /// Render the visible window at preview size.
    pub fn render_preview(&self) -> Result<Vec<u8>, PlotError> {
        let (width, height) = self.config.preview_size;
        render_png(&self.chart.scene(), width, height, &self.theme, &self.style)
    }

    /// Capture everything an export needs so it can run off the UI thread.
    pub fn export_job(&self) -> ExportJob {
        let (width, height) = self.config.raster_size;
        ExportJob {
            exporter: self.exporter.clone(),
            source: SceneRaster {
                scene: self.chart.scene(),
                width,
                height,
                theme: self.theme,
                style: self.style,
            },
            sink: DirectorySink::new(self.config.export_dir.clone()),
            filename: self.config.export_filename.clone(),
        }
    }

    pub fn finish_export(&mut self, result: Result<ExportOutcome, ExportError>) {
        match result {
            Ok(ExportOutcome::Saved(path)) => {
                self.status_message = Some(format!("Saved {}", path.display()));
            }
            Ok(ExportOutcome::Skipped) => {
                self.status_message = Some("Export skipped".to_string());
            }
            Ok(ExportOutcome::Busy) => {}
            Err(e) => {
                warn!("export failed: {}", e);
                self.error_message = Some(e.to_string());
            }
        }
    }

    fn apply(&mut self, result: Result<bool, ChartError>) {
        match result {
            Ok(changed) => {
                self.update_needed |= changed;
                self.error_message = None;
            }
            Err(e) => {
                warn!("{}", e);
                self.error_message = Some(e.to_string());
            }
        }
    }
}

/// A detached export request.
pub struct ExportJob {
    exporter: Exporter,
    source: SceneRaster,
    sink: DirectorySink,
    filename: String,
}

impl ExportJob {
    pub fn target(&self) -> PathBuf {
        self.sink.dir().join(&self.filename)
    }

    pub async fn run(self) -> Result<ExportOutcome, ExportError> {
        self.exporter
            .export(&self.source, &self.sink, &self.filename)
            .await
    }
}

/// Thread-safe wrapper around App for use with eframe
pub struct AppWrapper {
    pub app: Arc<Mutex<App>>,
}

impl EApp for AppWrapper {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Ok(mut app) = self.app.lock() {
            super::ui::draw_ui(&mut app, ctx, Arc::clone(&self.app));
        } else {
            error!("Failed to acquire app lock in update");
        }
    }
}
