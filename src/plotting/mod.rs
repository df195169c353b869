pub mod chart;
pub mod export;
pub mod interpolate;
pub mod styles;
pub mod tooltip;


pub use chart::{brush_window, hit_test, render_png, ChartScene, PlotError};
pub use export::{DirectorySink, ExportOutcome, Exporter, ImageSink, RasterSource, SceneRaster};
pub use styles::{palette_color, ChartStyle, ChartTheme};
pub use tooltip::{Tooltip, TooltipEntry};
