//! # Conversion Rate Chart Library
//!
//! `convchart` turns per-day visit and conversion counts of an experiment's
//! variations into a navigable conversion-rate chart.
//!
//! ## Features
//!
//! - Daily or weekly (week-of-month) aggregation
//! - Conversion-rate projection per variation
//! - Filtering down to a single variation
//! - Zoomable viewport with point selection and a tooltip
//! - Line, smooth and area rendering to PNG
//! - Asynchronous PNG export that rejects overlapping requests
//!
//! ## Example
//!
//! ```no_run
//! use convchart::{ChartData, ChartState, VariationSelection};
//!
//! let data = ChartData::from_path("data/sample_data.json")?;
//! let mut chart = ChartState::new(data)?;
//! chart.set_variation(VariationSelection::All)?;
//! chart.zoom_in();
//! let png = convchart::plotting::render_png(
//!     &chart.scene(),
//!     1200,
//!     600,
//!     &Default::default(),
//!     &Default::default(),
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod analysis;
pub mod app;
pub mod config;
pub mod error;
pub mod plotting;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use app::{ChartState, Viewport};
pub use config::ChartConfig;
pub use error::{ChartError, ExportError};
pub use types::{ChartData, ChartKind, DateMode, Granularity, RatePoint, VariationSelection};
