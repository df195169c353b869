//! PNG export: settle, snapshot, save.
//!
//! Only one export runs at a time. A trigger arriving while one is in flight
//! is dropped, not queued.

use futures::future::BoxFuture;
use futures::FutureExt;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::chart::{render_png, ChartScene};
use super::styles::{ChartStyle, ChartTheme};
use crate::error::ExportError;

pub const DEFAULT_EXPORT_FILENAME: &str = "myChart.png";
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Something that can produce a raster snapshot of the chart on demand.
pub trait RasterSource: Send + Sync {
    fn request_raster(&self) -> BoxFuture<'_, Result<Vec<u8>, ExportError>>;
}

/// Destination for exported image bytes.
pub trait ImageSink: Send + Sync {
    fn save(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, ExportError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved(PathBuf),
    /// The snapshot failed or came back empty; nothing was written.
    Skipped,
    /// Another export was already running.
    Busy,
}

/// Serializes export requests.
#[derive(Debug, Clone)]
pub struct Exporter {
    in_flight: Arc<AtomicBool>,
    settle_delay: Duration,
}

impl Exporter {
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            in_flight: Arc::new(AtomicBool::new(false)),
            settle_delay,
        }
    }

    /// Whether an export is currently running; the UI disables its trigger
    /// while this is set.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn export<R, S>(
        &self,
        source: &R,
        sink: &S,
        filename: &str,
    ) -> Result<ExportOutcome, ExportError>
    where
        R: RasterSource + ?Sized,
        S: ImageSink + ?Sized,
    {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            info!("export already in progress, ignoring request");
            return Ok(ExportOutcome::Busy);
        };

        // Give the surface a frame to commit pending style changes.
        tokio::time::sleep(self.settle_delay).await;

        let bytes = match source.request_raster().await {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => {
                warn!("raster snapshot was empty, skipping save");
                return Ok(ExportOutcome::Skipped);
            }
            Err(e) => {
                warn!("{}, skipping save", e);
                return Ok(ExportOutcome::Skipped);
            }
        };

        let path = sink.save(&bytes, filename)?;
        info!("exported chart to {}", path.display());
        Ok(ExportOutcome::Saved(path))
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE_DELAY)
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Renders a captured scene with plotters on the blocking pool.
pub struct SceneRaster {
    pub scene: ChartScene,
    pub width: u32,
    pub height: u32,
    pub theme: ChartTheme,
    pub style: ChartStyle,
}

impl RasterSource for SceneRaster {
    fn request_raster(&self) -> BoxFuture<'_, Result<Vec<u8>, ExportError>> {
        let scene = self.scene.clone();
        let (width, height, theme, style) = (self.width, self.height, self.theme, self.style);
        async move {
            tokio::task::spawn_blocking(move || render_png(&scene, width, height, &theme, &style))
                .await?
                .map_err(|e| ExportError::Raster(e.to_string()))
        }
        .boxed()
    }
}

/// Writes exported files into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ImageSink for DirectorySink {
    fn save(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, ExportError> {
        let path = self.dir.join(filename);
        std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(&path, bytes))
            .map_err(|source| ExportError::Save {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}
