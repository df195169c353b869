//! User configuration.
//!
//! Read from `<config dir>/convchart/config.json`. Missing fields take their
//! defaults; a missing file means all defaults.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ChartError, Result};
use crate::plotting::export::{DEFAULT_EXPORT_FILENAME, DEFAULT_SETTLE_DELAY};

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_DATA_PATH: &str = "data/sample_data.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Chart document opened when none is given on the command line.
    pub data_path: PathBuf,
    pub export_filename: String,
    pub export_dir: PathBuf,
    /// Time given to the surface to settle before the export snapshot.
    pub export_delay_ms: u64,
    /// Size of the exported PNG.
    pub raster_size: (u32, u32),
    /// Size of the on-screen chart image.
    pub preview_size: (u32, u32),
    pub dark_theme: bool,
}

impl ChartConfig {
    /// Standard location of the config file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("convchart").join(CONFIG_FILE_NAME))
    }

    /// Load from the standard location, falling back to defaults when there
    /// is no config file.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_path(&path),
            _ => {
                debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ChartError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn export_delay(&self) -> Duration {
        Duration::from_millis(self.export_delay_ms)
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
            export_dir: dirs::picture_dir().unwrap_or_else(|| PathBuf::from(".")),
            export_delay_ms: DEFAULT_SETTLE_DELAY.as_millis() as u64,
            raster_size: (1200, 600),
            preview_size: (900, 450),
            dark_theme: true,
        }
    }
}
