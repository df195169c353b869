//! # Error Types
//!
//! Derivations over a well-formed document are total; these errors only come
//! out of loading the document, formatting malformed date keys and the export
//! boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading chart data or deriving labels from it.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to read chart data from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid chart data document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed date key `{0}`")]
    MalformedDate(String),

    #[error("variation name `{0}` is used by more than one variation")]
    DuplicateVariationName(String),

    #[error("unknown variation `{0}`")]
    UnknownVariation(String),

    #[error("unknown option `{value}` for {kind}")]
    UnknownOption { kind: &'static str, value: String },
}

/// Errors raised by the PNG export path.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("raster snapshot failed: {0}")]
    Raster(String),

    #[error("failed to save {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("export task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T, E = ChartError> = std::result::Result<T, E>;
