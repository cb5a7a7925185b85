//! Error types for webmap operations.

use thiserror::Error;

/// Errors surfaced by map and vector-loading operations.
///
/// Every error is fatal to the call that produced it; there is no retry or
/// partial-result handling anywhere in the crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid vector input: {0}")]
    InvalidInput(String),

    #[error("unknown basemap: '{0}'")]
    UnknownBasemap(String),

    #[error("unknown Google map type: '{0}'")]
    UnknownMapType(String),

    #[error("unsupported file extension: '{0}'")]
    UnsupportedExtension(String),

    #[error("unsupported coordinate reference system: {0}")]
    UnsupportedCrs(String),

    #[error("GeoJSON error: {0}")]
    Geojson(#[from] geojson::Error),

    #[error("shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    #[error("dBase error: {0}")]
    Dbase(#[from] shapefile::dbase::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
