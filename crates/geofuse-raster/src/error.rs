//! Error types for raster operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, merging, or sampling rasters.
#[derive(Debug, Error)]
pub enum RasterError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF encoding or decoding error.
    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    /// The file decodes but is not a usable georeferenced raster.
    #[error("invalid GeoTIFF: {0}")]
    InvalidGeoTiff(String),

    /// A merge source could not be opened.
    #[error("failed to open source raster {}: {reason}", path.display())]
    SourceOpen {
        /// Path of the unreadable source.
        path: PathBuf,
        /// Stringified cause.
        reason: String,
    },

    /// Merge was called with no input rasters.
    #[error("no input rasters to merge")]
    EmptyInput,

    /// Sample was called with a zero stride.
    #[error("sample stride must be at least 1")]
    StrideInvalid,
}
