//! Pipeline-level error type.

use geofuse_common::{BoundsError, HttpError};
use geofuse_locator::LocateError;
use geofuse_raster::RasterError;
use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// Per-item download failures never surface here; they stay inside the fetch
/// report. Only structural failures stop the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// I/O error managing the output area.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The target area could not be turned into a bounding box.
    #[error(transparent)]
    Bounds(#[from] BoundsError),

    /// Resource location failed.
    #[error(transparent)]
    Locate(#[from] LocateError),

    /// Merging or sampling failed.
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// The HTTP client could not be constructed.
    #[error(transparent)]
    Http(#[from] HttpError),
}
