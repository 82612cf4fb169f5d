//! Error types for the locator.

use geofuse_common::{DescriptionError, HttpError};
use thiserror::Error;

/// Errors that can occur while locating resources.
#[derive(Debug, Error)]
pub enum LocateError {
    /// A remote catalog answered with a non-success status.
    #[error("backend unavailable: HTTP {status} from {url}")]
    BackendUnavailable {
        /// Queried URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// A catalog request never produced a response.
    #[error("request to {url} failed: {reason}")]
    Transport {
        /// Queried URL.
        url: String,
        /// Stringified cause.
        reason: String,
    },

    /// No backend recognizes the target area.
    #[error("no geodata backend recognizes region '{0}'")]
    UnsupportedRegion(String),

    /// The spatial-search backend was asked to locate without WGS84 bounds.
    #[error("the spatial-search backend requires geographic bounds")]
    MissingGeographicBounds,

    /// A grid tile has no entry in the terrain filename catalog.
    #[error("tile ({x}, {y}) missing from the terrain catalog")]
    TileNotInCatalog {
        /// Tile easting in kilometres.
        x: i64,
        /// Tile northing in kilometres.
        y: i64,
    },

    /// A resource description could not be constructed.
    #[error(transparent)]
    Description(#[from] DescriptionError),

    /// A catalog response body did not parse.
    #[error("failed to parse catalog response: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<HttpError> for LocateError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Status { url, status } => LocateError::BackendUnavailable { url, status },
            HttpError::Transport { url, reason } => LocateError::Transport { url, reason },
        }
    }
}
