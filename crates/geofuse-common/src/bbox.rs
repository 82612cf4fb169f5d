//! Bounding boxes in projected and geographic coordinates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error constructing a bounding box.
#[derive(Debug, Error)]
pub enum BoundsError {
    /// The maximum corner does not dominate the minimum corner.
    #[error("invalid bounds: ({min_x}, {min_y}) .. ({max_x}, {max_y})")]
    Degenerate {
        /// Minimum x of the rejected box.
        min_x: f64,
        /// Minimum y of the rejected box.
        min_y: f64,
        /// Maximum x of the rejected box.
        max_x: f64,
        /// Maximum y of the rejected box.
        max_y: f64,
    },
}

/// An axis-aligned rectangle in a projected CRS (meters).
///
/// Both supported providers serve their products in EPSG:25832, so projected
/// coordinates are UTM zone 32N meters throughout the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// West edge.
    pub min_x: f64,
    /// South edge.
    pub min_y: f64,
    /// East edge.
    pub max_x: f64,
    /// North edge.
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a bounding box, rejecting boxes whose maximum corner does not
    /// dominate the minimum corner.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self, BoundsError> {
        if max_x < min_x || max_y < min_y {
            return Err(BoundsError::Degenerate {
                min_x,
                min_y,
                max_x,
                max_y,
            });
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Width of the box in projected units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the box in projected units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// The same rectangle in WGS84 geographic coordinates.
///
/// The spatial-search backend takes its bbox query in lon/lat order; the
/// caller derives these bounds while selecting the provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBoundingBox {
    /// West edge in decimal degrees.
    pub west: f64,
    /// South edge in decimal degrees.
    pub south: f64,
    /// East edge in decimal degrees.
    pub east: f64,
    /// North edge in decimal degrees.
    pub north: f64,
}

/// The target area of one pipeline run.
///
/// Carries the projected box every stage works in, plus the geographic box
/// the spatial-search backend needs. The geographic half is optional because
/// the grid-enumeration backend never uses it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Target area in the projected CRS.
    pub projected: BoundingBox,
    /// Target area in WGS84, when the caller supplied it.
    pub geographic: Option<GeoBoundingBox>,
}

impl Region {
    /// Create a region with projected bounds only.
    pub fn new(projected: BoundingBox) -> Self {
        Self {
            projected,
            geographic: None,
        }
    }

    /// Attach geographic bounds.
    pub fn with_geographic(mut self, geographic: GeoBoundingBox) -> Self {
        self.geographic = Some(geographic);
        self
    }
}
