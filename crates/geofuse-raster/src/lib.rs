//! # geofuse-raster
//!
//! Elevation raster handling for the geofuse pipeline.
//!
//! This crate owns everything that touches GeoTIFF pixels:
//!
//! - [`ElevationRaster`]: a single-band f32 raster with a north-up affine
//!   transform and an EPSG code, read from and written to GeoTIFF files.
//! - [`write_rgb_geotiff`]: georeferenced 3-band output for the WMS overlay.
//! - [`merge`]: first-wins mosaic of N single-tile rasters over their union
//!   extent.
//! - [`sample`]: regular-stride resampling of a raster into the two
//!   plain-text point files the downstream dispersion tooling expects.
//!
//! Georeferencing is carried in the ModelPixelScale/ModelTiepoint tags plus a
//! minimal GeoKeyDirectory holding the projected CRS code; the nodata
//! sentinel travels in the GDAL_NODATA tag.

mod error;
mod merge;
mod raster;
mod sample;
mod transform;

pub use error::RasterError;
pub use merge::{merge, MergeSummary};
pub use raster::{write_rgb_geotiff, ElevationRaster, DEFAULT_EPSG, NODATA};
pub use sample::{sample, sample_points, SamplePoint, SamplePoints, SampleSummary, ZONE_OFFSET};
pub use transform::GridTransform;

/// Result type for raster operations.
pub type Result<T> = std::result::Result<T, RasterError>;
