//! # geofuse-common
//!
//! Shared vocabulary for the geofuse geodata pipeline.
//!
//! This crate defines the types the pipeline stages exchange:
//!
//! - [`BoundingBox`] / [`GeoBoundingBox`] / [`Region`]: the target area in
//!   projected (EPSG:25832) and geographic (WGS84) coordinates.
//! - [`TileCoord`] and [`tiles_covering`]: the 1 km tile grid both providers
//!   cut their download products into.
//! - [`DatasetKind`]: the closed set of dataset keys a pipeline run produces.
//! - [`ResourceDescription`]: the normalized instruction set a fetcher
//!   consumes to materialize one dataset, either an enumerated file set
//!   sharing one base URL or a single WMS query.
//! - [`OutputArea`]: the output directory tree for one run, created up front
//!   and handed to each stage by reference.
//! - [`HttpClient`]: the blocking HTTP abstraction with a [`ReqwestClient`]
//!   implementation and a mock for tests.

mod bbox;
mod dataset;
mod description;
pub mod http;
mod output;
mod tile;

pub use bbox::{BoundingBox, BoundsError, GeoBoundingBox, Region};
pub use dataset::DatasetKind;
pub use description::{DescriptionError, FileSet, ResourceDescription, WmsQuery};
pub use http::{HttpClient, HttpError, ReqwestClient};
pub use output::OutputArea;
pub use tile::{tiles_covering, TileCoord, TILE_EDGE};
