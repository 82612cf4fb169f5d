//! # geofuse-locator
//!
//! Translates a bounding region into the resource descriptions the fetcher
//! consumes, against one of two heterogeneous open-data backends:
//!
//! - **Grid enumeration** ([`Provider::Nrw`]): the catalog publishes one file
//!   per 1 km grid tile under predictable names, so the locator enumerates
//!   the tiles covering the region and formats filenames locally. Terrain
//!   filenames embed a survey year and need a side catalog lookup
//!   ([`catalog::TerrainCatalog`]).
//! - **Spatial search** ([`Provider::Nds`]): a STAC-style `/search` endpoint
//!   answers a bbox query with a feature collection whose assets carry the
//!   download URLs.
//!
//! Both backends additionally expose a cadastral WMS overlay, appended as a
//! [`WmsQuery`](geofuse_common::WmsQuery) description.

pub mod catalog;
mod error;
mod grid;
mod provider;
mod stac;

pub use error::LocateError;
pub use provider::Provider;

use geofuse_common::{DatasetKind, HttpClient, Region, ResourceDescription};
use std::collections::BTreeMap;
use tracing::info;

/// Result type for locator operations.
pub type Result<T> = std::result::Result<T, LocateError>;

/// Map of dataset key to the description that materializes it.
///
/// `BTreeMap` keeps the iteration order stable, so a fetch over the same
/// region touches datasets in the same order every run.
pub type DescriptionMap = BTreeMap<DatasetKind, ResourceDescription>;

/// Resolve the resource descriptions for a region against a provider.
pub fn locate(
    region: &Region,
    provider: Provider,
    client: &dyn HttpClient,
) -> Result<DescriptionMap> {
    let descriptions = match provider {
        Provider::Nrw => grid::locate(&region.projected, client)?,
        Provider::Nds => stac::locate(region, client)?,
    };

    let files: usize = descriptions
        .values()
        .map(|d| match d {
            ResourceDescription::FileSet(fs) => fs.len(),
            ResourceDescription::WmsQuery(_) => 1,
        })
        .sum();
    info!(%provider, datasets = descriptions.len(), files, "located resources");

    Ok(descriptions)
}
