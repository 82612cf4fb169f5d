//! Spatial-search locator strategy.
//!
//! The Lower Saxony catalogs expose a STAC-style `/search` endpoint per
//! product family. A bbox query returns a feature collection; each feature's
//! `assets` map carries the download URL under a product-specific key. All
//! assets of one query must share a base URL so the result fits a
//! [`FileSet`].

use crate::provider::{Provider, NDS_BUILDING_SEARCH, NDS_TERRAIN_SEARCH};
use crate::{DescriptionMap, LocateError, Result};
use geofuse_common::{
    DatasetKind, FileSet, GeoBoundingBox, HttpClient, Region, ResourceDescription,
};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Asset key of the LoD1 building product.
const ASSET_BUILDING: &str = "lod1-gml";
/// Asset key of the 1 m terrain product.
const ASSET_TERRAIN: &str = "dgm1-tif";

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    assets: HashMap<String, Asset>,
}

#[derive(Debug, Deserialize)]
struct Asset {
    href: String,
}

/// Query one search endpoint and collect the matching asset URLs.
fn search(
    endpoint: &str,
    bbox: &GeoBoundingBox,
    asset_key: &str,
    client: &dyn HttpClient,
) -> Result<FileSet> {
    let url = format!(
        "{endpoint}?bbox={},{},{},{}",
        bbox.west, bbox.south, bbox.east, bbox.north
    );
    let body = client.get_with_headers(&url, &[("Accept", "application/json")])?;
    let collection: FeatureCollection = serde_json::from_slice(&body)?;

    let hrefs: Vec<&str> = collection
        .features
        .iter()
        .filter_map(|f| f.assets.get(asset_key))
        .map(|a| a.href.as_str())
        .collect();
    debug!(endpoint, asset_key, assets = hrefs.len(), "spatial search done");

    Ok(FileSet::from_urls(hrefs)?)
}

/// Locate all datasets for a region via spatial search.
pub(crate) fn locate(region: &Region, client: &dyn HttpClient) -> Result<DescriptionMap> {
    let geographic = region
        .geographic
        .ok_or(LocateError::MissingGeographicBounds)?;

    let mut descriptions = DescriptionMap::new();
    descriptions.insert(
        DatasetKind::Building,
        ResourceDescription::FileSet(search(
            NDS_BUILDING_SEARCH,
            &geographic,
            ASSET_BUILDING,
            client,
        )?),
    );
    descriptions.insert(
        DatasetKind::Terrain,
        ResourceDescription::FileSet(search(
            NDS_TERRAIN_SEARCH,
            &geographic,
            ASSET_TERRAIN,
            client,
        )?),
    );
    descriptions.insert(
        DatasetKind::Cadastre,
        ResourceDescription::WmsQuery(Provider::Nds.cadastre_query(region.projected)),
    );

    Ok(descriptions)
}
