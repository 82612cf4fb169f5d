//! Grid-enumeration locator strategy.
//!
//! The NRW catalog publishes one file per 1 km tile under names derived from
//! the tile's kilometre coordinates, so no per-dataset query is needed: the
//! locator enumerates the covering tiles and formats filenames locally.
//! Terrain is the exception; its filenames carry a survey year and resolve
//! through the side catalog.

use crate::catalog::TerrainCatalog;
use crate::provider::{
    Provider, NRW_BUILDING_BASE, NRW_SITE_MAP_BASE, NRW_TERRAIN_BASE,
};
use crate::{DescriptionMap, Result};
use geofuse_common::{
    tiles_covering, BoundingBox, DatasetKind, FileSet, HttpClient, ResourceDescription, TileCoord,
};
use tracing::debug;

/// Building model filename for a tile.
fn building_file(tile: TileCoord) -> String {
    format!("LoD1_32_{}_{}_1_NW.gml", tile.x, tile.y)
}

/// Site map sheet filename for a tile.
fn site_map_file(tile: TileCoord) -> String {
    format!("abk_sw_32{}_{}_1.tif", tile.x, tile.y)
}

/// URL of the terrain filename catalog.
fn terrain_index_url() -> String {
    format!("{NRW_TERRAIN_BASE}/index.json")
}

/// Locate all datasets for a region via grid enumeration.
pub(crate) fn locate(bbox: &BoundingBox, client: &dyn HttpClient) -> Result<DescriptionMap> {
    let tiles = tiles_covering(bbox);
    debug!(tiles = tiles.len(), "enumerated covering tiles");

    let catalog = TerrainCatalog::fetch(&terrain_index_url(), client)?;
    let mut terrain_files = Vec::with_capacity(tiles.len());
    for tile in &tiles {
        terrain_files.push(catalog.filename_for(*tile)?.to_string());
    }

    let mut descriptions = DescriptionMap::new();
    descriptions.insert(
        DatasetKind::Building,
        ResourceDescription::FileSet(FileSet::new(
            NRW_BUILDING_BASE,
            tiles.iter().map(|&t| building_file(t)).collect(),
        )),
    );
    descriptions.insert(
        DatasetKind::Terrain,
        ResourceDescription::FileSet(FileSet::new(NRW_TERRAIN_BASE, terrain_files)),
    );
    descriptions.insert(
        DatasetKind::SiteMap,
        ResourceDescription::FileSet(FileSet::new(
            NRW_SITE_MAP_BASE,
            tiles.iter().map(|&t| site_map_file(t)).collect(),
        )),
    );
    descriptions.insert(
        DatasetKind::Cadastre,
        ResourceDescription::WmsQuery(Provider::Nrw.cadastre_query(*bbox)),
    );

    Ok(descriptions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geofuse_common::http::mock::MockHttpClient;

    fn index_json(names: &[&str]) -> Vec<u8> {
        let files: Vec<String> = names.iter().map(|n| format!("{{\"name\":\"{n}\"}}")).collect();
        format!("{{\"datasets\":[{{\"files\":[{}]}}]}}", files.join(","))
            .into_bytes()
    }

    #[test]
    fn test_locate_single_tile() {
        let client = MockHttpClient::new().with_body(
            terrain_index_url(),
            index_json(&["dgm1_32_1_2_1_nw_2021.tif"]),
        );
        let bbox = BoundingBox::new(1000.0, 2000.0, 1999.0, 2999.0).unwrap();

        let descriptions = locate(&bbox, &client).unwrap();
        assert_eq!(descriptions.len(), 4);

        match &descriptions[&DatasetKind::Building] {
            ResourceDescription::FileSet(fs) => {
                assert_eq!(fs.base_url(), NRW_BUILDING_BASE);
                assert_eq!(fs.file_paths(), ["LoD1_32_1_2_1_NW.gml"]);
            }
            other => panic!("unexpected description: {other:?}"),
        }
        match &descriptions[&DatasetKind::Terrain] {
            ResourceDescription::FileSet(fs) => {
                assert_eq!(fs.file_paths(), ["dgm1_32_1_2_1_nw_2021.tif"]);
            }
            other => panic!("unexpected description: {other:?}"),
        }
        match &descriptions[&DatasetKind::SiteMap] {
            ResourceDescription::FileSet(fs) => {
                assert_eq!(fs.file_paths(), ["abk_sw_321_2_1.tif"]);
            }
            other => panic!("unexpected description: {other:?}"),
        }
        match &descriptions[&DatasetKind::Cadastre] {
            ResourceDescription::WmsQuery(q) => {
                assert_eq!(q.layer_name, "adv_alkis_flurstuecke");
                assert_eq!(q.bounding_box, bbox);
            }
            other => panic!("unexpected description: {other:?}"),
        }
    }

    #[test]
    fn test_locate_covers_all_nine_tiles() {
        let names: Vec<String> = (0..=2)
            .flat_map(|x| (1..=3).map(move |y| format!("dgm1_32_{x}_{y}_1_nw_2021.tif")))
            .collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let client = MockHttpClient::new().with_body(terrain_index_url(), index_json(&refs));

        let bbox = BoundingBox::new(999.0, 1999.0, 2001.0, 3001.0).unwrap();
        let descriptions = locate(&bbox, &client).unwrap();

        match &descriptions[&DatasetKind::Terrain] {
            ResourceDescription::FileSet(fs) => assert_eq!(fs.len(), 9),
            other => panic!("unexpected description: {other:?}"),
        }
    }

    #[test]
    fn test_missing_catalog_entry_fails_locate() {
        let client = MockHttpClient::new().with_body(terrain_index_url(), index_json(&[]));
        let bbox = BoundingBox::new(1000.0, 2000.0, 1999.0, 2999.0).unwrap();
        assert!(matches!(
            locate(&bbox, &client),
            Err(crate::LocateError::TileNotInCatalog { x: 1, y: 2 })
        ));
    }

    #[test]
    fn test_unavailable_index_fails_locate() {
        let client = MockHttpClient::new().with_status(terrain_index_url(), 503);
        let bbox = BoundingBox::new(1000.0, 2000.0, 1999.0, 2999.0).unwrap();
        assert!(matches!(
            locate(&bbox, &client),
            Err(crate::LocateError::BackendUnavailable { status: 503, .. })
        ));
    }
}
