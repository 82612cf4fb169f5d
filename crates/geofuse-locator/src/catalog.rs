//! Terrain filename catalog for the grid-enumeration backend.
//!
//! NRW's terrain products are not derivable from the tile coordinate alone:
//! the filename embeds a survey year, e.g. `dgm1_32_351_5673_1_nw_2021.tif`.
//! The download server publishes an `index.json` listing every file; this
//! module fetches it once per locate call and resolves tiles against it.

use crate::{LocateError, Result};
use geofuse_common::{HttpClient, TileCoord};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct IndexDocument {
    datasets: Vec<IndexDataset>,
}

#[derive(Debug, Deserialize)]
struct IndexDataset {
    files: Vec<IndexFile>,
}

#[derive(Debug, Deserialize)]
struct IndexFile {
    name: String,
}

/// Tile-to-filename catalog parsed from the provider's `index.json`.
///
/// Lookup is exact on the `(x, y)` pair parsed out of each filename. Matching
/// on digit containment in the raw name would also accept tiles whose
/// coordinates merely share digit sequences (x 351 against x 1351), so the
/// parsed pair is the key.
#[derive(Debug, Default)]
pub struct TerrainCatalog {
    by_tile: HashMap<TileCoord, String>,
}

impl TerrainCatalog {
    /// Fetch and parse the catalog from `index_url`.
    pub fn fetch(index_url: &str, client: &dyn HttpClient) -> Result<Self> {
        let body = client.get(index_url)?;
        let document: IndexDocument = serde_json::from_slice(&body)?;
        let names = document
            .datasets
            .into_iter()
            .flat_map(|d| d.files)
            .map(|f| f.name);
        let catalog = Self::from_names(names);
        debug!(entries = catalog.by_tile.len(), "terrain catalog loaded");
        Ok(catalog)
    }

    /// Build a catalog from bare filenames, ignoring entries that do not
    /// follow the terrain naming scheme.
    pub fn from_names<I: IntoIterator<Item = String>>(names: I) -> Self {
        let mut by_tile = HashMap::new();
        for name in names {
            if let Some(tile) = parse_tile_name(&name) {
                by_tile.insert(tile, name);
            }
        }
        Self { by_tile }
    }

    /// The filename covering a tile, or an error naming the missing tile.
    pub fn filename_for(&self, tile: TileCoord) -> Result<&str> {
        self.by_tile
            .get(&tile)
            .map(String::as_str)
            .ok_or(LocateError::TileNotInCatalog {
                x: tile.x,
                y: tile.y,
            })
    }

    /// Number of tiles in the catalog.
    pub fn len(&self) -> usize {
        self.by_tile.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.by_tile.is_empty()
    }
}

/// Parse the tile coordinate out of a `dgm1_32_{x}_{y}_1_nw_{year}.tif` name.
fn parse_tile_name(name: &str) -> Option<TileCoord> {
    let mut parts = name.split('_');
    if parts.next() != Some("dgm1") || parts.next() != Some("32") {
        return None;
    }
    let x: i64 = parts.next()?.parse().ok()?;
    let y: i64 = parts.next()?.parse().ok()?;
    Some(TileCoord { x, y })
}
