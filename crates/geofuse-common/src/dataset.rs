//! Dataset keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The datasets a pipeline run acquires.
///
/// Each dataset writes into its own subdirectory of the output area, named by
/// [`DatasetKind::as_str`]. The ordering (derived `Ord`) fixes the iteration
/// order of the description map and therefore the fetch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DatasetKind {
    /// LoD1 building models (GML).
    Building,
    /// Digital terrain model tiles (GeoTIFF, 1 m grid).
    Terrain,
    /// Official site map sheet rasters (grid provider only).
    SiteMap,
    /// Cadastral parcel overlay rendered by the provider's WMS.
    Cadastre,
}

impl DatasetKind {
    /// All dataset kinds, in fetch order.
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Building,
        DatasetKind::Terrain,
        DatasetKind::SiteMap,
        DatasetKind::Cadastre,
    ];

    /// Stable key, also used as the output subdirectory name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Building => "building",
            DatasetKind::Terrain => "terrain",
            DatasetKind::SiteMap => "site_map",
            DatasetKind::Cadastre => "cadastre",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
