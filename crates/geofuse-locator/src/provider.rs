//! The supported open-data backends.

use crate::LocateError;
use geofuse_common::{BoundingBox, WmsQuery};
use std::fmt;
use std::str::FromStr;

/// WMS protocol version both providers speak.
pub(crate) const WMS_VERSION: &str = "1.3.0";

// NRW (grid enumeration) endpoints.
pub(crate) const NRW_BUILDING_BASE: &str =
    "https://www.opengeodata.nrw.de/produkte/geobasis/3dg/lod1_gml/lod1_gml";
pub(crate) const NRW_TERRAIN_BASE: &str =
    "https://www.opengeodata.nrw.de/produkte/geobasis/hm/dgm1_tiff/dgm1_tiff";
pub(crate) const NRW_SITE_MAP_BASE: &str =
    "https://www.opengeodata.nrw.de/produkte/geobasis/lk/akt/abk_tiff/abk_sw_tiff";
pub(crate) const NRW_WMS_URL: &str = "https://www.wms.nrw.de/geobasis/wms_nw_alkis";

// NDS (spatial search) endpoints.
pub(crate) const NDS_BUILDING_SEARCH: &str = "https://lod.stac.lgln.niedersachsen.de/search";
pub(crate) const NDS_TERRAIN_SEARCH: &str = "https://dgm.stac.lgln.niedersachsen.de/search";
pub(crate) const NDS_WMS_URL: &str =
    "https://opendata.lgln.niedersachsen.de/doorman/noauth/alkis_wms";

/// A geodata backend.
///
/// Which provider covers the target area is decided by the caller (the
/// original system reverse-geocodes the region's administrative state); the
/// locator only needs the final pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// North Rhine-Westphalia: tiled-file catalog, grid enumeration.
    Nrw,
    /// Lower Saxony: STAC spatial search.
    Nds,
}

impl Provider {
    /// The cadastral overlay query for this provider.
    pub(crate) fn cadastre_query(&self, bbox: BoundingBox) -> WmsQuery {
        match self {
            Provider::Nrw => WmsQuery {
                base_url: NRW_WMS_URL.to_string(),
                bounding_box: bbox,
                layer_name: "adv_alkis_flurstuecke".to_string(),
                style: "Grau".to_string(),
                protocol_version: WMS_VERSION.to_string(),
            },
            Provider::Nds => WmsQuery {
                base_url: NDS_WMS_URL.to_string(),
                bounding_box: bbox,
                layer_name: "ALKIS".to_string(),
                style: "SW".to_string(),
                protocol_version: WMS_VERSION.to_string(),
            },
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Nrw => f.write_str("nrw"),
            Provider::Nds => f.write_str("nds"),
        }
    }
}

impl FromStr for Provider {
    type Err = LocateError;

    /// Parse a provider selector, accepting the short code or the state name.
    fn from_str(s: &str) -> Result<Self, LocateError> {
        match s.trim().to_lowercase().as_str() {
            "nrw" | "nordrhein-westfalen" => Ok(Provider::Nrw),
            "nds" | "niedersachsen" => Ok(Provider::Nds),
            other => Err(LocateError::UnsupportedRegion(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_providers() {
        assert_eq!("nrw".parse::<Provider>().unwrap(), Provider::Nrw);
        assert_eq!(
            "Nordrhein-Westfalen".parse::<Provider>().unwrap(),
            Provider::Nrw
        );
        assert_eq!("nds".parse::<Provider>().unwrap(), Provider::Nds);
        assert_eq!("Niedersachsen".parse::<Provider>().unwrap(), Provider::Nds);
    }

    #[test]
    fn test_unknown_region_rejected() {
        let err = "bayern".parse::<Provider>().unwrap_err();
        assert!(matches!(err, LocateError::UnsupportedRegion(name) if name == "bayern"));
    }
}
