//! WMS GetMap retrieval and georeferencing.

use crate::{FetchItem, FetchOutcome};
use geofuse_common::{BoundingBox, DatasetKind, HttpClient, WmsQuery};
use geofuse_raster::{write_rgb_geotiff, GridTransform, DEFAULT_EPSG};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Fraction of the box span added to each edge so the rendered map does not
/// clip at the region boundary.
const EDGE_MARGIN: f64 = 0.2;

/// Maximum output image envelope.
const MAX_WIDTH: u32 = 4096;
const MAX_HEIGHT: u32 = 3072;

/// Expand the bounding box outward by [`EDGE_MARGIN`] per side.
///
/// The edge order is load-bearing: the max edges read the already expanded
/// min edges, so top and right move by 24 % of the original span rather than
/// 20 %. The transform attached to the output raster is derived from the same
/// expanded box, so the artifact stays self-consistent either way.
fn expanded_bbox(b: &BoundingBox) -> BoundingBox {
    let mut min_x = b.min_x;
    let mut min_y = b.min_y;
    let mut max_x = b.max_x;
    let mut max_y = b.max_y;

    min_y -= (max_y - min_y) * EDGE_MARGIN;
    min_x -= (max_x - min_x) * EDGE_MARGIN;
    max_y += (max_y - min_y) * EDGE_MARGIN;
    max_x += (max_x - min_x) * EDGE_MARGIN;

    BoundingBox {
        min_x,
        min_y,
        max_x,
        max_y,
    }
}

/// Fit the box into the output envelope, preserving its aspect ratio.
fn image_dimensions(b: &BoundingBox) -> Option<(u32, u32)> {
    if b.width() <= 0.0 || b.height() <= 0.0 {
        return None;
    }
    let aspect = b.width() / b.height();
    let (width, height) = if aspect > 1.0 {
        (MAX_WIDTH, (MAX_WIDTH as f64 / aspect) as u32)
    } else {
        ((MAX_HEIGHT as f64 * aspect) as u32, MAX_HEIGHT)
    };
    Some((width, height))
}

/// The GetMap request URL.
fn getmap_url(query: &WmsQuery, bbox: &BoundingBox, width: u32, height: u32) -> String {
    format!(
        "{}?service=WMS&version={}&request=GetMap&layers={}&styles={}&crs=EPSG:{}&bbox={},{},{},{}&width={}&height={}&format=image/png",
        query.base_url,
        query.protocol_version,
        query.layer_name,
        query.style,
        DEFAULT_EPSG,
        bbox.min_x,
        bbox.min_y,
        bbox.max_x,
        bbox.max_y,
        width,
        height
    )
}

/// Issue the GetMap request and georeference the result.
///
/// Writes `<key>.png` (the response verbatim) and `<key>.tif` (3-band RGB
/// with the expanded box's transform and the request CRS). Any failure maps
/// to a skip; the dataset is then simply absent.
pub(crate) fn fetch_wms(
    dir: &Path,
    dataset: DatasetKind,
    query: &WmsQuery,
    client: &dyn HttpClient,
) -> Vec<FetchItem> {
    let name = format!("{dataset}.tif");
    let outcome = fetch_wms_inner(dir, dataset, query, client);
    if let FetchOutcome::Skipped { reason } = &outcome {
        warn!(%dataset, reason, "WMS dataset skipped");
    }
    vec![FetchItem {
        dataset,
        name,
        outcome,
    }]
}

fn fetch_wms_inner(
    dir: &Path,
    dataset: DatasetKind,
    query: &WmsQuery,
    client: &dyn HttpClient,
) -> FetchOutcome {
    let bbox = expanded_bbox(&query.bounding_box);
    let Some((width, height)) = image_dimensions(&bbox) else {
        return FetchOutcome::Skipped {
            reason: "degenerate bounding box".to_string(),
        };
    };

    let url = getmap_url(query, &bbox, width, height);
    let bytes = match client.get(&url) {
        Ok(bytes) => bytes,
        Err(e) => {
            return FetchOutcome::Skipped {
                reason: e.to_string(),
            }
        }
    };

    let image = match image::load_from_memory(&bytes) {
        Ok(image) => image,
        Err(e) => {
            return FetchOutcome::Skipped {
                reason: format!("image decode failed: {e}"),
            }
        }
    };

    let png_path = dir.join(format!("{dataset}.png"));
    if let Err(e) = fs::write(&png_path, &bytes) {
        return FetchOutcome::Skipped {
            reason: format!("write failed: {e}"),
        };
    }

    // Georeference from the decoded dimensions, which match the request
    // unless the server substituted its own size.
    let rgb = image.to_rgb8();
    let (actual_width, actual_height) = rgb.dimensions();
    let transform = GridTransform::from_bounds(&bbox, actual_width, actual_height);
    let tif_path = dir.join(format!("{dataset}.tif"));
    if let Err(e) = write_rgb_geotiff(
        &tif_path,
        rgb.as_raw(),
        actual_width,
        actual_height,
        &transform,
        DEFAULT_EPSG,
    ) {
        return FetchOutcome::Skipped {
            reason: format!("georeferencing failed: {e}"),
        };
    }

    debug!(%dataset, width = actual_width, height = actual_height, "WMS overlay written");
    FetchOutcome::Fetched {
        bytes: bytes.len() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geofuse_common::http::mock::MockHttpClient;
    use std::io::Cursor;

    fn bbox(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> BoundingBox {
        BoundingBox::new(min_x, min_y, max_x, max_y).unwrap()
    }

    #[test]
    fn test_expansion_order_matches_reference_values() {
        let e = expanded_bbox(&bbox(0.0, 0.0, 100.0, 200.0));
        assert_relative_eq!(e.min_y, -40.0);
        assert_relative_eq!(e.min_x, -20.0);
        // The max edges see the already widened extent: 0.2 * 240 and
        // 0.2 * 120 instead of 40 and 20.
        assert_relative_eq!(e.max_y, 248.0);
        assert_relative_eq!(e.max_x, 124.0);
    }

    #[test]
    fn test_dimensions_preserve_aspect_ratio() {
        let (w, h) = image_dimensions(&bbox(0.0, 0.0, 200.0, 100.0)).unwrap();
        assert_eq!((w, h), (4096, 2048));
        assert_relative_eq!(w as f64 / h as f64, 2.0);

        let (w, h) = image_dimensions(&bbox(0.0, 0.0, 100.0, 200.0)).unwrap();
        assert_eq!((w, h), (1536, 3072));
        assert_relative_eq!(w as f64 / h as f64, 0.5);
    }

    #[test]
    fn test_square_box_yields_square_image() {
        let (w, h) = image_dimensions(&bbox(0.0, 0.0, 500.0, 500.0)).unwrap();
        assert_eq!(w, h);
    }

    #[test]
    fn test_degenerate_box_has_no_dimensions() {
        assert!(image_dimensions(&bbox(5.0, 5.0, 5.0, 5.0)).is_none());
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn query() -> WmsQuery {
        WmsQuery {
            base_url: "https://wms.example/alkis".to_string(),
            bounding_box: bbox(0.0, 0.0, 100.0, 200.0),
            layer_name: "parcels".to_string(),
            style: "Grau".to_string(),
            protocol_version: "1.3.0".to_string(),
        }
    }

    #[test]
    fn test_getmap_success_writes_png_and_geotiff() {
        let tmp = tempfile::tempdir().unwrap();
        let q = query();
        let expanded = expanded_bbox(&q.bounding_box);
        let (w, h) = image_dimensions(&expanded).unwrap();
        let png = png_bytes(w, h);
        let client =
            MockHttpClient::new().with_body(getmap_url(&q, &expanded, w, h), png.clone());

        let items = fetch_wms(tmp.path(), DatasetKind::Cadastre, &q, &client);
        assert_eq!(items.len(), 1);
        assert!(items[0].is_fetched());

        // The response is persisted verbatim next to the georeferenced copy.
        assert_eq!(fs::read(tmp.path().join("cadastre.png")).unwrap(), png);
        assert!(tmp.path().join("cadastre.tif").is_file());

        let file = fs::File::open(tmp.path().join("cadastre.tif")).unwrap();
        let mut decoder = tiff::decoder::Decoder::new(file).unwrap();
        assert_eq!(decoder.dimensions().unwrap(), (w, h));
        let scale = decoder
            .get_tag_f64_vec(tiff::tags::Tag::Unknown(33550))
            .unwrap();
        assert_relative_eq!(scale[0], expanded.width() / w as f64);
    }

    #[test]
    fn test_getmap_failure_skips_dataset() {
        let tmp = tempfile::tempdir().unwrap();
        let q = query();
        let expanded = expanded_bbox(&q.bounding_box);
        let (w, h) = image_dimensions(&expanded).unwrap();
        let client = MockHttpClient::new().with_status(getmap_url(&q, &expanded, w, h), 500);

        let items = fetch_wms(tmp.path(), DatasetKind::Cadastre, &q, &client);
        assert!(!items[0].is_fetched());
        assert!(!tmp.path().join("cadastre.png").exists());
        assert!(!tmp.path().join("cadastre.tif").exists());
    }

    #[test]
    fn test_undecodable_body_skips_dataset() {
        let tmp = tempfile::tempdir().unwrap();
        let q = query();
        let expanded = expanded_bbox(&q.bounding_box);
        let (w, h) = image_dimensions(&expanded).unwrap();
        let client = MockHttpClient::new()
            .with_body(getmap_url(&q, &expanded, w, h), b"not a png".to_vec());

        let items = fetch_wms(tmp.path(), DatasetKind::Cadastre, &q, &client);
        match &items[0].outcome {
            FetchOutcome::Skipped { reason } => assert!(reason.contains("decode")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
