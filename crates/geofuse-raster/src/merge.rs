//! First-wins mosaic merge of single-tile elevation rasters.

use crate::{ElevationRaster, GridTransform, RasterError, Result, NODATA};
use geofuse_common::BoundingBox;
use std::path::Path;
use tracing::{debug, info};

/// What a merge produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeSummary {
    /// Number of source rasters painted into the mosaic.
    pub sources: usize,
    /// Mosaic width in pixels.
    pub width: u32,
    /// Mosaic height in pixels.
    pub height: u32,
}

/// Merge N single-tile rasters into one mosaic covering their union extent.
///
/// Sources are opened in input order and painted first-wins: where tiles
/// overlap, the value from the earliest-listed source is kept. Callers that
/// need deterministic mosaics must therefore pass a stable path order. Cells
/// covered by no source hold the [`NODATA`] sentinel. The mosaic inherits
/// resolution and CRS from the first source; sources without a CRS key are
/// assumed to already share it.
///
/// Fails with [`RasterError::EmptyInput`] for an empty list and
/// [`RasterError::SourceOpen`] for any unreadable source. Source data is held
/// only for the duration of the call; file handles are released as each
/// source finishes decoding, on error paths included.
pub fn merge<P: AsRef<Path>>(paths: &[P], output: &Path) -> Result<MergeSummary> {
    if paths.is_empty() {
        return Err(RasterError::EmptyInput);
    }

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let raster = ElevationRaster::open(path).map_err(|e| RasterError::SourceOpen {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), width = raster.width(), height = raster.height(), "opened merge source");
        sources.push(raster);
    }

    let first = &sources[0];
    let pixel_width = first.transform().pixel_width;
    let pixel_height = first.transform().pixel_height;
    let epsg = first.epsg();

    let union = union_bounds(&sources);
    let width = (union.width() / pixel_width).round() as u32;
    let height = (union.height() / pixel_height).round() as u32;

    let mut mosaic = vec![NODATA; (width as usize) * (height as usize)];
    for source in &sources {
        paint(&mut mosaic, width, height, &union, pixel_width, pixel_height, source);
    }

    let transform = GridTransform::from_bounds(&union, width, height);
    let merged = ElevationRaster::new(mosaic, width, height, transform, epsg, NODATA)?;
    merged.write(output)?;

    info!(
        sources = sources.len(),
        width, height,
        output = %output.display(),
        "merged mosaic written"
    );

    Ok(MergeSummary {
        sources: sources.len(),
        width,
        height,
    })
}

/// Union of the source extents.
fn union_bounds(sources: &[ElevationRaster]) -> BoundingBox {
    let mut union = sources[0].transform().bounds(sources[0].width(), sources[0].height());
    for source in &sources[1..] {
        let b = source.transform().bounds(source.width(), source.height());
        union.min_x = union.min_x.min(b.min_x);
        union.min_y = union.min_y.min(b.min_y);
        union.max_x = union.max_x.max(b.max_x);
        union.max_y = union.max_y.max(b.max_y);
    }
    union
}

/// Paint one source into the mosaic, writing only cells that still hold the
/// sentinel and skipping the source's own nodata cells.
fn paint(
    mosaic: &mut [f32],
    width: u32,
    height: u32,
    union: &BoundingBox,
    pixel_width: f64,
    pixel_height: f64,
    source: &ElevationRaster,
) {
    let t = source.transform();
    // Cell offset of the source's top-left pixel within the mosaic grid.
    let col_offset = ((t.origin_x - union.min_x) / pixel_width).round() as i64;
    let row_offset = ((union.max_y - t.origin_y) / pixel_height).round() as i64;

    for row in 0..source.height() {
        let target_row = row_offset + row as i64;
        if target_row < 0 || target_row >= height as i64 {
            continue;
        }
        for col in 0..source.width() {
            let target_col = col_offset + col as i64;
            if target_col < 0 || target_col >= width as i64 {
                continue;
            }
            let value = source.value_at(col, row);
            if value == source.nodata() {
                continue;
            }
            let idx = target_row as usize * width as usize + target_col as usize;
            if mosaic[idx] == NODATA {
                mosaic[idx] = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_EPSG;
    use std::path::PathBuf;

    fn write_tile(dir: &Path, name: &str, min_x: f64, min_y: f64, fill: f32) -> PathBuf {
        let bbox = BoundingBox::new(min_x, min_y, min_x + 10.0, min_y + 10.0).unwrap();
        let transform = GridTransform::from_bounds(&bbox, 10, 10);
        let raster =
            ElevationRaster::new(vec![fill; 100], 10, 10, transform, DEFAULT_EPSG, NODATA)
                .unwrap();
        let path = dir.join(name);
        raster.write(&path).unwrap();
        path
    }

    #[test]
    fn test_empty_input_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = Vec::new();
        assert!(matches!(
            merge(&paths, &tmp.path().join("out.tif")),
            Err(RasterError::EmptyInput)
        ));
    }

    #[test]
    fn test_unreadable_source_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.tif");
        let err = merge(&[missing.clone()], &tmp.path().join("out.tif")).unwrap_err();
        match err {
            RasterError::SourceOpen { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_single_input_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let tile = write_tile(tmp.path(), "a.tif", 0.0, 0.0, 7.5);
        let out = tmp.path().join("out.tif");

        let summary = merge(&[tile.clone()], &out).unwrap();
        assert_eq!(summary.sources, 1);

        let source = ElevationRaster::open(&tile).unwrap();
        let merged = ElevationRaster::open(&out).unwrap();
        assert_eq!(merged.width(), source.width());
        assert_eq!(merged.height(), source.height());
        assert_eq!(merged.data(), source.data());
        assert_eq!(merged.transform(), source.transform());
    }

    #[test]
    fn test_adjacent_tiles_cover_union() {
        let tmp = tempfile::tempdir().unwrap();
        let a = write_tile(tmp.path(), "a.tif", 0.0, 0.0, 1.0);
        let b = write_tile(tmp.path(), "b.tif", 10.0, 0.0, 2.0);
        let out = tmp.path().join("out.tif");

        let summary = merge(&[a, b], &out).unwrap();
        assert_eq!((summary.width, summary.height), (20, 10));

        let merged = ElevationRaster::open(&out).unwrap();
        assert_eq!(merged.value_at(0, 0), 1.0);
        assert_eq!(merged.value_at(19, 9), 2.0);
    }

    #[test]
    fn test_overlap_resolves_to_first_listed_source() {
        let tmp = tempfile::tempdir().unwrap();
        // Three tiles on the same footprint with different fills; the
        // first-listed value must win everywhere they overlap.
        let a = write_tile(tmp.path(), "a.tif", 0.0, 0.0, 11.0);
        let b = write_tile(tmp.path(), "b.tif", 0.0, 0.0, 22.0);
        let c = write_tile(tmp.path(), "c.tif", 0.0, 0.0, 33.0);
        let out = tmp.path().join("out.tif");

        merge(&[a, b, c], &out).unwrap();
        let merged = ElevationRaster::open(&out).unwrap();
        assert!(merged.data().iter().all(|&v| v == 11.0));
    }

    #[test]
    fn test_gap_cells_hold_nodata() {
        let tmp = tempfile::tempdir().unwrap();
        // Diagonal tiles leave two 10x10 gaps in the union.
        let a = write_tile(tmp.path(), "a.tif", 0.0, 0.0, 1.0);
        let b = write_tile(tmp.path(), "b.tif", 10.0, 10.0, 2.0);
        let out = tmp.path().join("out.tif");

        merge(&[a, b], &out).unwrap();
        let merged = ElevationRaster::open(&out).unwrap();
        // Top-right quadrant is b's footprint, bottom-left is a's; the other
        // two corners belong to neither.
        assert_eq!(merged.value_at(19, 0), 2.0);
        assert_eq!(merged.value_at(0, 19), 1.0);
        assert_eq!(merged.value_at(0, 0), NODATA);
        assert_eq!(merged.value_at(19, 19), NODATA);
    }

    #[test]
    fn test_merge_is_deterministic() {
        let tmp = tempfile::tempdir().unwrap();
        let a = write_tile(tmp.path(), "a.tif", 0.0, 0.0, 1.0);
        let b = write_tile(tmp.path(), "b.tif", 5.0, 5.0, 2.0);
        let out1 = tmp.path().join("out1.tif");
        let out2 = tmp.path().join("out2.tif");

        merge(&[a.clone(), b.clone()], &out1).unwrap();
        merge(&[a, b], &out2).unwrap();

        let bytes1 = std::fs::read(&out1).unwrap();
        let bytes2 = std::fs::read(&out2).unwrap();
        assert_eq!(bytes1, bytes2);
    }
}
