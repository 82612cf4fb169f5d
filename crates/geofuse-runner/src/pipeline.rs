//! Pipeline orchestration: locate → fetch → merge → sample.

use crate::PipelineError;
use geofuse_common::{DatasetKind, HttpClient, OutputArea, Region};
use geofuse_fetch::{fetch, FetchOptions, FetchReport};
use geofuse_locator::{locate, Provider};
use geofuse_raster::{merge, sample, SampleSummary};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Name of the merged terrain mosaic inside the terrain directory.
const MOSAIC_FILE: &str = "merged.tif";
/// Base name of the terrain point files.
const SAMPLE_BASE: &str = "terrain";

/// One pipeline run, fully specified.
#[derive(Debug)]
pub struct PipelineConfig {
    /// Target area.
    pub region: Region,
    /// Backend covering the area.
    pub provider: Provider,
    /// Output directory root.
    pub output_dir: PathBuf,
    /// Terrain sample stride.
    pub stride: u32,
    /// Fetch tuning.
    pub fetch: FetchOptions,
}

/// What a pipeline run produced.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Per-item fetch outcomes.
    pub report: FetchReport,
    /// Path of the merged terrain mosaic, when terrain rasters arrived.
    pub mosaic: Option<PathBuf>,
    /// Point files, when the mosaic was sampled.
    pub samples: Option<SampleSummary>,
}

/// Run the full pipeline into `config.output_dir`.
///
/// Fetching is best-effort: skipped items are logged and reported, not
/// raised. The fusion stage starts only after every fetch worker has been
/// joined; when no terrain raster arrived at all, merge and sampling are
/// skipped with a warning and the outcome says so via `mosaic: None`.
pub fn run(config: &PipelineConfig, client: &dyn HttpClient) -> Result<PipelineOutcome, PipelineError> {
    let area = OutputArea::create(&config.output_dir)?;
    let descriptions = locate(&config.region, config.provider, client)?;

    let report = fetch(&area, &descriptions, client, &config.fetch);
    for item in report.skipped() {
        warn!(dataset = %item.dataset, item = %item.name, "item skipped");
    }
    info!(
        fetched = report.fetched_count(),
        skipped = report.skipped_count(),
        "acquisition finished"
    );

    let terrain_dir = area.dataset_dir(DatasetKind::Terrain);
    let tiles = terrain_tiles(&terrain_dir)?;
    if tiles.is_empty() {
        warn!("no terrain rasters fetched; skipping merge and sampling");
        return Ok(PipelineOutcome {
            report,
            mosaic: None,
            samples: None,
        });
    }

    let mosaic_path = terrain_dir.join(MOSAIC_FILE);
    let summary = merge(&tiles, &mosaic_path)?;
    info!(
        tiles = tiles.len(),
        width = summary.width,
        height = summary.height,
        "terrain mosaic merged"
    );

    let samples = sample(&mosaic_path, &terrain_dir.join(SAMPLE_BASE), config.stride)?;
    info!(points = samples.points, "terrain sampled");

    Ok(PipelineOutcome {
        report,
        mosaic: Some(mosaic_path),
        samples: Some(samples),
    })
}

/// The fetched terrain rasters, sorted by name for a deterministic merge
/// order.
fn terrain_tiles(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut tiles = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_tif = path.extension().is_some_and(|ext| ext == "tif");
        let is_mosaic = path.file_name().is_some_and(|name| name == MOSAIC_FILE);
        if is_tif && !is_mosaic {
            tiles.push(path);
        }
    }
    tiles.sort();
    Ok(tiles)
}
