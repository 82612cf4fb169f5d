//! Command-line interface.

use crate::PipelineError;
use clap::Parser;
use geofuse_common::{BoundingBox, GeoBoundingBox, Region};
use std::path::PathBuf;

/// Download and fuse open geodata for atmospheric-dispersion modelling.
#[derive(Debug, Parser)]
#[command(name = "geofuse", version, about)]
pub struct Cli {
    /// West edge of the target area, EPSG:25832 meters.
    #[arg(long, allow_hyphen_values = true)]
    pub min_x: f64,

    /// South edge of the target area, EPSG:25832 meters.
    #[arg(long, allow_hyphen_values = true)]
    pub min_y: f64,

    /// East edge of the target area, EPSG:25832 meters.
    #[arg(long, allow_hyphen_values = true)]
    pub max_x: f64,

    /// North edge of the target area, EPSG:25832 meters.
    #[arg(long, allow_hyphen_values = true)]
    pub max_y: f64,

    /// West edge in WGS84 degrees (spatial-search provider only).
    #[arg(long, allow_hyphen_values = true, requires_all = ["south", "east", "north"])]
    pub west: Option<f64>,

    /// South edge in WGS84 degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub south: Option<f64>,

    /// East edge in WGS84 degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub east: Option<f64>,

    /// North edge in WGS84 degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub north: Option<f64>,

    /// Geodata provider covering the area: nrw or nds.
    #[arg(long)]
    pub provider: String,

    /// Output directory; one subdirectory per dataset is created inside.
    #[arg(long, default_value = "geodata")]
    pub output: PathBuf,

    /// Terrain sample stride in cells.
    #[arg(long, default_value_t = 1)]
    pub stride: u32,

    /// Concurrent downloads per file set.
    #[arg(long, default_value_t = 4)]
    pub workers: usize,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,
}

impl Cli {
    /// Assemble the target region from the parsed bounds.
    pub fn region(&self) -> Result<Region, PipelineError> {
        let projected = BoundingBox::new(self.min_x, self.min_y, self.max_x, self.max_y)?;
        let mut region = Region::new(projected);
        if let (Some(west), Some(south), Some(east), Some(north)) =
            (self.west, self.south, self.east, self.north)
        {
            region = region.with_geographic(GeoBoundingBox {
                west,
                south,
                east,
                north,
            });
        }
        Ok(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("geofuse").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_minimal_invocation() {
        let cli = parse(&[
            "--min-x", "350000", "--min-y", "5673000", "--max-x", "352000", "--max-y", "5675000",
            "--provider", "nrw",
        ]);
        let region = cli.region().unwrap();
        assert_eq!(region.projected.min_x, 350_000.0);
        assert!(region.geographic.is_none());
        assert_eq!(cli.stride, 1);
    }

    #[test]
    fn test_geographic_bounds_attach() {
        let cli = parse(&[
            "--min-x", "500000", "--min-y", "5790000", "--max-x", "510000", "--max-y", "5800000",
            "--west", "9.1", "--south", "52.3", "--east", "9.2", "--north", "52.4",
            "--provider", "nds",
        ]);
        let region = cli.region().unwrap();
        assert!(region.geographic.is_some());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let cli = parse(&[
            "--min-x", "352000", "--min-y", "5673000", "--max-x", "350000", "--max-y", "5675000",
            "--provider", "nrw",
        ]);
        assert!(cli.region().is_err());
    }
}
