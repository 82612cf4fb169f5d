//! # geofuse-fetch
//!
//! Executes resource descriptions: bulk-downloads enumerated file sets and
//! issues WMS GetMap requests, georeferencing the returned image.
//!
//! Fetching is best-effort by design: an individual failed item never aborts
//! the run. Every item instead yields a [`FetchOutcome`] collected into a
//! [`FetchReport`], so callers can verify file counts after the fact. Only
//! the final report tells whether a dataset actually materialized.

mod bulk;
mod report;
mod wms;

pub use report::{FetchItem, FetchOutcome, FetchReport};

use geofuse_common::{DatasetKind, HttpClient, OutputArea, ResourceDescription};
use std::collections::BTreeMap;
use tracing::info;

/// Tuning knobs for a fetch run.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Maximum concurrent downloads per file set.
    pub workers: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self { workers: 4 }
    }
}

/// Execute every description, populating `area` one dataset per
/// subdirectory.
///
/// Datasets are processed in map order; within a file set, downloads fan out
/// over a bounded worker pool that is joined before the next dataset starts,
/// so the caller observes a completed dataset or none. The report lists one
/// outcome per item in the description's order.
pub fn fetch(
    area: &OutputArea,
    descriptions: &BTreeMap<DatasetKind, ResourceDescription>,
    client: &dyn HttpClient,
    options: &FetchOptions,
) -> FetchReport {
    let mut report = FetchReport::default();

    for (&dataset, description) in descriptions {
        let dir = area.dataset_dir(dataset);
        let items = match description {
            ResourceDescription::FileSet(file_set) => {
                bulk::fetch_file_set(&dir, dataset, file_set, client, options.workers)
            }
            ResourceDescription::WmsQuery(query) => wms::fetch_wms(&dir, dataset, query, client),
        };
        report.extend(items);
    }

    info!(
        fetched = report.fetched_count(),
        skipped = report.skipped_count(),
        "fetch finished"
    );
    report
}
