//! Bounded-concurrency bulk download of a file set.

use crate::{FetchItem, FetchOutcome};
use geofuse_common::{DatasetKind, FileSet, HttpClient};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Download every file of a set into `dir`.
///
/// Jobs are distributed over a bounded pool of scoped worker threads sharing
/// the HTTP client; the pool is joined before returning, so the produced
/// outcomes are final. Outcomes are re-ordered to the description's path
/// order regardless of completion order.
pub(crate) fn fetch_file_set(
    dir: &Path,
    dataset: DatasetKind,
    file_set: &FileSet,
    client: &dyn HttpClient,
    workers: usize,
) -> Vec<FetchItem> {
    let paths = file_set.file_paths();
    if paths.is_empty() {
        return Vec::new();
    }
    let workers = workers.clamp(1, paths.len());

    let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, &str)>();
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, FetchItem)>();

    for (index, path) in paths.iter().enumerate() {
        // Channel capacity is unbounded; sends cannot fail while the
        // receivers are alive.
        let _ = job_tx.send((index, path.as_str()));
    }
    drop(job_tx);

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let base_url = file_set.base_url();
            scope.spawn(move || {
                while let Ok((index, path)) = job_rx.recv() {
                    let item = fetch_one(dir, dataset, base_url, path, client);
                    let _ = result_tx.send((index, item));
                }
            });
        }
    });
    drop(result_tx);

    let mut indexed: Vec<(usize, FetchItem)> = result_rx.into_iter().collect();
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, item)| item).collect()
}

/// Fetch a single file, mapping every failure to a skip.
fn fetch_one(
    dir: &Path,
    dataset: DatasetKind,
    base_url: &str,
    path: &str,
    client: &dyn HttpClient,
) -> FetchItem {
    let url = format!("{base_url}/{path}");
    let basename = path.rsplit('/').next().unwrap_or(path);

    let outcome = match client.get(&url) {
        Ok(bytes) => match fs::write(dir.join(basename), &bytes) {
            Ok(()) => {
                debug!(%dataset, path, bytes = bytes.len(), "file fetched");
                FetchOutcome::Fetched {
                    bytes: bytes.len() as u64,
                }
            }
            Err(e) => {
                warn!(%dataset, path, error = %e, "failed to write file");
                FetchOutcome::Skipped {
                    reason: format!("write failed: {e}"),
                }
            }
        },
        Err(e) => {
            warn!(%dataset, %url, error = %e, "download failed");
            FetchOutcome::Skipped {
                reason: e.to_string(),
            }
        }
    };

    FetchItem {
        dataset,
        name: path.to_string(),
        outcome,
    }
}
