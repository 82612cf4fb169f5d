//! Per-item fetch outcomes.

use geofuse_common::DatasetKind;

/// What happened to one fetched item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The item was downloaded and written.
    Fetched {
        /// Downloaded payload size.
        bytes: u64,
    },
    /// The item was skipped; the file is absent from the output.
    Skipped {
        /// Why the item was skipped.
        reason: String,
    },
}

/// One item of a fetch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchItem {
    /// Dataset the item belongs to.
    pub dataset: DatasetKind,
    /// Item name (relative file path, or the WMS artifact name).
    pub name: String,
    /// The outcome.
    pub outcome: FetchOutcome,
}

impl FetchItem {
    /// Whether the item materialized on disk.
    pub fn is_fetched(&self) -> bool {
        matches!(self.outcome, FetchOutcome::Fetched { .. })
    }
}

/// Aggregated outcomes of a fetch run, in description order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    items: Vec<FetchItem>,
}

impl FetchReport {
    /// All items, in description order.
    pub fn items(&self) -> &[FetchItem] {
        &self.items
    }

    /// Append items to the report.
    pub fn extend(&mut self, items: Vec<FetchItem>) {
        self.items.extend(items);
    }

    /// Number of items that materialized.
    pub fn fetched_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_fetched()).count()
    }

    /// Number of items that were skipped.
    pub fn skipped_count(&self) -> usize {
        self.items.len() - self.fetched_count()
    }

    /// Number of materialized items of one dataset.
    pub fn fetched_for(&self, dataset: DatasetKind) -> usize {
        self.items
            .iter()
            .filter(|i| i.dataset == dataset && i.is_fetched())
            .count()
    }

    /// The skipped items, for diagnostics.
    pub fn skipped(&self) -> impl Iterator<Item = &FetchItem> {
        self.items.iter().filter(|i| !i.is_fetched())
    }
}
