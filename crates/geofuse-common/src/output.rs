//! The output directory tree for one pipeline run.

use crate::DatasetKind;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Owns the output directory of one pipeline run.
///
/// The root and one subdirectory per dataset key are created once, up front,
/// so the fetch workers never race on directory creation. Creation is
/// idempotent: an existing tree is reused as-is.
#[derive(Debug)]
pub struct OutputArea {
    root: PathBuf,
}

impl OutputArea {
    /// Create (or reuse) the output tree rooted at `root`.
    pub fn create(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        for kind in DatasetKind::ALL {
            fs::create_dir_all(root.join(kind.as_str()))?;
        }
        Ok(Self { root })
    }

    /// The output root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The subdirectory owned by one dataset.
    pub fn dataset_dir(&self, kind: DatasetKind) -> PathBuf {
        self.root.join(kind.as_str())
    }
}
