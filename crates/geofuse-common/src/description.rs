//! Resource descriptions: the locator's output, the fetcher's input.

use crate::BoundingBox;
use thiserror::Error;

/// Error building a resource description.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptionError {
    /// Assets of one query resolve to different base URLs.
    #[error("asset {url} does not share the base URL {expected}")]
    MixedBaseUrls {
        /// Base URL established by the first asset.
        expected: String,
        /// The offending asset URL.
        url: String,
    },

    /// An asset URL has no path component after the authority.
    #[error("asset URL has no path component: {0}")]
    MalformedAssetUrl(String),
}

/// The normalized instruction set a fetcher consumes to materialize one
/// dataset.
///
/// Built once by the locator from a bounding region, immutable afterwards,
/// consumed exactly once by the fetcher.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceDescription {
    /// An enumerable set of remote files sharing a single base URL.
    FileSet(FileSet),
    /// A single WMS GetMap query.
    WmsQuery(WmsQuery),
}

/// A set of remote file paths relative to one shared base URL.
///
/// The single-base-URL invariant is enforced at construction; the path order
/// is whatever the locator produced and is kept stable for reproducibility.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSet {
    base_url: String,
    file_paths: Vec<String>,
}

impl FileSet {
    /// Build a file set from one base URL and relative paths.
    ///
    /// A trailing slash on the base URL is dropped so the fetcher can always
    /// join with exactly one separator.
    pub fn new(base_url: impl Into<String>, file_paths: Vec<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            file_paths,
        }
    }

    /// Build a file set from absolute asset URLs.
    ///
    /// Each URL is split into its scheme+authority base and relative path;
    /// every asset must resolve to the same base URL or construction fails.
    pub fn from_urls<I, S>(urls: I) -> Result<Self, DescriptionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut base: Option<String> = None;
        let mut paths = Vec::new();

        for url in urls {
            let url = url.as_ref();
            let (url_base, path) = split_asset_url(url)?;
            match &base {
                None => base = Some(url_base.to_string()),
                Some(expected) if expected != url_base => {
                    return Err(DescriptionError::MixedBaseUrls {
                        expected: expected.clone(),
                        url: url.to_string(),
                    });
                }
                Some(_) => {}
            }
            paths.push(path.to_string());
        }

        Ok(Self {
            base_url: base.unwrap_or_default(),
            file_paths: paths,
        })
    }

    /// The shared base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The relative file paths, in locator order.
    pub fn file_paths(&self) -> &[String] {
        &self.file_paths
    }

    /// Number of files in the set.
    pub fn len(&self) -> usize {
        self.file_paths.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.file_paths.is_empty()
    }
}

/// Split an absolute URL into scheme+authority and the relative path.
fn split_asset_url(url: &str) -> Result<(&str, &str), DescriptionError> {
    let authority_start = url
        .find("://")
        .map(|i| i + 3)
        .ok_or_else(|| DescriptionError::MalformedAssetUrl(url.to_string()))?;
    let path_start = url[authority_start..]
        .find('/')
        .map(|i| authority_start + i)
        .ok_or_else(|| DescriptionError::MalformedAssetUrl(url.to_string()))?;
    Ok((&url[..path_start], &url[path_start + 1..]))
}

/// A single WMS GetMap query.
#[derive(Debug, Clone, PartialEq)]
pub struct WmsQuery {
    /// WMS endpoint.
    pub base_url: String,
    /// Target rectangle in the projected CRS, before edge expansion.
    pub bounding_box: BoundingBox,
    /// Layer to render.
    pub layer_name: String,
    /// Named style.
    pub style: String,
    /// WMS protocol version.
    pub protocol_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_set_strips_trailing_slash() {
        let fs = FileSet::new("https://x/y/", vec!["a.tif".into()]);
        assert_eq!(fs.base_url(), "https://x/y");
    }

    #[test]
    fn test_from_urls_shared_base() {
        let fs = FileSet::from_urls([
            "https://host.example/data/a/one.tif",
            "https://host.example/data/b/two.tif",
        ])
        .unwrap();
        assert_eq!(fs.base_url(), "https://host.example");
        assert_eq!(fs.file_paths(), ["data/a/one.tif", "data/b/two.tif"]);
    }

    #[test]
    fn test_from_urls_mixed_base_rejected() {
        let err = FileSet::from_urls([
            "https://host-a.example/data/one.tif",
            "https://host-b.example/data/two.tif",
        ])
        .unwrap_err();
        assert!(matches!(err, DescriptionError::MixedBaseUrls { .. }));
    }

    #[test]
    fn test_from_urls_no_path_rejected() {
        let err = FileSet::from_urls(["https://host.example"]).unwrap_err();
        assert!(matches!(err, DescriptionError::MalformedAssetUrl(_)));
    }

    #[test]
    fn test_from_urls_preserves_order() {
        let fs = FileSet::from_urls([
            "https://h.example/z.tif",
            "https://h.example/a.tif",
            "https://h.example/m.tif",
        ])
        .unwrap();
        assert_eq!(fs.file_paths(), ["z.tif", "a.tif", "m.tif"]);
    }
}
