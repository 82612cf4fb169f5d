//! Blocking HTTP client abstraction.
//!
//! The locator and fetcher only ever issue GET requests; hiding them behind a
//! trait lets tests inject canned responses instead of a network.

use thiserror::Error;
use tracing::debug;

/// Default request timeout. A hung remote call fails the single item it
/// belongs to instead of stalling the whole run.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const USER_AGENT: &str = concat!("geofuse/", env!("CARGO_PKG_VERSION"));

/// HTTP failure, cloneable so mock clients can replay it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpError {
    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// The request never produced a response (timeout, DNS, connect, ...).
    #[error("request to {url} failed: {reason}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Stringified cause.
        reason: String,
    },
}

/// Blocking HTTP operations used by the pipeline.
pub trait HttpClient: Send + Sync {
    /// GET a URL, returning the body bytes on a success status.
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError>;

    /// GET a URL with extra request headers.
    fn get_with_headers(&self, url: &str, headers: &[(&str, &str)])
        -> Result<Vec<u8>, HttpError>;
}

/// Real client backed by `reqwest::blocking`.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Create a client with the default timeout.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Create a client with a custom per-request timeout in seconds.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HttpError::Transport {
                url: String::new(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    fn execute(&self, request: reqwest::blocking::RequestBuilder, url: &str) -> Result<Vec<u8>, HttpError> {
        let response = request.send().map_err(|e| HttpError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(|e| HttpError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        debug!(url, bytes = bytes.len(), "GET ok");
        Ok(bytes.to_vec())
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        self.execute(self.client.get(url), url)
    }

    fn get_with_headers(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>, HttpError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        self.execute(request, url)
    }
}

/// Canned-response client for tests.
///
/// Compiled unconditionally so downstream crates can use it from their own
/// test suites.
pub mod mock {
    use super::{HttpClient, HttpError};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock HTTP client replaying responses registered per URL.
    ///
    /// Unregistered URLs answer with status 404. Requested URLs are recorded
    /// for assertions.
    #[derive(Default)]
    pub struct MockHttpClient {
        responses: HashMap<String, Result<Vec<u8>, HttpError>>,
        requests: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        /// Empty mock; every request 404s.
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a success body for a URL.
        pub fn with_body(mut self, url: impl Into<String>, body: Vec<u8>) -> Self {
            self.responses.insert(url.into(), Ok(body));
            self
        }

        /// Register a failure status for a URL.
        pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
            let url = url.into();
            self.responses
                .insert(url.clone(), Err(HttpError::Status { url, status }));
            self
        }

        /// URLs requested so far, in order.
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
            self.requests.lock().unwrap().push(url.to_string());
            match self.responses.get(url) {
                Some(response) => response.clone(),
                None => Err(HttpError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }

        fn get_with_headers(
            &self,
            url: &str,
            _headers: &[(&str, &str)],
        ) -> Result<Vec<u8>, HttpError> {
            self.get(url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockHttpClient;
    use super::*;

    #[test]
    fn test_mock_replays_body() {
        let client = MockHttpClient::new().with_body("https://x/a", vec![1, 2, 3]);
        assert_eq!(client.get("https://x/a").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_mock_unregistered_url_is_404() {
        let client = MockHttpClient::new();
        let err = client.get("https://x/missing").unwrap_err();
        assert_eq!(
            err,
            HttpError::Status {
                url: "https://x/missing".into(),
                status: 404
            }
        );
    }

    #[test]
    fn test_mock_records_requests() {
        let client = MockHttpClient::new().with_status("https://x/a", 500);
        let _ = client.get("https://x/a");
        let _ = client.get_with_headers("https://x/b", &[("Accept", "application/json")]);
        assert_eq!(client.requests(), ["https://x/a", "https://x/b"]);
    }
}
