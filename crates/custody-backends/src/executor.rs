// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Authenticated request execution for the REST-style backends
//!
//! [`RequestExecutor`] is the single place where the REST adapters touch the
//! network. It merges request headers over the adapter's fixed defaults (which
//! carry the credential), performs exactly one attempt, and classifies the outcome
//! into a [`BackendError`]:
//!
//! - no response (DNS, connect, reset, deadline) → [`BackendError::Network`]
//! - non-2xx → [`BackendError::Http`] with the response body as text
//! - 2xx that is not JSON → [`BackendError::Decode`]
//!
//! Retrying is left to callers.

use std::{fmt, time::Duration};

use custody_client::BackendError;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue},
};
use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, warn};
use url::Url;

use crate::error::SetupError;

/// Default request deadline in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

const USER_AGENT: &str = concat!("custody-gateway/", env!("CARGO_PKG_VERSION"));

/// Path below a backend base URL, kept as raw segments
///
/// Segments are percent-encoded when the request URL is built, so caller input
/// such as wallet ids can never add or escape path segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestPath(Vec<String>);

impl RequestPath {
    /// Create an empty path (the base URL itself)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one raw segment
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    /// Raw, unencoded segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Resolve this path below `base_url`, percent-encoding every segment
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Config`] if `base_url` cannot carry a path
    pub fn resolve(&self, base_url: &Url) -> Result<Url, SetupError> {
        let mut url = base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SetupError::Config(format!("base URL cannot carry a path: {base_url}")))?
            .pop_if_empty()
            .extend(self.segments());
        Ok(url)
    }
}

impl fmt::Display for RequestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// Parse and check a backend base URL
///
/// # Errors
///
/// Returns [`SetupError::Config`] if the URL is malformed or cannot carry a path
pub fn parse_base_url(value: &str) -> Result<Url, SetupError> {
    let url = Url::parse(value)
        .map_err(|e| SetupError::Config(format!("invalid base URL {value}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(SetupError::Config(format!(
            "base URL cannot carry a path: {value}"
        )));
    }
    Ok(url)
}

/// Build a header value from configuration input
///
/// # Errors
///
/// Returns [`SetupError::Config`] if the value contains characters not allowed in headers
pub fn header_value(name: &str, value: &str) -> Result<HeaderValue, SetupError> {
    HeaderValue::from_str(value).map_err(|e: InvalidHeaderValue| {
        SetupError::Config(format!("invalid value for header {name}: {e}"))
    })
}

/// Merge `overrides` over `defaults`
///
/// A header present in `overrides` replaces every default value of the same name.
/// All values of an overriding header are kept, in the order they were given.
pub fn merge_headers(defaults: &HeaderMap, overrides: &HeaderMap) -> HeaderMap {
    let mut merged = defaults.clone();
    for name in overrides.keys() {
        merged.remove(name);
        for value in overrides.get_all(name) {
            merged.append(name.clone(), value.clone());
        }
    }
    merged
}

/// Executes authenticated JSON requests against one backend
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    client: Client,
    default_headers: HeaderMap,
    timeout: Duration,
}

impl RequestExecutor {
    /// Create a new executor
    ///
    /// # Arguments
    ///
    /// * `default_headers` - Fixed headers sent with every request (credentials, accept)
    /// * `timeout_seconds` - Deadline for one complete request/response exchange
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(default_headers: HeaderMap, timeout_seconds: u64) -> Result<Self, SetupError> {
        if timeout_seconds == 0 {
            return Err(SetupError::Config(
                "request timeout must be greater than 0".to_string(),
            ));
        }

        let timeout = Duration::from_secs(timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            default_headers,
            timeout,
        })
    }

    /// Headers sent with every request
    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Perform one GET request and decode the JSON body
    ///
    /// # Arguments
    ///
    /// * `base_url` - Backend base URL, may itself carry a path prefix
    /// * `path` - Path below the base URL
    /// * `query` - Query parameters, appended in order
    /// * `headers` - Request headers, merged over the executor defaults
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Network`], [`BackendError::Http`] or
    /// [`BackendError::Decode`] as described in the module documentation
    pub async fn execute(
        &self,
        base_url: &Url,
        path: &RequestPath,
        query: &[(&str, String)],
        headers: &HeaderMap,
    ) -> Result<Value, BackendError> {
        let url = path.resolve(base_url).map_err(|e| BackendError::Network {
            cause: e.to_string(),
        })?;

        debug!(%url, ?query, "executing backend request");

        let request = self
            .client
            .get(url.clone())
            .query(query)
            .headers(merge_headers(&self.default_headers, headers));

        let exchange = async {
            let response = request.send().await.map_err(network_error)?;
            let status = response.status();
            let body = response.bytes().await.map_err(network_error)?;
            Ok::<_, BackendError>((status, body))
        };

        let (status, body) = timeout(self.timeout, exchange)
            .await
            .map_err(|_| BackendError::Network {
                cause: format!("request timed out after {} seconds", self.timeout.as_secs()),
            })??;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            warn!(%url, status = status.as_u16(), %body, "backend returned error status");
            return Err(BackendError::Http {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_slice(&body).map_err(|e| {
            warn!(%url, error = %e, "backend returned malformed JSON");
            BackendError::decode(e)
        })
    }
}

fn network_error(error: reqwest::Error) -> BackendError {
    BackendError::Network {
        cause: error.to_string(),
    }
}

/// Header name helper for static names
pub(crate) const fn static_header(name: &'static str) -> HeaderName {
    HeaderName::from_static(name)
}
