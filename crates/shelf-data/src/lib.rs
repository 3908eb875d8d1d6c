//! Hosted backend client for Shelf.
//!
//! [`FetchClient`] is a small request/response layer over `reqwest`.
//! [`RestBackend`] uses it to implement
//! [`BackendService`](shelf_commerce::backend::BackendService) against the
//! hosted service's REST tables, RPC functions, auth, object storage and
//! server functions.
//!
//! # Example
//!
//! ```rust,ignore
//! use shelf_data::{RestBackend, RestConfig};
//! use shelf_commerce::catalog::aggregate;
//!
//! let backend = RestBackend::new(RestConfig {
//!     url: "https://project.example.co".to_string(),
//!     anon_key: "public-anon-key".to_string(),
//!     access_token: None,
//!     storage_bucket: "book-images".to_string(),
//! })?;
//!
//! let catalog = aggregate(&backend).await;
//! ```

mod error;
mod request;
mod response;
mod rest;
mod rows;

use std::collections::HashMap;

pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;
pub use rest::{RestBackend, RestConfig, Session};

/// HTTP client for the hosted backend.
///
/// Wraps a `reqwest::Client` with a base URL and default headers that are
/// applied to every request.
#[derive(Debug, Clone)]
pub struct FetchClient {
    inner: reqwest::Client,
    base_url: String,
    default_headers: HashMap<String, String>,
}

impl FetchClient {
    /// Create a client for `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let base_url = base_url.into();
        let trimmed = base_url.trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(FetchError::InvalidUrl(base_url));
        }
        let inner = reqwest::Client::builder()
            .user_agent(concat!("shelf/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            inner,
            base_url: trimmed.to_string(),
            default_headers: HashMap::new(),
        })
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a GET request.
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::Get, path)
    }

    /// Create a POST request.
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::Post, path)
    }

    /// Create a PATCH request.
    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.request(Method::Patch, path)
    }

    /// Create a DELETE request.
    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.request(Method::Delete, path)
    }

    /// Create a request for `path`, relative to the base URL.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        };

        let mut builder = RequestBuilder::new(method, url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }
        builder
    }

    /// Send a request and read the whole response.
    ///
    /// Non-2xx responses are returned as-is; call
    /// [`Response::error_for_status`] to turn them into errors.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let method = request.method;
        tracing::debug!(method = method.as_str(), url = %request.url, "sending request");

        let mut outgoing = self
            .inner
            .request(method.to_reqwest(), &request.url)
            .query(&request.query);
        for (key, value) in &request.headers {
            outgoing = outgoing.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            outgoing = outgoing.body(body);
        }

        let response = outgoing.send().await?;
        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(status, bytes = body.len(), "received response");
        Ok(Response::new(status, headers, body))
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, Method, Response, RestBackend, RestConfig};
}
