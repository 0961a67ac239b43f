//! Content-type resolution for URL-sourced documents.
//!
//! When a document arrives with a URL but no declared type, the validator asks a
//! [`ContentTypeResolver`] for it. The default implementation issues a single
//! `HEAD` request and reads the `Content-Type` header. The body is never
//! downloaded, and neither file extensions nor magic bytes are consulted: a
//! server that mislabels a resource yields a wrong type, which then surfaces as
//! `DisallowedType` or `NoProcessor`.

use crate::core::config::ClientConfig;
use crate::core::mime::parse_content_type;
use crate::{DocExtractError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use url::Url;

/// Infers the MIME type of a remote resource.
///
/// Implementations must not retry; a failed probe is reported immediately.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use docextract::core::resolver::ContentTypeResolver;
/// use docextract::Result;
/// use url::Url;
///
/// /// Resolver for an internal store where every object is a PDF.
/// struct PdfStore;
///
/// #[async_trait]
/// impl ContentTypeResolver for PdfStore {
///     async fn resolve(&self, _url: &Url) -> Result<String> {
///         Ok("application/pdf".to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait ContentTypeResolver: Send + Sync {
    /// Return the bare MIME type (no parameters) of the resource at `url`.
    ///
    /// # Errors
    ///
    /// - `DocExtractError::ResolutionFailed` - the server answered with a non-success status
    /// - `DocExtractError::MissingContentType` - no usable `Content-Type` header
    /// - `DocExtractError::Http` - the request could not be completed
    async fn resolve(&self, url: &Url) -> Result<String>;
}

/// Resolves content types with an HTTP `HEAD` request.
#[derive(Debug, Clone)]
pub struct HttpContentTypeResolver {
    client: reqwest::Client,
}

impl HttpContentTypeResolver {
    /// Create a resolver with a default `reqwest` client.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a resolver honouring the probe timeout and user agent in `config`.
    ///
    /// # Errors
    ///
    /// Returns `DocExtractError::Http` if the HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialise).
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.probe_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DocExtractError::http_with_source("Failed to build HTTP client", e))?;
        Ok(Self { client })
    }

    /// Use an existing `reqwest` client, e.g. one shared with the host application.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpContentTypeResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentTypeResolver for HttpContentTypeResolver {
    #[tracing::instrument(name = "resolve_content_type", skip(self), fields(url = %url))]
    async fn resolve(&self, url: &Url) -> Result<String> {
        let response = self.client.head(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "content-type probe failed");
            return Err(DocExtractError::ResolutionFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_type)
            .ok_or_else(|| DocExtractError::MissingContentType { url: url.to_string() })?;

        tracing::debug!(mime_type = %mime_type, "resolved content type");
        Ok(mime_type)
    }
}
