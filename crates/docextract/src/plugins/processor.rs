//! Document processor plugin trait.

use crate::Result;
use crate::plugins::Plugin;
use crate::types::Document;
use async_trait::async_trait;

/// Turns a document of one MIME type into text.
///
/// The client only calls `process` after the document has passed validation
/// and its MIME type has been resolved to one this processor is registered
/// under. Beyond that the client assumes nothing: a processor given a URL-only
/// document must fetch the bytes itself, and any error it returns reaches the
/// caller unchanged.
///
/// # Registration keys
///
/// A processor is reachable under [`supported_mime_type`](Self::supported_mime_type)
/// and each of [`additional_mime_types`](Self::additional_mime_types). Matching
/// is exact; there is no wildcard or prefix lookup.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use docextract::plugins::{DocumentProcessor, Plugin};
/// use docextract::{DocExtractError, Document, Result};
///
/// struct PlainTextProcessor;
///
/// impl Plugin for PlainTextProcessor {
///     fn name(&self) -> &str { "plain-text" }
///     fn version(&self) -> String { "1.0.0".to_string() }
/// }
///
/// #[async_trait]
/// impl DocumentProcessor for PlainTextProcessor {
///     fn supported_mime_type(&self) -> &str {
///         "text/plain"
///     }
///
///     async fn process(&self, document: &Document) -> Result<String> {
///         let bytes = document
///             .contents
///             .as_deref()
///             .ok_or_else(|| DocExtractError::processing(self.name(), "Text document must have contents"))?;
///         Ok(String::from_utf8_lossy(bytes).into_owned())
///     }
/// }
/// ```
#[async_trait]
pub trait DocumentProcessor: Plugin {
    /// The primary MIME type this processor handles.
    fn supported_mime_type(&self) -> &str;

    /// Further exact MIME types to register this processor under.
    ///
    /// Defaults to none. An image processor, for example, can list
    /// `image/png` and `image/webp` here next to a primary `image/jpeg`.
    fn additional_mime_types(&self) -> &[&str] {
        &[]
    }

    /// Extract text from `document`.
    ///
    /// # Errors
    ///
    /// Any error; it is propagated to the caller of `extract` as-is.
    async fn process(&self, document: &Document) -> Result<String>;
}
