//! Built-in processors.
//!
//! Each processor is behind a cargo feature:
//!
//! - `pdf` - [`PdfProcessor`] (`application/pdf`, via lopdf)
//! - `office` - [`DocxProcessor`] (DOCX, via docx-lite)
//! - `image` - [`ImageProcessor`] (JPEG, PNG, WebP)
//!
//! Processors read inline `contents` when present and otherwise download the
//! document from its URL.

#[cfg(feature = "office")]
mod docx;
#[cfg(feature = "image")]
mod image;
#[cfg(feature = "pdf")]
mod pdf;

#[cfg(feature = "office")]
pub use self::docx::DocxProcessor;
#[cfg(feature = "image")]
pub use self::image::ImageProcessor;
#[cfg(feature = "pdf")]
pub use self::pdf::PdfProcessor;

use crate::core::validation::parse_url;
use crate::types::Document;
use crate::{DocExtractError, Result};
use std::borrow::Cow;

/// The document's bytes: inline contents, or the body fetched from its URL.
///
/// # Errors
///
/// - `DocExtractError::ResolutionFailed` - the download answered with a non-success status
/// - `DocExtractError::Http` - the download could not be completed
/// - `DocExtractError::ProcessingFailed` - the document has neither contents nor a URL
pub(crate) async fn load_contents<'a>(
    processor: &str,
    document: &'a Document,
    client: &reqwest::Client,
) -> Result<Cow<'a, [u8]>> {
    if let Some(contents) = document.contents.as_deref() {
        return Ok(Cow::Borrowed(contents));
    }

    let url = document
        .url
        .as_deref()
        .ok_or_else(|| DocExtractError::processing(processor, "Document has neither contents nor a URL"))?;
    let url = parse_url(url)?;

    tracing::debug!(processor, url = %url, "downloading document");
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DocExtractError::ResolutionFailed {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(Cow::Owned(response.bytes().await?.to_vec()))
}
