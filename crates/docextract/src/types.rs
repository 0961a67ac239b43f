//! Document descriptors and extraction results.

use serde::{Deserialize, Serialize};

/// A document handed to [`DocExtract::extract`](crate::DocExtract::extract).
///
/// A document carries its bytes inline (`contents`), points at a remote
/// resource (`url`), or both. When `contents` is present, `filename` and
/// `mime_type` are mandatory. A URL-only document may omit both; its type is
/// then inferred from the server's `Content-Type` header.
///
/// # Example
///
/// ```rust
/// use docextract::Document;
///
/// let inline = Document::from_bytes("report.pdf", "application/pdf", b"%PDF-1.7".to_vec());
/// assert!(inline.contents.is_some());
///
/// let remote = Document::from_url("https://example.com/report.pdf");
/// assert!(remote.mime_type.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Name of the document, e.g. `report.pdf`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Declared MIME type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Absolute URL of the remote resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Raw document bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<u8>>,
}

impl Document {
    /// Create a document from inline bytes.
    pub fn from_bytes(filename: impl Into<String>, mime_type: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            filename: Some(filename.into()),
            mime_type: Some(mime_type.into()),
            url: None,
            contents: Some(contents),
        }
    }

    /// Create a document that points at a remote resource.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_contents(mut self, contents: Vec<u8>) -> Self {
        self.contents = Some(contents);
        self
    }

    /// The declared MIME type, trimmed. Blank declarations count as absent.
    pub fn declared_mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref().map(str::trim).filter(|mime| !mime.is_empty())
    }
}

/// Text extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// The extracted text, exactly as the processor returned it.
    pub text: String,

    /// The MIME type the document was admitted under (declared or resolved).
    pub mime_type: String,

    /// Name of the processor that produced `text`.
    ///
    /// `None` when the client runs in allowlist-only mode and no processor was
    /// involved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
}
