//! MIME type constants, syntax helpers and the allow-set type registry.
//!
//! The [`TypeRegistry`] holds the two ordered allow-sets a client admits in
//! allowlist mode: document types and image types. Both are fixed once the
//! registry is built.

use crate::{DocExtractError, Result};
use indexmap::IndexSet;

pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const LEGACY_WORD_MIME_TYPE: &str = "application/msword";
pub const DOCX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const ODT_MIME_TYPE: &str = "application/vnd.oasis.opendocument.text";

pub const JPEG_MIME_TYPE: &str = "image/jpeg";
pub const JPG_MIME_TYPE: &str = "image/jpg";
pub const PNG_MIME_TYPE: &str = "image/png";
pub const WEBP_MIME_TYPE: &str = "image/webp";

/// Document types admitted when no override is configured.
pub const DEFAULT_ALLOWED_DOCUMENTS: &[&str] = &[PDF_MIME_TYPE, LEGACY_WORD_MIME_TYPE, DOCX_MIME_TYPE, ODT_MIME_TYPE];

/// Image types admitted when no override is configured.
///
/// `image/jpg` is not a registered type but is sent by enough servers and
/// clients that it is accepted as an alias of `image/jpeg`.
pub const DEFAULT_ALLOWED_IMAGES: &[&str] = &[JPEG_MIME_TYPE, PNG_MIME_TYPE, JPG_MIME_TYPE, WEBP_MIME_TYPE];

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$&-^_.+".contains(c)
}

/// Check that `mime_type` is a bare `type/subtype` pair.
///
/// Parameters (`; charset=...`) are rejected; strip them with
/// [`parse_content_type`] first.
///
/// # Errors
///
/// Returns `DocExtractError::Validation` if the string is not a well-formed MIME type.
pub fn validate_mime_type(mime_type: &str) -> Result<()> {
    let malformed = || DocExtractError::validation(format!("Malformed MIME type '{}'", mime_type));

    let (top, sub) = mime_type.split_once('/').ok_or_else(malformed)?;
    if top.is_empty() || sub.is_empty() {
        return Err(malformed());
    }
    if !top.chars().all(is_token_char) || !sub.chars().all(is_token_char) {
        return Err(malformed());
    }
    Ok(())
}

/// Extract the MIME type from a `Content-Type` header value.
///
/// Takes everything before the first `;` and trims surrounding whitespace, so
/// `application/pdf; charset=binary` yields `application/pdf`. Returns `None`
/// if nothing is left.
pub fn parse_content_type(header_value: &str) -> Option<String> {
    let essence = header_value.split(';').next().unwrap_or_default().trim();
    if essence.is_empty() {
        None
    } else {
        Some(essence.to_string())
    }
}

/// Whether `mime_type` belongs to the `image/` family.
pub fn is_image_mime_type(mime_type: &str) -> bool {
    mime_type
        .split_once('/')
        .is_some_and(|(top, _)| top.eq_ignore_ascii_case("image"))
}

/// The allow-sets of a client running in allowlist mode.
///
/// A MIME type is admitted iff it appears in either set. Lookups are exact and
/// case-sensitive, matching what the server or caller declared.
///
/// # Example
///
/// ```rust
/// use docextract::core::mime::TypeRegistry;
///
/// let registry = TypeRegistry::default();
/// assert!(registry.is_allowed("application/pdf"));
/// assert!(!registry.is_allowed("image/gif"));
///
/// let jpeg_only = TypeRegistry::new(["application/pdf"], ["image/jpeg"]).unwrap();
/// assert!(!jpeg_only.is_allowed("image/png"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRegistry {
    documents: IndexSet<String>,
    images: IndexSet<String>,
}

impl TypeRegistry {
    /// Build a registry from explicit allow-sets.
    ///
    /// Duplicates are collapsed, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns `DocExtractError::Validation` if any entry is malformed, if an
    /// image entry is outside `image/`, or if a document entry is inside it.
    pub fn new<D, I>(documents: D, images: I) -> Result<Self>
    where
        D: IntoIterator,
        D::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let documents: IndexSet<String> = documents.into_iter().map(Into::into).collect();
        let images: IndexSet<String> = images.into_iter().map(Into::into).collect();

        for mime_type in &documents {
            validate_mime_type(mime_type)?;
            if is_image_mime_type(mime_type) {
                return Err(DocExtractError::validation(format!(
                    "'{}' is an image type and cannot be listed in allowed_documents",
                    mime_type
                )));
            }
        }

        for mime_type in &images {
            validate_mime_type(mime_type)?;
            if !is_image_mime_type(mime_type) {
                return Err(DocExtractError::validation(format!(
                    "'{}' is not an image type and cannot be listed in allowed_images",
                    mime_type
                )));
            }
        }

        Ok(Self { documents, images })
    }

    pub fn is_allowed(&self, mime_type: &str) -> bool {
        self.is_document(mime_type) || self.is_image(mime_type)
    }

    pub fn is_document(&self, mime_type: &str) -> bool {
        self.documents.contains(mime_type)
    }

    pub fn is_image(&self, mime_type: &str) -> bool {
        self.images.contains(mime_type)
    }

    pub fn allowed_documents(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(String::as_str)
    }

    pub fn allowed_images(&self) -> impl Iterator<Item = &str> {
        self.images.iter().map(String::as_str)
    }

    /// Every admitted type: documents first, then images, in configured order.
    pub fn allowed_types(&self) -> Vec<String> {
        self.documents.iter().chain(self.images.iter()).cloned().collect()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self {
            documents: DEFAULT_ALLOWED_DOCUMENTS.iter().map(|s| s.to_string()).collect(),
            images: DEFAULT_ALLOWED_IMAGES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
