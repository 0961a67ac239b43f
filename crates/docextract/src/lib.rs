//! docextract - pluggable document text extraction
//!
//! docextract accepts a [`Document`] (a filename, a declared MIME type and either
//! a URL or raw bytes), checks that it is well-formed, resolves its MIME type
//! (probing the URL when no type is declared), decides whether the type is
//! admitted, and hands it to the processor registered for that type.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use docextract::{DocExtract, Document, DocumentProcessor, Plugin, Result};
//!
//! struct UppercaseProcessor;
//!
//! impl Plugin for UppercaseProcessor {
//!     fn name(&self) -> &str { "uppercase" }
//!     fn version(&self) -> String { "1.0.0".to_string() }
//! }
//!
//! #[async_trait]
//! impl DocumentProcessor for UppercaseProcessor {
//!     fn supported_mime_type(&self) -> &str { "text/plain" }
//!
//!     async fn process(&self, document: &Document) -> Result<String> {
//!         let bytes = document.contents.as_deref().unwrap_or_default();
//!         Ok(String::from_utf8_lossy(bytes).to_uppercase())
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let mut client = DocExtract::new();
//! client.register_processor(Arc::new(UppercaseProcessor))?;
//!
//! let document = Document::from_bytes("notes.txt", "text/plain", b"hello".to_vec());
//! assert_eq!(client.extract_text(&document).await?, "HELLO");
//! # Ok(())
//! # }
//! ```
//!
//! # Admission Policies
//!
//! - **`Allowlist`**: admit types from the configured document and image sets;
//!   admitted documents yield the fixed text `"Document extracted"`
//! - **`Processors`**: admit exactly the types with a registered processor
//! - **`AllowlistAndProcessors`**: both checks, allow-sets first
//!
//! # Features
//!
//! - `pdf` - built-in PDF text processor
//! - `office` - built-in DOCX processor
//! - `image` - built-in image processor
//! - `full` - all of the above

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod plugins;
pub mod types;

#[cfg(any(feature = "pdf", feature = "office", feature = "image"))]
pub mod processors;

pub use error::{DocExtractError, Result};
pub use types::{Document, ExtractionResult};

pub use core::client::{ADMITTED_MARKER, DocExtract, DocExtractBuilder};
pub use core::config::{AdmissionPolicy, CONFIG_FILE_NAME, ClientConfig};
pub use core::mime::{
    DEFAULT_ALLOWED_DOCUMENTS, DEFAULT_ALLOWED_IMAGES, DOCX_MIME_TYPE, JPEG_MIME_TYPE, JPG_MIME_TYPE,
    LEGACY_WORD_MIME_TYPE, ODT_MIME_TYPE, PDF_MIME_TYPE, PNG_MIME_TYPE, TypeRegistry, WEBP_MIME_TYPE,
    validate_mime_type,
};
pub use core::resolver::{ContentTypeResolver, HttpContentTypeResolver};

pub use plugins::{DocumentProcessor, Plugin, ProcessorRegistry};
