//! Error types for docextract.
//!
//! Every failure the extraction core can raise is a distinct variant of
//! [`DocExtractError`], so callers can branch on the kind of failure instead of
//! matching on message strings.
//!
//! # Error Handling Philosophy
//!
//! **Validation errors fail fast.** The validator stops at the first violated
//! rule and reports it with a dedicated variant:
//!
//! - `MissingSource`, `MissingFilename`, `MissingType` - structural problems
//! - `InvalidUrl` - the URL does not parse as an absolute URL
//! - `ResolutionFailed`, `MissingContentType` - the content-type probe failed
//! - `DisallowedType` - the type is outside the configured allow-sets
//! - `NoProcessor` - no processor is registered for the type
//!
//! **Processor errors pass through unchanged.** Whatever a processor returns
//! from `process` reaches the caller as-is. Built-in processors report parse
//! failures as `ProcessingFailed`.
//!
//! **System errors bubble up:** `Io` is never wrapped or suppressed.
//!
//! # Example
//!
//! ```rust
//! use docextract::{DocExtractError, Document, Result};
//!
//! fn check(document: &Document) -> Result<()> {
//!     if document.url.is_none() && document.contents.is_none() {
//!         return Err(DocExtractError::MissingSource);
//!     }
//!     Ok(())
//! }
//!
//! let err = check(&Document::default()).unwrap_err();
//! assert_eq!(err.kind(), "missing_source");
//! ```
use thiserror::Error;

/// Result type alias using `DocExtractError`.
pub type Result<T> = std::result::Result<T, DocExtractError>;

/// Main error type for all docextract operations.
#[derive(Debug, Error)]
pub enum DocExtractError {
    #[error("Document must have a url or contents")]
    MissingSource,

    #[error("Filename is required when providing document contents")]
    MissingFilename,

    #[error("Type is required when providing document contents")]
    MissingType,

    #[error("Invalid URL format: {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP error! status: {status}")]
    ResolutionFailed { url: String, status: u16 },

    #[error("Content-Type header not found for {url}")]
    MissingContentType { url: String },

    #[error("File type '{mime_type}' is not allowed. Allowed types: {}", .allowed.join(", "))]
    DisallowedType { mime_type: String, allowed: Vec<String> },

    #[error("No processor registered for document type: {mime_type}")]
    NoProcessor { mime_type: String, registered: Vec<String> },

    #[error("{message}")]
    ProcessingFailed {
        processor: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{operation} timed out after {elapsed_ms}ms")]
    Timeout { operation: String, elapsed_ms: u128 },

    #[error("HTTP request failed: {message}")]
    Http {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Plugin error in '{plugin_name}': {message}")]
    Plugin { message: String, plugin_name: String },
}

impl From<reqwest::Error> for DocExtractError {
    fn from(err: reqwest::Error) -> Self {
        DocExtractError::Http {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl DocExtractError {
    error_constructor!(validation, Validation);
    error_constructor!(http, Http);

    /// Create a `ProcessingFailed` error attributed to `processor`.
    pub fn processing<P: Into<String>, S: Into<String>>(processor: P, message: S) -> Self {
        Self::ProcessingFailed {
            processor: processor.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn processing_with_source<P, S, E>(processor: P, message: S, source: E) -> Self
    where
        P: Into<String>,
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ProcessingFailed {
            processor: processor.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Stable, machine-readable name of the error kind.
    ///
    /// Host applications use this to map failures onto exit codes or HTTP
    /// statuses without parsing messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingSource => "missing_source",
            Self::MissingFilename => "missing_filename",
            Self::MissingType => "missing_type",
            Self::InvalidUrl { .. } => "invalid_url",
            Self::ResolutionFailed { .. } => "resolution_failed",
            Self::MissingContentType { .. } => "missing_content_type",
            Self::DisallowedType { .. } => "disallowed_type",
            Self::NoProcessor { .. } => "no_processor",
            Self::ProcessingFailed { .. } => "processing_failed",
            Self::Timeout { .. } => "timeout",
            Self::Http { .. } => "http",
            Self::Validation { .. } => "validation",
            Self::Io(_) => "io",
            Self::Plugin { .. } => "plugin",
        }
    }

    /// Whether this error was raised by document validation, as opposed to
    /// transport, processor or system failures.
    pub fn is_validation_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingSource
                | Self::MissingFilename
                | Self::MissingType
                | Self::InvalidUrl { .. }
                | Self::ResolutionFailed { .. }
                | Self::MissingContentType { .. }
                | Self::DisallowedType { .. }
                | Self::NoProcessor { .. }
        )
    }
}
