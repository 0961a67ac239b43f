//! Core request flow.
//!
//! - **Client** (`client`): the [`DocExtract`](client::DocExtract) entry point and its builder
//! - **Validation** (`validation`): structure checks, type resolution and admission
//! - **Resolver** (`resolver`): content-type lookup for URL-only documents
//! - **MIME** (`mime`): MIME constants, syntax checks and the allow-set registry
//! - **Configuration** (`config`): admission policy, allow-sets and timeouts, loadable from files
//!
//! # Example
//!
//! ```rust,no_run
//! use docextract::core::client::DocExtract;
//! use docextract::core::config::ClientConfig;
//! use docextract::Document;
//!
//! # async fn example() -> docextract::Result<()> {
//! let client = DocExtract::with_config(ClientConfig::allowlist())?;
//! let result = client.extract(&Document::from_bytes("a.pdf", "application/pdf", vec![])).await?;
//! assert_eq!(result.text, "Document extracted");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod mime;
pub mod resolver;
pub mod validation;

pub use client::{ADMITTED_MARKER, DocExtract, DocExtractBuilder};
pub use config::{AdmissionPolicy, ClientConfig};
pub use mime::TypeRegistry;
pub use resolver::{ContentTypeResolver, HttpContentTypeResolver};
