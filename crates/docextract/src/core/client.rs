//! The extraction client.
//!
//! [`DocExtract`] owns the allow-sets, the processor registry and the
//! content-type resolver, and runs the request flow:
//!
//! ```text
//! Document -> structure checks -> type resolution -> admission -> processor -> ExtractionResult
//! ```
//!
//! The client is built once and shared. Extraction takes `&self` and may run
//! concurrently; registering processors takes `&mut self` and therefore
//! happens before the client is shared.

use crate::core::config::{AdmissionPolicy, ClientConfig};
use crate::core::mime::TypeRegistry;
use crate::core::resolver::{ContentTypeResolver, HttpContentTypeResolver};
use crate::core::validation::validate_document;
use crate::plugins::{DocumentProcessor, ProcessorRegistry};
use crate::types::{Document, ExtractionResult};
use crate::{DocExtractError, Result};
use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Text returned for admitted documents in allowlist-only mode.
pub const ADMITTED_MARKER: &str = "Document extracted";

/// Global Tokio runtime for [`DocExtract::extract_sync`].
///
/// Created on first use and shared by every client. Building a runtime only
/// fails when the process is out of threads or memory, at which point no
/// extraction can proceed either.
static GLOBAL_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create global Tokio runtime - system may be out of resources")
});

/// Document extraction client.
///
/// # Example
///
/// ```rust,no_run
/// use docextract::{DocExtract, Document};
///
/// # async fn example() -> docextract::Result<()> {
/// let client = DocExtract::new();
/// // client.register_processor(Arc::new(MyPdfProcessor))?;
///
/// let document = Document::from_url("https://example.com/report.pdf");
/// let result = client.extract(&document).await?;
/// println!("{}", result.text);
/// # Ok(())
/// # }
/// ```
pub struct DocExtract {
    config: ClientConfig,
    policy: AdmissionPolicy,
    types: TypeRegistry,
    processors: ProcessorRegistry,
    resolver: Arc<dyn ContentTypeResolver>,
}

impl DocExtract {
    /// Client in processor-registry mode with the default HTTP resolver.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            policy: AdmissionPolicy::Processors,
            types: TypeRegistry::default(),
            processors: ProcessorRegistry::new(),
            resolver: Arc::new(HttpContentTypeResolver::new()),
        }
    }

    /// Client built from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `DocExtractError::Validation` if the configuration is invalid.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    pub fn builder() -> DocExtractBuilder {
        DocExtractBuilder::default()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn policy(&self) -> AdmissionPolicy {
        self.policy
    }

    pub fn type_registry(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn processors(&self) -> &ProcessorRegistry {
        &self.processors
    }

    /// Register a processor; a later registration for the same MIME type
    /// replaces the earlier one.
    ///
    /// # Errors
    ///
    /// - `DocExtractError::Validation` in allowlist-only mode, where processors are never consulted
    /// - any error from [`ProcessorRegistry::register`]
    pub fn register_processor(&mut self, processor: Arc<dyn DocumentProcessor>) -> Result<()> {
        if !self.policy.dispatches() {
            return Err(DocExtractError::validation(format!(
                "Cannot register processor '{}': client runs in allowlist-only mode",
                processor.name()
            )));
        }
        self.processors.register(processor)
    }

    /// Whether a document of `mime_type` would be admitted.
    pub fn supports_document_type(&self, mime_type: &str) -> bool {
        let allowed = !self.policy.uses_allowlist() || self.types.is_allowed(mime_type);
        let processed = !self.policy.dispatches() || self.processors.supports(mime_type);
        allowed && processed
    }

    /// Admitted MIME types.
    ///
    /// Registered types in registration order when processors dispatch (limited
    /// to the allow-sets under `AllowlistAndProcessors`); the allow-sets
    /// otherwise.
    pub fn supported_mime_types(&self) -> Vec<String> {
        match self.policy {
            AdmissionPolicy::Allowlist => self.types.allowed_types(),
            AdmissionPolicy::Processors => self.processors.list(),
            AdmissionPolicy::AllowlistAndProcessors => self
                .processors
                .list()
                .into_iter()
                .filter(|mime_type| self.types.is_allowed(mime_type))
                .collect(),
        }
    }

    /// Validate `document` and extract its text.
    ///
    /// Applies `processing_timeout_secs` from the configuration, if set, to
    /// the whole call: content-type lookup and processor alike.
    ///
    /// # Errors
    ///
    /// The first validation failure (`MissingSource`, `MissingFilename`,
    /// `MissingType`, `InvalidUrl`, `ResolutionFailed`, `MissingContentType`,
    /// `DisallowedType`, `NoProcessor`), `Timeout` if the deadline passes, or
    /// the processor's own error, unchanged.
    pub async fn extract(&self, document: &Document) -> Result<ExtractionResult> {
        self.run(document, self.config.processing_timeout()).await
    }

    /// Like [`extract`](Self::extract), returning only the text.
    pub async fn extract_text(&self, document: &Document) -> Result<String> {
        self.extract(document).await.map(|result| result.text)
    }

    /// Like [`extract`](Self::extract) with a deadline for this call only.
    ///
    /// The deadline covers validation, the content-type lookup and the
    /// processor. Errors raised before it passes are returned unchanged.
    pub async fn extract_with_timeout(&self, document: &Document, timeout: Duration) -> Result<ExtractionResult> {
        self.run(document, Some(timeout)).await
    }

    /// Blocking variant of [`extract`](Self::extract).
    ///
    /// Runs on a shared global runtime. Must not be called from within an
    /// async context.
    pub fn extract_sync(&self, document: &Document) -> Result<ExtractionResult> {
        GLOBAL_RUNTIME.block_on(self.extract(document))
    }

    #[tracing::instrument(name = "extract", skip_all, fields(policy = ?self.policy))]
    async fn run(&self, document: &Document, timeout: Option<Duration>) -> Result<ExtractionResult> {
        // The deadline covers the content-type lookup as well as the processor.
        match timeout {
            Some(limit) => tokio::time::timeout(limit, self.validate_and_dispatch(document))
                .await
                .map_err(|_| DocExtractError::Timeout {
                    operation: "extraction".to_string(),
                    elapsed_ms: limit.as_millis(),
                })?,
            None => self.validate_and_dispatch(document).await,
        }
    }

    async fn validate_and_dispatch(&self, document: &Document) -> Result<ExtractionResult> {
        let resolved = validate_document(
            document,
            self.policy,
            &self.types,
            &self.processors,
            self.resolver.as_ref(),
        )
        .await?;
        let mime_type = resolved.mime_type;

        if !self.policy.dispatches() {
            return Ok(ExtractionResult {
                text: ADMITTED_MARKER.to_string(),
                mime_type,
                processor: None,
            });
        }

        let processor = self
            .processors
            .get(&mime_type)
            .ok_or_else(|| DocExtractError::NoProcessor {
                mime_type: mime_type.clone(),
                registered: self.processors.list(),
            })?;
        let name = processor.name().to_string();

        // Processors see the resolved type, including one inferred from the URL.
        let document = if document.mime_type.as_deref() == Some(mime_type.as_str()) {
            Cow::Borrowed(document)
        } else {
            Cow::Owned(document.clone().with_mime_type(mime_type.clone()))
        };

        tracing::debug!(processor = %name, mime_type = %mime_type, "dispatching document");
        let text = processor.process(&document).await?;

        Ok(ExtractionResult {
            text,
            mime_type,
            processor: Some(name),
        })
    }
}

impl Default for DocExtract {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DocExtract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocExtract")
            .field("policy", &self.policy)
            .field("types", &self.types)
            .field("processors", &self.processors)
            .finish_non_exhaustive()
    }
}

/// Builder for [`DocExtract`].
///
/// Use it to inject a custom [`ContentTypeResolver`] or to register
/// processors up front.
#[derive(Default)]
pub struct DocExtractBuilder {
    config: ClientConfig,
    resolver: Option<Arc<dyn ContentTypeResolver>>,
    processors: Vec<Arc<dyn DocumentProcessor>>,
}

impl DocExtractBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the HTTP resolver.
    pub fn resolver(mut self, resolver: Arc<dyn ContentTypeResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn processor(mut self, processor: Arc<dyn DocumentProcessor>) -> Self {
        self.processors.push(processor);
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// Processors are registered in the order they were added.
    pub fn build(self) -> Result<DocExtract> {
        self.config.validate()?;

        let policy = self.config.effective_policy();
        let types = self.config.type_registry()?;
        let resolver = match self.resolver {
            Some(resolver) => resolver,
            None => Arc::new(HttpContentTypeResolver::from_config(&self.config)?),
        };

        let mut client = DocExtract {
            config: self.config,
            policy,
            types,
            processors: ProcessorRegistry::new(),
            resolver,
        };

        for processor in self.processors {
            client.register_processor(processor)?;
        }

        tracing::debug!(policy = ?client.policy, processors = client.processors.len(), "client ready");
        Ok(client)
    }
}
