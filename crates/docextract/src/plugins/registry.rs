//! Processor registration and lookup.
//!
//! The [`ProcessorRegistry`] maps exact MIME types to processors. Keys keep the
//! order in which they were first registered; registering a processor for a
//! type that already has one replaces it in place (last write wins).

use crate::core::mime::validate_mime_type;
use crate::plugins::DocumentProcessor;
use crate::{DocExtractError, Result};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Validate a plugin name before registration.
///
/// # Rules
///
/// - Name cannot be empty
/// - Name cannot contain whitespace
fn validate_plugin_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DocExtractError::validation("Plugin name cannot be empty"));
    }

    if name.contains(char::is_whitespace) {
        return Err(DocExtractError::validation(format!(
            "Plugin name '{}' cannot contain whitespace",
            name
        )));
    }

    Ok(())
}

/// Registry of document processors keyed by MIME type.
///
/// # Thread Safety
///
/// Lookups take `&self` and are safe to run concurrently. Registration takes
/// `&mut self`, so it cannot overlap with extraction calls on the same client.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use docextract::plugins::{DocumentProcessor, Plugin, ProcessorRegistry};
/// use docextract::{Document, Result};
/// use std::sync::Arc;
///
/// struct Markdown;
/// impl Plugin for Markdown {
///     fn name(&self) -> &str { "markdown" }
///     fn version(&self) -> String { "1.0.0".to_string() }
/// }
/// #[async_trait]
/// impl DocumentProcessor for Markdown {
///     fn supported_mime_type(&self) -> &str { "text/markdown" }
///     async fn process(&self, _: &Document) -> Result<String> { Ok(String::new()) }
/// }
///
/// let mut registry = ProcessorRegistry::new();
/// registry.register(Arc::new(Markdown))?;
/// assert!(registry.supports("text/markdown"));
/// assert_eq!(registry.list(), vec!["text/markdown"]);
/// # Ok::<(), docextract::DocExtractError>(())
/// ```
#[derive(Default)]
pub struct ProcessorRegistry {
    processors: IndexMap<String, Arc<dyn DocumentProcessor>>,
}

impl ProcessorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            processors: IndexMap::new(),
        }
    }

    /// Register a processor under its primary and additional MIME types.
    ///
    /// Any processor previously registered under one of those types is
    /// replaced. A replaced processor that is no longer reachable under any
    /// type is shut down; shutdown errors are logged, not returned.
    ///
    /// # Errors
    ///
    /// - `DocExtractError::Validation` if the plugin name or a MIME type is malformed
    /// - whatever `initialize()` returns; the registry is left unchanged
    ///
    /// Registering an instance that already holds every one of its types is a
    /// no-op and does not call `initialize()` again.
    pub fn register(&mut self, processor: Arc<dyn DocumentProcessor>) -> Result<()> {
        let name = processor.name().to_string();
        validate_plugin_name(&name)?;

        let mut mime_types = vec![processor.supported_mime_type().to_string()];
        for extra in processor.additional_mime_types() {
            if !mime_types.iter().any(|m| m == extra) {
                mime_types.push(extra.to_string());
            }
        }
        for mime_type in &mime_types {
            validate_mime_type(mime_type)?;
        }

        let already_registered = mime_types
            .iter()
            .all(|m| self.processors.get(m).is_some_and(|p| Arc::ptr_eq(p, &processor)));
        if already_registered {
            tracing::debug!(processor = %name, "processor already registered, skipping initialize");
            return Ok(());
        }

        processor.initialize()?;

        let mut replaced: Vec<Arc<dyn DocumentProcessor>> = Vec::new();
        for mime_type in mime_types {
            tracing::debug!(processor = %name, mime_type = %mime_type, "registering processor");
            if let Some(previous) = self.processors.insert(mime_type, Arc::clone(&processor))
                && !Arc::ptr_eq(&previous, &processor)
                && !replaced.iter().any(|p| Arc::ptr_eq(p, &previous))
            {
                replaced.push(previous);
            }
        }

        for previous in replaced {
            self.shutdown_if_unreachable(previous);
        }

        Ok(())
    }

    /// The processor registered for `mime_type`, if any.
    pub fn get(&self, mime_type: &str) -> Option<Arc<dyn DocumentProcessor>> {
        self.processors.get(mime_type).cloned()
    }

    pub fn supports(&self, mime_type: &str) -> bool {
        self.processors.contains_key(mime_type)
    }

    /// Registered MIME types in registration order.
    pub fn list(&self) -> Vec<String> {
        self.processors.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Remove the processor registered for `mime_type`.
    ///
    /// The processor is shut down once no other MIME type refers to it.
    pub fn remove(&mut self, mime_type: &str) -> Result<()> {
        if let Some(processor) = self.processors.shift_remove(mime_type)
            && !self.processors.values().any(|p| Arc::ptr_eq(p, &processor))
        {
            processor.shutdown()?;
        }
        Ok(())
    }

    /// Shut down every processor and clear the registry.
    pub fn shutdown_all(&mut self) -> Result<()> {
        let mut unique: Vec<Arc<dyn DocumentProcessor>> = Vec::new();
        for (_, processor) in self.processors.drain(..) {
            if !unique.iter().any(|p| Arc::ptr_eq(p, &processor)) {
                unique.push(processor);
            }
        }
        for processor in unique {
            processor.shutdown()?;
        }
        Ok(())
    }

    fn shutdown_if_unreachable(&self, processor: Arc<dyn DocumentProcessor>) {
        if self.processors.values().any(|p| Arc::ptr_eq(p, &processor)) {
            return;
        }
        if let Err(e) = processor.shutdown() {
            tracing::warn!(processor = processor.name(), error = %e, "replaced processor failed to shut down");
        }
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.processors.iter().map(|(mime, p)| (mime, p.name())))
            .finish()
    }
}
