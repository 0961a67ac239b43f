//! Document validation.
//!
//! Validation runs a fixed sequence of checks and stops at the first one that
//! fails:
//!
//! 1. **Source presence**: `url` or `contents` must be set (`MissingSource`).
//! 2. **Contents pairing**: inline `contents` need a type (`MissingType`)
//!    and, under the allowlist policies, a `filename` (`MissingFilename`,
//!    checked first).
//! 3. **URL syntax**: a `url` must parse as an absolute URL (`InvalidUrl`).
//! 4. **Type resolution**: an undeclared type is resolved from the URL; with
//!    no URL to probe the document fails with `MissingType`.
//! 5. **Admission**: the type must be in the allow-sets (`DisallowedType`)
//!    and/or have a registered processor (`NoProcessor`), depending on the
//!    [`AdmissionPolicy`].

use crate::core::config::AdmissionPolicy;
use crate::core::mime::TypeRegistry;
use crate::core::resolver::ContentTypeResolver;
use crate::plugins::ProcessorRegistry;
use crate::types::Document;
use crate::{DocExtractError, Result};
use url::Url;

/// Resolved type of a document; owned because it may come from the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub mime_type: String,
    /// `true` if the type came from the content-type probe.
    pub inferred: bool,
}

/// Parse `value` as an absolute URL.
///
/// # Errors
///
/// Returns `DocExtractError::InvalidUrl` for relative or malformed URLs.
pub fn parse_url(value: &str) -> Result<Url> {
    Url::parse(value).map_err(|source| DocExtractError::InvalidUrl {
        url: value.to_string(),
        source,
    })
}

/// Run the structural checks (steps 1-3) that need no network access.
///
/// Returns the parsed URL, if the document has one.
pub fn validate_structure(document: &Document, policy: AdmissionPolicy) -> Result<Option<Url>> {
    if document.url.is_none() && document.contents.is_none() {
        return Err(DocExtractError::MissingSource);
    }

    if document.contents.is_some() {
        if policy.requires_filename() && document.filename.as_deref().is_none_or(str::is_empty) {
            return Err(DocExtractError::MissingFilename);
        }
        if document.declared_mime_type().is_none() {
            return Err(DocExtractError::MissingType);
        }
    }

    document.url.as_deref().map(parse_url).transpose()
}

/// Determine the document's MIME type (step 4).
///
/// A declared type always wins; the resolver is consulted only when the type
/// is absent and a URL is available.
pub async fn resolve_type(
    document: &Document,
    url: Option<&Url>,
    resolver: &dyn ContentTypeResolver,
) -> Result<ResolvedType> {
    if let Some(mime_type) = document.declared_mime_type() {
        return Ok(ResolvedType {
            mime_type: mime_type.to_string(),
            inferred: false,
        });
    }

    match url {
        Some(url) => {
            let mime_type = resolver.resolve(url).await?;
            Ok(ResolvedType {
                mime_type,
                inferred: true,
            })
        }
        None => Err(DocExtractError::MissingType),
    }
}

/// Check the resolved type against the admission policy (step 5).
///
/// Under `AllowlistAndProcessors` the allow-set check runs first, so a type
/// outside the allow-sets is `DisallowedType` even if a processor exists.
pub fn check_admission(
    mime_type: &str,
    policy: AdmissionPolicy,
    types: &TypeRegistry,
    processors: &ProcessorRegistry,
) -> Result<()> {
    if policy.uses_allowlist() && !types.is_allowed(mime_type) {
        return Err(DocExtractError::DisallowedType {
            mime_type: mime_type.to_string(),
            allowed: types.allowed_types(),
        });
    }

    if policy.dispatches() && !processors.supports(mime_type) {
        return Err(DocExtractError::NoProcessor {
            mime_type: mime_type.to_string(),
            registered: processors.list(),
        });
    }

    Ok(())
}

/// Run every check in order and return the admitted type.
#[tracing::instrument(
    skip_all,
    fields(
        document.filename = document.filename.as_deref(),
        document.has_contents = document.contents.is_some(),
    )
)]
pub async fn validate_document(
    document: &Document,
    policy: AdmissionPolicy,
    types: &TypeRegistry,
    processors: &ProcessorRegistry,
    resolver: &dyn ContentTypeResolver,
) -> Result<ResolvedType> {
    let url = validate_structure(document, policy)?;
    let resolved = resolve_type(document, url.as_ref(), resolver).await?;
    check_admission(&resolved.mime_type, policy, types, processors)?;
    tracing::debug!(
        mime_type = %resolved.mime_type,
        inferred = resolved.inferred,
        "document admitted"
    );
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{DocumentProcessor, Plugin};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedResolver {
        answer: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FixedResolver {
        fn answering(answer: &'static str) -> Self {
            Self {
                answer: Some(answer),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                answer: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ContentTypeResolver for FixedResolver {
        async fn resolve(&self, url: &Url) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.answer {
                Some(answer) => Ok(answer.to_string()),
                None => Err(DocExtractError::ResolutionFailed {
                    url: url.to_string(),
                    status: 500,
                }),
            }
        }
    }

    struct PdfProcessor;

    impl Plugin for PdfProcessor {
        fn name(&self) -> &str {
            "pdf"
        }

        fn version(&self) -> String {
            "1.0.0".to_string()
        }
    }

    #[async_trait]
    impl DocumentProcessor for PdfProcessor {
        fn supported_mime_type(&self) -> &str {
            "application/pdf"
        }

        async fn process(&self, _: &Document) -> Result<String> {
            Ok("pdf text".to_string())
        }
    }

    fn pdf_registry() -> ProcessorRegistry {
        let mut registry = ProcessorRegistry::new();
        registry.register(Arc::new(PdfProcessor)).unwrap();
        registry
    }

    #[test]
    fn test_missing_source() {
        let doc = Document::default().with_filename("a.pdf").with_mime_type("application/pdf");
        assert!(matches!(validate_structure(&doc, AdmissionPolicy::Allowlist), Err(DocExtractError::MissingSource)));
    }

    #[test]
    fn test_contents_without_filename() {
        let doc = Document::default()
            .with_contents(vec![1])
            .with_mime_type("application/pdf")
            .with_url("https://x/a.pdf");
        assert!(matches!(validate_structure(&doc, AdmissionPolicy::Allowlist), Err(DocExtractError::MissingFilename)));
    }

    #[test]
    fn test_only_empty_filename_counts_as_missing() {
        let blank = Document::from_bytes(" ", "application/pdf", vec![1]);
        assert!(validate_structure(&blank, AdmissionPolicy::Allowlist).is_ok());

        let empty = Document::from_bytes("", "application/pdf", vec![1]);
        assert!(matches!(
            validate_structure(&empty, AdmissionPolicy::Allowlist),
            Err(DocExtractError::MissingFilename)
        ));
    }

    #[test]
    fn test_processor_policy_does_not_require_filename() {
        let doc = Document::default().with_contents(vec![1]).with_mime_type("application/pdf");
        assert!(validate_structure(&doc, AdmissionPolicy::Processors).unwrap().is_none());

        let doc = Document::default().with_contents(vec![1]);
        assert!(matches!(
            validate_structure(&doc, AdmissionPolicy::Processors),
            Err(DocExtractError::MissingType)
        ));
        assert!(matches!(
            validate_structure(&doc, AdmissionPolicy::AllowlistAndProcessors),
            Err(DocExtractError::MissingFilename)
        ));
    }

    #[test]
    fn test_contents_without_type() {
        let doc = Document::default().with_contents(vec![1]).with_filename("a.pdf");
        assert!(matches!(validate_structure(&doc, AdmissionPolicy::Allowlist), Err(DocExtractError::MissingType)));
    }

    #[test]
    fn test_filename_checked_before_type() {
        let doc = Document::default().with_contents(vec![1]);
        assert!(matches!(validate_structure(&doc, AdmissionPolicy::Allowlist), Err(DocExtractError::MissingFilename)));
    }

    #[test]
    fn test_url_only_needs_neither_filename_nor_type() {
        let doc = Document::from_url("https://x/a.pdf");
        let url = validate_structure(&doc, AdmissionPolicy::Allowlist).unwrap().unwrap();
        assert_eq!(url.as_str(), "https://x/a.pdf");
    }

    #[test]
    fn test_invalid_and_relative_urls() {
        for bad in ["not a url", "/relative/path.pdf", "a.pdf", ""] {
            let doc = Document::from_url(bad);
            assert!(
                matches!(validate_structure(&doc, AdmissionPolicy::Allowlist), Err(DocExtractError::InvalidUrl { .. })),
                "expected InvalidUrl for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_pairing_checked_before_url_syntax() {
        let doc = Document::from_url("not a url").with_contents(vec![1]);
        assert!(matches!(validate_structure(&doc, AdmissionPolicy::Allowlist), Err(DocExtractError::MissingFilename)));
    }

    #[tokio::test]
    async fn test_declared_type_skips_resolver() {
        let resolver = FixedResolver::answering("image/png");
        let doc = Document::from_url("https://x/a.pdf").with_mime_type("application/pdf");
        let url = validate_structure(&doc, AdmissionPolicy::Allowlist).unwrap();

        let resolved = resolve_type(&doc, url.as_ref(), &resolver).await.unwrap();
        assert_eq!(resolved.mime_type, "application/pdf");
        assert!(!resolved.inferred);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_type_is_resolved_from_url() {
        let resolver = FixedResolver::answering("application/pdf");
        let doc = Document::from_url("https://x/download?id=7");
        let url = validate_structure(&doc, AdmissionPolicy::Allowlist).unwrap();

        let resolved = resolve_type(&doc, url.as_ref(), &resolver).await.unwrap();
        assert_eq!(resolved.mime_type, "application/pdf");
        assert!(resolved.inferred);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolver_errors_propagate() {
        let resolver = FixedResolver::failing();
        let doc = Document::from_url("https://x/a.pdf");

        let err = validate_document(
            &doc,
            AdmissionPolicy::Allowlist,
            &TypeRegistry::default(),
            &ProcessorRegistry::new(),
            &resolver,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DocExtractError::ResolutionFailed { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_no_type_and_no_url_is_missing_type() {
        let resolver = FixedResolver::failing();
        let doc = Document::default().with_filename("a.pdf");

        let err = resolve_type(&doc, None, &resolver).await.unwrap_err();
        assert!(matches!(err, DocExtractError::MissingType));
    }

    #[test]
    fn test_allowlist_admission() {
        let types = TypeRegistry::default();
        let processors = ProcessorRegistry::new();

        assert!(check_admission("application/pdf", AdmissionPolicy::Allowlist, &types, &processors).is_ok());

        let err = check_admission("text/plain", AdmissionPolicy::Allowlist, &types, &processors).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("File type 'text/plain' is not allowed"));
        for allowed in types.allowed_types() {
            assert!(message.contains(&allowed), "message should list {}", allowed);
        }
    }

    #[test]
    fn test_processor_admission() {
        let types = TypeRegistry::default();
        let processors = pdf_registry();

        assert!(check_admission("application/pdf", AdmissionPolicy::Processors, &types, &processors).is_ok());

        let err = check_admission("image/png", AdmissionPolicy::Processors, &types, &processors).unwrap_err();
        match err {
            DocExtractError::NoProcessor { mime_type, registered } => {
                assert_eq!(mime_type, "image/png");
                assert_eq!(registered, vec!["application/pdf"]);
            }
            other => panic!("Expected NoProcessor, got {:?}", other),
        }
    }

    #[test]
    fn test_processor_policy_ignores_allow_sets() {
        let types = TypeRegistry::new(Vec::<String>::new(), Vec::<String>::new()).unwrap();
        let processors = pdf_registry();
        assert!(check_admission("application/pdf", AdmissionPolicy::Processors, &types, &processors).is_ok());
    }

    #[test]
    fn test_combined_policy_keeps_failure_kinds_apart() {
        let types = TypeRegistry::default();
        let processors = pdf_registry();
        let policy = AdmissionPolicy::AllowlistAndProcessors;

        assert!(check_admission("application/pdf", policy, &types, &processors).is_ok());
        assert!(matches!(
            check_admission("image/png", policy, &types, &processors),
            Err(DocExtractError::NoProcessor { .. })
        ));
        assert!(matches!(
            check_admission("image/gif", policy, &types, &processors),
            Err(DocExtractError::DisallowedType { .. })
        ));
    }

    #[tokio::test]
    async fn test_validate_document_url_only_inferred_and_admitted() {
        let resolver = FixedResolver::answering("application/pdf");
        let doc = Document::from_url("https://x/a");

        let resolved = validate_document(
            &doc,
            AdmissionPolicy::Processors,
            &TypeRegistry::default(),
            &pdf_registry(),
            &resolver,
        )
        .await
        .unwrap();
        assert_eq!(resolved.mime_type, "application/pdf");
        assert!(resolved.inferred);
    }
}
