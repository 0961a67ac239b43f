//! Client configuration loading and validation.
//!
//! [`ClientConfig`] can be built programmatically or loaded from TOML, YAML or
//! JSON. Every option and its default is listed on the struct; nothing is
//! filled in implicitly. Call [`ClientConfig::validate`] (or build a client
//! with [`DocExtract::with_config`](crate::DocExtract::with_config), which does
//! it for you) before use.

use crate::core::mime::TypeRegistry;
use crate::{DocExtractError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Name of the file [`ClientConfig::discover`] looks for.
pub const CONFIG_FILE_NAME: &str = "docextract.toml";

/// How a client decides whether a document is admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionPolicy {
    /// Admit types in the allow-sets and return a fixed marker without
    /// running any processor. Used for pure upload gating.
    Allowlist,
    /// Admit exactly the types that have a registered processor.
    Processors,
    /// Admit types in the allow-sets, then require a registered processor.
    AllowlistAndProcessors,
}

impl AdmissionPolicy {
    /// Whether this policy consults the allow-sets.
    pub fn uses_allowlist(self) -> bool {
        matches!(self, Self::Allowlist | Self::AllowlistAndProcessors)
    }

    /// Whether this policy dispatches to processors.
    pub fn dispatches(self) -> bool {
        matches!(self, Self::Processors | Self::AllowlistAndProcessors)
    }

    /// Whether inline contents must come with a filename.
    ///
    /// Only the allowlist policies enforce it; processors receive the
    /// document as given and decide for themselves.
    pub fn requires_filename(self) -> bool {
        self.uses_allowlist()
    }
}

/// Client configuration.
///
/// # Example
///
/// ```rust
/// use docextract::core::config::{AdmissionPolicy, ClientConfig};
///
/// // Processor-registry mode: admission follows registered processors.
/// let config = ClientConfig::default();
/// assert_eq!(config.effective_policy(), AdmissionPolicy::Processors);
///
/// // Allowlist mode with a narrowed image set.
/// let config = ClientConfig {
///     allowed_images: Some(vec!["image/jpeg".to_string()]),
///     ..ClientConfig::default()
/// };
/// assert_eq!(config.effective_policy(), AdmissionPolicy::Allowlist);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Admission policy. `None` picks `Allowlist` when either allow-set is
    /// configured and `Processors` otherwise.
    #[serde(default)]
    pub policy: Option<AdmissionPolicy>,

    /// Allowed document types (None = `DEFAULT_ALLOWED_DOCUMENTS`).
    #[serde(default)]
    pub allowed_documents: Option<Vec<String>>,

    /// Allowed image types (None = `DEFAULT_ALLOWED_IMAGES`).
    #[serde(default)]
    pub allowed_images: Option<Vec<String>>,

    /// Timeout for the content-type probe in seconds (None = no timeout).
    #[serde(default)]
    pub probe_timeout_secs: Option<u64>,

    /// Deadline for a whole `extract` call in seconds, covering the
    /// content-type probe and the processor (None = no deadline).
    #[serde(default)]
    pub processing_timeout_secs: Option<u64>,

    /// User agent sent with the content-type probe.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    format!("docextract/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            policy: None,
            allowed_documents: None,
            allowed_images: None,
            probe_timeout_secs: None,
            processing_timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Allowlist-only configuration with the default allow-sets.
    pub fn allowlist() -> Self {
        Self {
            policy: Some(AdmissionPolicy::Allowlist),
            ..Self::default()
        }
    }

    /// The policy actually in force.
    pub fn effective_policy(&self) -> AdmissionPolicy {
        match self.policy {
            Some(policy) => policy,
            None if self.allowed_documents.is_some() || self.allowed_images.is_some() => AdmissionPolicy::Allowlist,
            None => AdmissionPolicy::Processors,
        }
    }

    /// Build the allow-set registry, applying defaults for unset sets.
    ///
    /// # Errors
    ///
    /// Returns `DocExtractError::Validation` if any configured type is invalid.
    pub fn type_registry(&self) -> Result<TypeRegistry> {
        let defaults = TypeRegistry::default();
        let documents: Vec<String> = match &self.allowed_documents {
            Some(documents) => documents.clone(),
            None => defaults.allowed_documents().map(str::to_string).collect(),
        };
        let images: Vec<String> = match &self.allowed_images {
            Some(images) => images.clone(),
            None => defaults.allowed_images().map(str::to_string).collect(),
        };
        TypeRegistry::new(documents, images)
    }

    pub fn probe_timeout(&self) -> Option<Duration> {
        self.probe_timeout_secs.map(Duration::from_secs)
    }

    pub fn processing_timeout(&self) -> Option<Duration> {
        self.processing_timeout_secs.map(Duration::from_secs)
    }

    /// Check every option.
    ///
    /// # Errors
    ///
    /// Returns `DocExtractError::Validation` if:
    /// - an allow-set entry is malformed or in the wrong family
    /// - allow-sets are configured under the `processors` policy, where they would be ignored
    /// - a timeout is zero
    /// - the user agent is blank
    pub fn validate(&self) -> Result<()> {
        self.type_registry()?;

        if self.policy == Some(AdmissionPolicy::Processors)
            && (self.allowed_documents.is_some() || self.allowed_images.is_some())
        {
            return Err(DocExtractError::validation(
                "allowed_documents/allowed_images have no effect with policy 'processors'",
            ));
        }

        if self.probe_timeout_secs == Some(0) {
            return Err(DocExtractError::validation("probe_timeout_secs must be greater than 0"));
        }

        if self.processing_timeout_secs == Some(0) {
            return Err(DocExtractError::validation(
                "processing_timeout_secs must be greater than 0",
            ));
        }

        if self.user_agent.trim().is_empty() {
            return Err(DocExtractError::validation("user_agent cannot be empty"));
        }

        Ok(())
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `DocExtractError::Validation` if the file can't be read or is invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config_file(path.as_ref())?;

        toml::from_str(&content)
            .map_err(|e| DocExtractError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config_file(path.as_ref())?;

        serde_yaml_ng::from_str(&content)
            .map_err(|e| DocExtractError::validation(format!("Invalid YAML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config_file(path.as_ref())?;

        serde_json::from_str(&content)
            .map_err(|e| DocExtractError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration, choosing the format from the file extension.
    ///
    /// `.toml`, `.yaml`/`.yml` and `.json` are recognised.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()).map(str::to_lowercase).as_deref() {
            Some("toml") => Self::from_toml_file(path),
            Some("yaml" | "yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(DocExtractError::validation(format!(
                "Unsupported config file format: {}",
                path.display()
            ))),
        }
    }

    /// Discover `docextract.toml` in the current directory or its parents.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(DocExtractError::Io)?;

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "discovered config file");
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }
}

fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| DocExtractError::validation(format!("Failed to read config file {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mime::{DEFAULT_ALLOWED_DOCUMENTS, DEFAULT_ALLOWED_IMAGES};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.policy.is_none());
        assert!(config.allowed_documents.is_none());
        assert!(config.allowed_images.is_none());
        assert!(config.user_agent.starts_with("docextract/"));
        assert_eq!(config.effective_policy(), AdmissionPolicy::Processors);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_allowlist_defaults() {
        let config = ClientConfig::allowlist();
        assert_eq!(config.effective_policy(), AdmissionPolicy::Allowlist);
        let registry = config.type_registry().unwrap();
        assert_eq!(registry.allowed_documents().collect::<Vec<_>>(), DEFAULT_ALLOWED_DOCUMENTS);
        assert_eq!(registry.allowed_images().collect::<Vec<_>>(), DEFAULT_ALLOWED_IMAGES);
    }

    #[test]
    fn test_override_one_set_keeps_other_default() {
        let config = ClientConfig {
            allowed_images: Some(vec!["image/jpeg".to_string()]),
            ..ClientConfig::default()
        };
        assert_eq!(config.effective_policy(), AdmissionPolicy::Allowlist);
        let registry = config.type_registry().unwrap();
        assert_eq!(registry.allowed_images().collect::<Vec<_>>(), vec!["image/jpeg"]);
        assert_eq!(registry.allowed_documents().count(), DEFAULT_ALLOWED_DOCUMENTS.len());
    }

    #[test]
    fn test_validate_rejects_allowlist_under_processors_policy() {
        let config = ClientConfig {
            policy: Some(AdmissionPolicy::Processors),
            allowed_documents: Some(vec!["application/pdf".to_string()]),
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(DocExtractError::Validation { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_timeouts() {
        let config = ClientConfig {
            probe_timeout_secs: Some(0),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            processing_timeout_secs: Some(0),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_user_agent() {
        let config = ClientConfig {
            user_agent: "  ".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_mime_types() {
        let config = ClientConfig {
            allowed_images: Some(vec!["application/pdf".to_string()]),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        fs::write(
            &config_path,
            r#"
policy = "allowlist_and_processors"
allowed_documents = ["application/pdf"]
probe_timeout_secs = 5
        "#,
        )
        .unwrap();

        let config = ClientConfig::from_toml_file(&config_path).unwrap();
        assert_eq!(config.policy, Some(AdmissionPolicy::AllowlistAndProcessors));
        assert_eq!(config.allowed_documents, Some(vec!["application/pdf".to_string()]));
        assert!(config.allowed_images.is_none());
        assert_eq!(config.probe_timeout(), Some(Duration::from_secs(5)));
        assert!(config.processing_timeout().is_none());
        assert!(config.user_agent.starts_with("docextract/"));
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("docextract.yaml");

        fs::write(
            &config_path,
            "allowed_images:\n  - image/png\nprocessing_timeout_secs: 30\n",
        )
        .unwrap();

        let config = ClientConfig::from_file(&config_path).unwrap();
        assert_eq!(config.allowed_images, Some(vec!["image/png".to_string()]));
        assert_eq!(config.processing_timeout_secs, Some(30));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("docextract.json");

        fs::write(&config_path, r#"{"policy": "processors", "user_agent": "ingest-bot/1.0"}"#).unwrap();

        let config = ClientConfig::from_file(&config_path).unwrap();
        assert_eq!(config.policy, Some(AdmissionPolicy::Processors));
        assert_eq!(config.user_agent, "ingest-bot/1.0");
    }

    #[test]
    fn test_invalid_toml_is_validation_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "policy = [").unwrap();

        let err = ClientConfig::from_toml_file(&config_path).unwrap_err();
        assert!(err.to_string().contains("Invalid TOML"));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "policy = \"everything\"").unwrap();

        assert!(ClientConfig::from_toml_file(&config_path).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = ClientConfig::from_toml_file("/nonexistent/docextract.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = ClientConfig::from_file("config.ini").unwrap_err();
        assert!(err.to_string().contains("Unsupported config file format"));
    }
}
