//! DOCX processor using docx-lite.

use crate::plugins::{DocumentProcessor, Plugin};
use crate::processors::load_contents;
use crate::types::Document;
use crate::{DOCX_MIME_TYPE, DocExtractError, Result};
use async_trait::async_trait;

/// Extracts paragraph text from Word (.docx) documents.
pub struct DocxProcessor {
    client: reqwest::Client,
}

impl DocxProcessor {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Use `client` to download URL-only documents.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for DocxProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for DocxProcessor {
    fn name(&self) -> &str {
        "docx-processor"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn description(&self) -> &str {
        "Extracts text from DOCX documents using docx-lite"
    }
}

#[async_trait]
impl DocumentProcessor for DocxProcessor {
    fn supported_mime_type(&self) -> &str {
        DOCX_MIME_TYPE
    }

    async fn process(&self, document: &Document) -> Result<String> {
        let bytes = load_contents(self.name(), document, &self.client).await?;

        docx_lite::extract_text_from_bytes(&bytes)
            .map_err(|e| DocExtractError::processing(self.name(), format!("Failed to extract text from DOCX: {}", e)))
    }
}
