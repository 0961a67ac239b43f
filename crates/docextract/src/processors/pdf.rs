//! PDF processor using lopdf.

use crate::plugins::{DocumentProcessor, Plugin};
use crate::processors::load_contents;
use crate::types::Document;
use crate::{DocExtractError, PDF_MIME_TYPE, Result};
use async_trait::async_trait;

/// Extracts the text layer of a PDF, page by page.
///
/// Scanned PDFs without a text layer yield empty text; there is no OCR.
pub struct PdfProcessor {
    client: reqwest::Client,
}

impl PdfProcessor {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Use `client` to download URL-only documents.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for PdfProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for PdfProcessor {
    fn name(&self) -> &str {
        "pdf-processor"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn description(&self) -> &str {
        "Extracts the text layer of PDF documents using lopdf"
    }
}

#[async_trait]
impl DocumentProcessor for PdfProcessor {
    fn supported_mime_type(&self) -> &str {
        PDF_MIME_TYPE
    }

    async fn process(&self, document: &Document) -> Result<String> {
        let bytes = load_contents(self.name(), document, &self.client).await?.into_owned();
        let name = self.name().to_string();

        tokio::task::spawn_blocking(move || extract_pdf_text(&name, &bytes))
            .await
            .map_err(|e| DocExtractError::processing_with_source(self.name(), "PDF extraction task failed", e))?
    }
}

fn extract_pdf_text(processor: &str, bytes: &[u8]) -> Result<String> {
    let pdf = lopdf::Document::load_mem(bytes)
        .map_err(|e| DocExtractError::processing(processor, format!("Failed to extract text from PDF: {}", e)))?;

    let pages: Vec<u32> = pdf.get_pages().keys().copied().collect();
    if pages.is_empty() {
        return Ok(String::new());
    }

    pdf.extract_text(&pages)
        .map_err(|e| DocExtractError::processing(processor, format!("Failed to extract text from PDF: {}", e)))
}
