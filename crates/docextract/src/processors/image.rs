//! Image processor.
//!
//! Images carry no text layer and there is no OCR, so the extracted text is a
//! one-line summary of the decoded image.

use crate::plugins::{DocumentProcessor, Plugin};
use crate::processors::load_contents;
use crate::types::Document;
use crate::{DocExtractError, JPEG_MIME_TYPE, JPG_MIME_TYPE, PNG_MIME_TYPE, Result, WEBP_MIME_TYPE};
use async_trait::async_trait;
use image::ImageReader;
use std::io::Cursor;

/// Decodes JPEG, PNG and WebP images and reports their dimensions and format.
///
/// Output looks like `[Image processed: 640x480, format: PNG]`.
pub struct ImageProcessor {
    client: reqwest::Client,
}

impl ImageProcessor {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Use `client` to download URL-only documents.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for ImageProcessor {
    fn name(&self) -> &str {
        "image-processor"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn description(&self) -> &str {
        "Reports dimensions and format of JPEG, PNG and WebP images"
    }
}

#[async_trait]
impl DocumentProcessor for ImageProcessor {
    fn supported_mime_type(&self) -> &str {
        JPEG_MIME_TYPE
    }

    fn additional_mime_types(&self) -> &[&str] {
        &[PNG_MIME_TYPE, JPG_MIME_TYPE, WEBP_MIME_TYPE]
    }

    async fn process(&self, document: &Document) -> Result<String> {
        let bytes = load_contents(self.name(), document, &self.client).await?;
        describe_image(self.name(), &bytes)
    }
}

fn describe_image(processor: &str, bytes: &[u8]) -> Result<String> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| {
            DocExtractError::processing_with_source(processor, format!("Failed to read image format: {}", e), e)
        })?;

    let format = reader
        .format()
        .ok_or_else(|| DocExtractError::processing(processor, "Could not determine image format"))?;

    let image = reader
        .decode()
        .map_err(|e| {
            DocExtractError::processing_with_source(processor, format!("Failed to decode image: {}", e), e)
        })?;

    let format = format!("{:?}", format).to_uppercase();
    Ok(format!("[Image processed: {}x{}, format: {}]", image.width(), image.height(), format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        RgbImage::new(width, height).write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_image_processor_registers_all_image_types() {
        let processor = ImageProcessor::new();
        assert_eq!(processor.supported_mime_type(), "image/jpeg");
        assert_eq!(
            processor.additional_mime_types(),
            &["image/png", "image/jpg", "image/webp"]
        );
    }

    #[tokio::test]
    async fn test_image_processor_describes_png() {
        let processor = ImageProcessor::new();
        let doc = Document::from_bytes("pixel.png", "image/png", png_bytes(3, 2));

        let text = processor.process(&doc).await.unwrap();
        assert_eq!(text, "[Image processed: 3x2, format: PNG]");
    }

    #[tokio::test]
    async fn test_image_processor_rejects_garbage() {
        let processor = ImageProcessor::new();
        let doc = Document::from_bytes("x.png", "image/png", vec![0, 1, 2, 3]);

        let err = processor.process(&doc).await.unwrap_err();
        assert_eq!(err.kind(), "processing_failed");
    }
}
