//! OCR: the recognition capability and its two-pass orchestration.
//!
//! [`OcrEngine::recognize`] is infallible by signature. OCR text is
//! supplementary, not authoritative, so a recognition failure (bad image
//! data, missing binary, engine timeout) degrades to an empty string and is
//! logged — it never aborts normalization and is never surfaced to the user.
//!
//! The default engine shells out to the `tesseract` CLI rather than linking
//! libtesseract: the CLI is universally packaged, crash-isolated in its own
//! process, and a hung recognition cannot take the caller down with it.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use image::DynamicImage;
use std::io::Cursor;
use std::sync::Arc;
use tokio::process::Command;
use tracing::debug;

use crate::config::DocChatConfig;
use crate::error::DocChatError;

/// The optical-character-recognition capability: raster image in,
/// recognized text out, empty string on any failure.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image: &DynamicImage) -> String;
}

/// OCR engine backed by the `tesseract` command-line binary.
pub struct TesseractOcr {
    binary: String,
    language: String,
}

impl TesseractOcr {
    pub fn new(binary: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
        }
    }

    pub fn from_config(config: &DocChatConfig) -> Self {
        Self::new(&config.tesseract_binary, &config.ocr_language)
    }

    /// Fallible inner path; the trait impl maps every error to "".
    async fn recognize_inner(&self, image: &DynamicImage) -> Result<String, DocChatError> {
        // Tesseract wants a file, not a pipe, so stage the image as a
        // temp PNG. PNG is lossless; JPEG artefacts on rendered text hurt
        // recognition accuracy.
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| DocChatError::Internal(format!("png encode: {}", e)))?;

        let staged = tempfile::Builder::new()
            .prefix("docchat-ocr-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| DocChatError::Internal(format!("tempfile: {}", e)))?;
        tokio::fs::write(staged.path(), &png)
            .await
            .map_err(|e| DocChatError::Internal(format!("tempfile write: {}", e)))?;

        let output = Command::new(&self.binary)
            .arg(staged.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .await
            .map_err(|e| DocChatError::Internal(format!("spawn {}: {}", self.binary, e)))?;

        if !output.status.success() {
            return Err(DocChatError::Internal(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        // Tesseract appends a form feed and trailing newlines.
        Ok(String::from_utf8_lossy(&output.stdout)
            .trim_end_matches(['\n', '\x0c', ' '])
            .to_string())
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, image: &DynamicImage) -> String {
        match self.recognize_inner(image).await {
            Ok(text) => text,
            Err(e) => {
                debug!("OCR recognition failed, contributing empty text: {}", e);
                String::new()
            }
        }
    }
}

/// Run the two-pass OCR orchestration: every embedded image, then every
/// rendered page, each result appended with a trailing newline — empty
/// results included, so one raster source always maps to one entry.
///
/// Recognition runs `concurrency` images wide through an order-preserving
/// buffered stream; position within `image_derived_text` stays deterministic
/// regardless of which recognition finishes first.
pub async fn recognize_all(
    engine: &Arc<dyn OcrEngine>,
    embedded: &[DynamicImage],
    rendered: &[DynamicImage],
    concurrency: usize,
) -> String {
    let total = embedded.len() + rendered.len();
    debug!(
        "OCR over {} raster sources ({} embedded + {} rendered)",
        total,
        embedded.len(),
        rendered.len()
    );

    let texts: Vec<String> = stream::iter(embedded.iter().chain(rendered.iter()))
        .map(|image| {
            let engine = Arc::clone(engine);
            async move { engine.recognize(image).await }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut image_derived_text = String::new();
    for text in texts {
        image_derived_text.push_str(&text);
        image_derived_text.push('\n');
    }
    image_derived_text
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Identifies images by width so tests can assert on recognition order;
    /// fails (returns "") for any image whose width is in `fail_widths`.
    struct WidthEngine {
        fail_widths: Vec<u32>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl OcrEngine for WidthEngine {
        async fn recognize(&self, image: &DynamicImage) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_widths.contains(&image.width()) {
                String::new()
            } else {
                format!("w{}", image.width())
            }
        }
    }

    fn img(width: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, 2, Rgba([0, 0, 0, 255])))
    }

    #[tokio::test]
    async fn embedded_precede_rendered_in_order() {
        let engine: Arc<dyn OcrEngine> = Arc::new(WidthEngine {
            fail_widths: vec![],
            calls: AtomicUsize::new(0),
        });
        let text = recognize_all(&engine, &[img(1)], &[img(2), img(3)], 4).await;
        assert_eq!(text, "w1\nw2\nw3\n");
    }

    #[tokio::test]
    async fn one_failure_never_blocks_the_rest() {
        let engine = Arc::new(WidthEngine {
            fail_widths: vec![2],
            calls: AtomicUsize::new(0),
        });
        let dyn_engine: Arc<dyn OcrEngine> = engine.clone();
        let text = recognize_all(&dyn_engine, &[img(1), img(2)], &[img(3)], 1).await;
        // The failed image still contributes its separating newline.
        assert_eq!(text, "w1\n\nw3\n");
        assert_eq!(engine.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn no_rasters_yields_empty_text() {
        let engine: Arc<dyn OcrEngine> = Arc::new(WidthEngine {
            fail_widths: vec![],
            calls: AtomicUsize::new(0),
        });
        let text = recognize_all(&engine, &[], &[], 4).await;
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn missing_binary_degrades_to_empty_string() {
        let engine = TesseractOcr::new("/nonexistent/docchat-no-such-tesseract", "eng");
        let text = engine.recognize(&img(4)).await;
        assert_eq!(text, "");
    }
}
