//! The Document Normalizer: raw file bytes → one canonical [`Document`].
//!
//! Normalization is an at-most-once, all-or-nothing operation per uploaded
//! file: either a complete `Document` comes back or the whole thing fails
//! and the caller's session state is untouched. Partial results are never
//! exposed.
//!
//! ## Why spawn_blocking?
//!
//! pdfium wraps a C++ library with thread-local state that must not be
//! driven from async contexts, and docx parsing is CPU-bound zip+XML work.
//! Both run on the blocking pool so Tokio worker threads never stall during
//! extraction. Only the OCR passes are async — they are process/network
//! bound and benefit from bounded concurrency.

use image::DynamicImage;
use pdfium_render::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::DocChatConfig;
use crate::document::{Document, DocumentFormat};
use crate::error::DocChatError;
use crate::pipeline::{images, ocr, ocr::OcrEngine, text};

/// Normalize one uploaded file into a [`Document`].
///
/// Steps, per the pipeline contract:
/// 1. dispatch on `extension` (unknown → [`DocChatError::UnsupportedFormat`]
///    before any extraction work),
/// 2. native text extraction (failure aborts with
///    [`DocChatError::DocumentParse`]),
/// 3. raster collection — embedded images and full-page renders (PDF only),
/// 4. two-pass OCR, embedded first then rendered pages,
/// 5. assembly. Rendered-page rasters are dropped once OCR has consumed
///    them; embedded images are retained on the Document.
pub async fn normalize(
    bytes: &[u8],
    extension: &str,
    engine: &Arc<dyn OcrEngine>,
    config: &DocChatConfig,
) -> Result<Document, DocChatError> {
    let format = DocumentFormat::from_extension(extension)?;
    info!("Normalizing {} upload ({} bytes)", format, bytes.len());

    match format {
        DocumentFormat::Pdf => normalize_pdf(bytes, engine, config).await,
        DocumentFormat::Docx => normalize_docx(bytes).await,
    }
}

async fn normalize_pdf(
    bytes: &[u8],
    engine: &Arc<dyn OcrEngine>,
    config: &DocChatConfig,
) -> Result<Document, DocChatError> {
    let owned = bytes.to_vec();
    let password = config.password.clone();
    let max_pixels = config.max_rendered_pixels;

    let (raw_text, embedded, rendered) = tokio::task::spawn_blocking(move || {
        extract_pdf_blocking(&owned, password.as_deref(), max_pixels)
    })
    .await
    .map_err(|e| DocChatError::Internal(format!("extraction task panicked: {}", e)))??;

    let image_derived_text =
        ocr::recognize_all(engine, &embedded, &rendered, config.ocr_concurrency).await;
    drop(rendered);

    Ok(Document {
        format: DocumentFormat::Pdf,
        raw_text,
        image_derived_text,
        embedded_images: embedded,
    })
}

async fn normalize_docx(bytes: &[u8]) -> Result<Document, DocChatError> {
    let owned = bytes.to_vec();

    let raw_text = tokio::task::spawn_blocking(move || text::docx_text(&owned))
        .await
        .map_err(|e| DocChatError::Internal(format!("extraction task panicked: {}", e)))??;

    // Image extraction for word-processing files is out of scope: no
    // embedded images, no page rasters, so no OCR pass either.
    Ok(Document {
        format: DocumentFormat::Docx,
        raw_text,
        image_derived_text: String::new(),
        embedded_images: Vec::new(),
    })
}

/// Blocking PDF pass: parse once, then text, embedded images, and page
/// renders off the same open document.
fn extract_pdf_blocking(
    bytes: &[u8],
    password: Option<&str>,
    max_pixels: u32,
) -> Result<(String, Vec<DynamicImage>, Vec<DynamicImage>), DocChatError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, password)
        .map_err(|e| classify_load_error(e, password.is_some()))?;

    let page_count = document.pages().len();
    debug!("PDF parsed: {} pages", page_count);

    let raw_text = text::pdf_text(&document)?;
    let embedded = images::embedded_images(&document);
    let rendered = images::rendered_pages(&document, max_pixels)?;

    Ok((raw_text, embedded, rendered))
}

/// Bind to a pdfium library: `PDFIUM_LIB_PATH` first, then the system copy.
fn bind_pdfium() -> Result<Pdfium, DocChatError> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(dir) if !dir.is_empty() => {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
        }
        _ => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| DocChatError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// Map a pdfium load failure onto the upload-fatal error taxonomy.
fn classify_load_error(e: PdfiumError, had_password: bool) -> DocChatError {
    let detail = format!("{:?}", e);
    if detail.contains("Password") || detail.contains("password") {
        if had_password {
            DocChatError::WrongPassword
        } else {
            DocChatError::PasswordRequired
        }
    } else {
        DocChatError::DocumentParse { detail }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NeverOcr;

    #[async_trait]
    impl OcrEngine for NeverOcr {
        async fn recognize(&self, _: &DynamicImage) -> String {
            panic!("OCR must not run for rejected or image-free uploads");
        }
    }

    #[tokio::test]
    async fn unsupported_extension_fails_before_extraction() {
        let engine: Arc<dyn OcrEngine> = Arc::new(NeverOcr);
        let config = DocChatConfig::default();
        let err = normalize(b"anything", "txt", &engine, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, DocChatError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn docx_upload_skips_ocr_entirely() {
        use docx_rs::{Docx, Paragraph, Run};
        use std::io::Cursor;

        let mut buf = Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("hello")))
            .build()
            .pack(&mut buf)
            .unwrap();

        let engine: Arc<dyn OcrEngine> = Arc::new(NeverOcr);
        let config = DocChatConfig::default();
        let document = normalize(&buf.into_inner(), "docx", &engine, &config)
            .await
            .unwrap();

        assert_eq!(document.format, DocumentFormat::Docx);
        assert_eq!(document.raw_text, "hello\n");
        assert!(document.image_derived_text.is_empty());
        assert!(document.embedded_images.is_empty());
    }

    #[tokio::test]
    async fn corrupt_docx_aborts_with_parse_error() {
        let engine: Arc<dyn OcrEngine> = Arc::new(NeverOcr);
        let config = DocChatConfig::default();
        let err = normalize(b"\x00\x01garbage", "docx", &engine, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, DocChatError::DocumentParse { .. }));
    }
}
