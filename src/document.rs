//! Canonical document representation and the conversation turn record.
//!
//! A [`Document`] is the one normalized form every uploaded file is reduced
//! to before any question can be asked against it. Native text and
//! image-derived (OCR) text are kept as two independent flat strings and are
//! never interleaved: native text is authoritative, OCR text is
//! supplementary, and the grounded prompt presents them under separate
//! labels so the model can weigh them accordingly.

use crate::error::DocChatError;
use image::DynamicImage;

/// Supported source formats, inferred from the upload's file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Paginated PDF: native text, embedded images, and rendered pages.
    Pdf,
    /// Word-processing (.docx): paragraph text only, no image extraction.
    Docx,
}

impl DocumentFormat {
    /// Dispatch on a file extension (case-insensitive, leading dot allowed).
    ///
    /// Unknown extensions fail with [`DocChatError::UnsupportedFormat`]
    /// before any extraction work begins.
    pub fn from_extension(extension: &str) -> Result<Self, DocChatError> {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(DocChatError::UnsupportedFormat { extension: ext }),
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Pdf => write!(f, "pdf"),
            DocumentFormat::Docx => write!(f, "docx"),
        }
    }
}

/// The canonical result of normalizing one uploaded file.
///
/// Created once per upload by [`crate::normalize::normalize`], immutable
/// thereafter, and owned exclusively by the [`crate::Session`] that bound it.
#[derive(Debug, Clone)]
pub struct Document {
    /// Source format of the upload.
    pub format: DocumentFormat,

    /// Ordered concatenation of all structural text units (pages or
    /// paragraphs), one trailing newline per unit — including empty units,
    /// which preserves structural spacing.
    pub raw_text: String,

    /// Ordered concatenation of OCR output from every raster source,
    /// one trailing newline per source: embedded images first (document
    /// order), then rendered pages (page order). Failed recognitions
    /// contribute an empty entry, never an error.
    pub image_derived_text: String,

    /// Decoded embedded raster images, kept for potential display.
    /// Rendered-page rasters are not retained — they exist only long enough
    /// to be OCR'd.
    pub embedded_images: Vec<DynamicImage>,
}

/// One question/answer exchange, immutable once appended to the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    /// User-supplied question, verbatim (non-empty after trimming).
    pub question: String,
    /// Model-returned text, or an `"Error querying …"` description when the
    /// dispatch failed.
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_dispatch() {
        assert_eq!(
            DocumentFormat::from_extension("pdf").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_extension("PDF").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_extension(".docx").unwrap(),
            DocumentFormat::Docx
        );
    }

    #[test]
    fn unknown_extension_rejected() {
        let err = DocumentFormat::from_extension("txt").unwrap_err();
        assert!(matches!(
            err,
            DocChatError::UnsupportedFormat { ref extension } if extension == "txt"
        ));
    }

    #[test]
    fn doc_legacy_extension_rejected() {
        // Only the modern OOXML container is supported.
        assert!(DocumentFormat::from_extension("doc").is_err());
    }

    #[test]
    fn format_display() {
        assert_eq!(DocumentFormat::Pdf.to_string(), "pdf");
        assert_eq!(DocumentFormat::Docx.to_string(), "docx");
    }
}
