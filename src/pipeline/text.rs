//! Native text extraction: structural text units → `raw_text`.
//!
//! Every structural unit (PDF page, docx paragraph) contributes its text
//! followed by exactly one newline, **including empty units** — an empty
//! page or paragraph still marks a structural boundary, and dropping it
//! would silently glue unrelated content together.
//!
//! For docx only paragraph-level text is visited; tables, headers/footers,
//! and embedded objects are deliberately not extracted.

use crate::error::DocChatError;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use pdfium_render::prelude::*;
use tracing::debug;

/// Extract native text from an open PDF, one newline-terminated entry per
/// page in page order.
///
/// A page whose text layer cannot be read at all indicates a structurally
/// broken document, so the whole extraction fails rather than producing a
/// partial `raw_text`.
pub fn pdf_text(document: &PdfDocument<'_>) -> Result<String, DocChatError> {
    let mut raw_text = String::new();

    for page in document.pages().iter() {
        let text = page.text().map_err(|e| DocChatError::DocumentParse {
            detail: format!("text layer unreadable: {:?}", e),
        })?;
        raw_text.push_str(&text.all());
        raw_text.push('\n');
    }

    debug!("Extracted {} bytes of native PDF text", raw_text.len());
    Ok(raw_text)
}

/// Extract paragraph text from a docx file held in memory, one
/// newline-terminated entry per paragraph in document order.
pub fn docx_text(bytes: &[u8]) -> Result<String, DocChatError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| DocChatError::DocumentParse {
        detail: format!("not a readable docx: {}", e),
    })?;

    let mut raw_text = String::new();

    for child in docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            for child in paragraph.children {
                if let ParagraphChild::Run(run) = child {
                    for child in run.children {
                        if let RunChild::Text(text) = child {
                            raw_text.push_str(&text.text);
                        }
                    }
                }
            }
            // Empty paragraphs still contribute structural spacing.
            raw_text.push('\n');
        }
    }

    debug!("Extracted {} bytes of docx paragraph text", raw_text.len());
    Ok(raw_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};
    use std::io::Cursor;

    fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for p in paragraphs {
            let mut para = Paragraph::new();
            if !p.is_empty() {
                para = para.add_run(Run::new().add_text(*p));
            }
            docx = docx.add_paragraph(para);
        }
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).expect("pack docx");
        buf.into_inner()
    }

    #[test]
    fn paragraphs_join_with_newlines_in_order() {
        let bytes = docx_bytes(&["first", "second", "third"]);
        let text = docx_text(&bytes).unwrap();
        assert_eq!(text, "first\nsecond\nthird\n");
    }

    #[test]
    fn empty_paragraph_preserves_spacing() {
        let bytes = docx_bytes(&["above", "", "below"]);
        let text = docx_text(&bytes).unwrap();
        assert_eq!(text, "above\n\nbelow\n");
    }

    #[test]
    fn garbage_bytes_fail_as_parse_error() {
        let err = docx_text(b"definitely not a zip archive").unwrap_err();
        assert!(matches!(err, DocChatError::DocumentParse { .. }));
    }
}
