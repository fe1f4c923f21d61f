//! Grounded-prompt construction.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the grounding layout (document text,
//!    image text, question, diagram instruction) is defined exactly once.
//!
//! 2. **Testability** — unit and integration tests can assert on prompt
//!    structure without spinning up a real model.
//!
//! The prompt is deterministic: the same Document and question always
//! produce byte-identical output. Prior conversation turns are deliberately
//! excluded — each question is answered fresh against the document, and the
//! turn history is a display log, not model context.

use crate::document::Document;

/// Fixed instruction appended to every prompt: diagram/flow answers must
/// come back inside a fenced `mermaid` block. This is a contract with the
/// model about output markup, not a code-execution requirement.
pub const DIAGRAM_INSTRUCTION: &str =
    "If asked for Mermaid syntax, format it as ```mermaid\n...```";

/// Build the grounded prompt for one question against the bound document.
///
/// Layout (in order): native document text, image/chart OCR text, the
/// verbatim question, then [`DIAGRAM_INSTRUCTION`].
pub fn grounded_prompt(document: &Document, question: &str) -> String {
    format!(
        "Based on this document content:\n\
         Text: {}\n\
         Image/Chart Text: {}\n\
         Question: {}\n\
         {}",
        document.raw_text, document.image_derived_text, question, DIAGRAM_INSTRUCTION
    )
}
