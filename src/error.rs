//! Error types for the docchat library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`DocChatError`] — **Fatal to an upload**: normalization cannot produce
//!   a Document at all (unknown extension, corrupt file, pdfium unavailable).
//!   Returned as `Err(DocChatError)` from [`crate::Session::load_document`]
//!   and the session stays unbound, so a retry with a different file works.
//!
//! * [`DispatchError`] — **Structured LLM failure**: the chat endpoint was
//!   unreachable, returned a bad status, or sent a response we could not
//!   decode. Returned by [`crate::llm::ChatCapability::chat`] so callers can
//!   distinguish "model answered" from "model unreachable" without string
//!   matching. At the session boundary it is rendered in-band as an
//!   `"Error querying <model>: <cause>"` answer and never propagated.
//!
//! Per-image OCR failures have no error type at all: the OCR adapter is
//! infallible by signature and maps every failure to an empty string, since
//! OCR text is supplementary, not authoritative.

use thiserror::Error;

/// All fatal errors returned by the docchat library.
///
/// Question-answering failures use [`DispatchError`] and are converted to
/// answer text rather than propagated here.
#[derive(Debug, Error)]
pub enum DocChatError {
    // ── Format errors ─────────────────────────────────────────────────────
    /// The file extension is not one we can normalize.
    ///
    /// Raised before any extraction work begins, so no partial Document
    /// artifacts are ever produced for an unsupported upload.
    #[error("Unsupported document format '.{extension}'\nSupported formats: pdf, docx")]
    UnsupportedFormat { extension: String },

    // ── Parse errors ──────────────────────────────────────────────────────
    /// The document's structure could not be parsed (corrupt file,
    /// unsupported sub-format). Aborts normalization for that file.
    #[error("Failed to parse document: {detail}")]
    DocumentParse { detail: String },

    /// The PDF requires a password but none was provided.
    #[error("Document is encrypted and requires a password.\nProvide it via DocChatConfig::builder().password(..).")]
    PasswordRequired,

    /// A password was provided but it is wrong.
    #[error("Wrong password for encrypted document")]
    WrongPassword,

    // ── Raster errors ─────────────────────────────────────────────────────
    /// No page of the document could be rasterised.
    ///
    /// A single failed page is skipped silently; this fires only when the
    /// whole rendering pass produced nothing.
    #[error("Failed to rasterise document pages: {detail}")]
    RenderingFailed { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium system-wide."
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (task join failure etc.).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A structured failure from the language-model chat capability.
///
/// Never crosses the [`crate::Session::ask`] boundary: the dispatcher
/// converts it to an `"Error querying <model>: <cause>"` answer string.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The request never completed (connection refused, DNS, timeout).
    #[error("request failed: {0}")]
    Request(String),

    /// The endpoint answered with a non-success status code.
    #[error("HTTP {status} from chat endpoint")]
    Http { status: u16 },

    /// The endpoint answered 2xx but the body was not a chat response.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_display() {
        let e = DocChatError::UnsupportedFormat {
            extension: "txt".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("'.txt'"), "got: {msg}");
        assert!(msg.contains("pdf, docx"));
    }

    #[test]
    fn document_parse_display() {
        let e = DocChatError::DocumentParse {
            detail: "bad xref table".into(),
        };
        assert!(e.to_string().contains("bad xref table"));
    }

    #[test]
    fn dispatch_http_display() {
        let e = DispatchError::Http { status: 503 };
        assert!(e.to_string().contains("503"));
    }

    #[test]
    fn dispatch_request_display() {
        let e = DispatchError::Request("connection refused".into());
        assert!(e.to_string().contains("connection refused"));
    }
}
