//! Configuration for document normalization and question answering.
//!
//! All behaviour is controlled through one [`DocChatConfig`], built via its
//! [`DocChatConfigBuilder`]. Keeping every knob in a single struct makes it
//! trivial to share a config between the normalization pass and the chat
//! loop, and to construct sessions for tests with injected capabilities.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest — a positional constructor would
//! break on every new field.

use crate::error::DocChatError;
use crate::llm::ChatCapability;
use crate::pipeline::ocr::OcrEngine;
use std::fmt;
use std::sync::Arc;

/// Configuration for a docchat session.
///
/// Built via [`DocChatConfig::builder()`] or [`DocChatConfig::default()`].
///
/// # Example
/// ```rust
/// use docchat::DocChatConfig;
///
/// let config = DocChatConfig::builder()
///     .model("llava:13b")
///     .ocr_concurrency(8)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct DocChatConfig {
    /// Chat model identifier sent to the LLM endpoint. Default: `llava:7b`.
    ///
    /// Must be a vision-capable chat model if you expect the backend to
    /// reason about charts described in the OCR text; any Ollama chat model
    /// works for plain-text documents.
    pub model: String,

    /// Base URL of the Ollama-compatible chat endpoint.
    /// Default: `http://localhost:11434`.
    pub base_url: String,

    /// Maximum rendered page dimension (width or height) in pixels. Default: 2000.
    ///
    /// Page sizes vary wildly; capping the longest edge rather than fixing a
    /// DPI keeps memory bounded on oversized pages while leaving text sharp
    /// enough for tesseract on ordinary ones.
    pub max_rendered_pixels: u32,

    /// Number of concurrent OCR invocations during normalization. Default: 4.
    ///
    /// Images have no ordering dependency between each other, so recognition
    /// runs through an order-preserving buffered stream this many wide.
    /// Raise it if tesseract is fast on your machine; 1 forces sequential.
    pub ocr_concurrency: usize,

    /// Tesseract language code, e.g. "eng", "deu". Default: "eng".
    pub ocr_language: String,

    /// Path to the tesseract binary. Default: "tesseract" (relies on PATH).
    pub tesseract_binary: String,

    /// Per-chat-request timeout in seconds. Default: 120.
    ///
    /// Vision models on modest hardware routinely take tens of seconds per
    /// answer; a short timeout would convert slow-but-correct answers into
    /// error turns.
    pub api_timeout_secs: u64,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Pre-constructed chat capability. Takes precedence over `base_url`.
    ///
    /// This is the test seam: inject a mock here and no network I/O happens.
    pub chat: Option<Arc<dyn ChatCapability>>,

    /// Pre-constructed OCR engine. Takes precedence over `tesseract_binary`.
    pub ocr: Option<Arc<dyn OcrEngine>>,
}

impl Default for DocChatConfig {
    fn default() -> Self {
        Self {
            model: "llava:7b".to_string(),
            base_url: "http://localhost:11434".to_string(),
            max_rendered_pixels: 2000,
            ocr_concurrency: 4,
            ocr_language: "eng".to_string(),
            tesseract_binary: "tesseract".to_string(),
            api_timeout_secs: 120,
            password: None,
            chat: None,
            ocr: None,
        }
    }
}

impl fmt::Debug for DocChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocChatConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("ocr_concurrency", &self.ocr_concurrency)
            .field("ocr_language", &self.ocr_language)
            .field("tesseract_binary", &self.tesseract_binary)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("chat", &self.chat.as_ref().map(|_| "<dyn ChatCapability>"))
            .field("ocr", &self.ocr.as_ref().map(|_| "<dyn OcrEngine>"))
            .finish()
    }
}

impl DocChatConfig {
    /// Create a new builder for `DocChatConfig`.
    pub fn builder() -> DocChatConfigBuilder {
        DocChatConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`DocChatConfig`].
#[derive(Debug)]
pub struct DocChatConfigBuilder {
    config: DocChatConfig,
}

impl DocChatConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        // A trailing slash would produce "…//api/chat".
        self.config.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn ocr_concurrency(mut self, n: usize) -> Self {
        self.config.ocr_concurrency = n.max(1);
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn tesseract_binary(mut self, path: impl Into<String>) -> Self {
        self.config.tesseract_binary = path.into();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn chat(mut self, chat: Arc<dyn ChatCapability>) -> Self {
        self.config.chat = Some(chat);
        self
    }

    pub fn ocr(mut self, ocr: Arc<dyn OcrEngine>) -> Self {
        self.config.ocr = Some(ocr);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<DocChatConfig, DocChatError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(DocChatError::InvalidConfig(
                "Model identifier must be non-empty".into(),
            ));
        }
        if c.ocr_concurrency == 0 {
            return Err(DocChatError::InvalidConfig(
                "OCR concurrency must be ≥ 1".into(),
            ));
        }
        if c.chat.is_none() && c.base_url.trim().is_empty() {
            return Err(DocChatError::InvalidConfig(
                "Base URL must be non-empty when no chat capability is injected".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_local_ollama() {
        let c = DocChatConfig::default();
        assert_eq!(c.model, "llava:7b");
        assert_eq!(c.base_url, "http://localhost:11434");
        assert_eq!(c.ocr_concurrency, 4);
    }

    #[test]
    fn builder_clamps_concurrency() {
        let c = DocChatConfig::builder().ocr_concurrency(0).build().unwrap();
        assert_eq!(c.ocr_concurrency, 1);
    }

    #[test]
    fn builder_strips_trailing_slash() {
        let c = DocChatConfig::builder()
            .base_url("http://10.0.0.2:11434/")
            .build()
            .unwrap();
        assert_eq!(c.base_url, "http://10.0.0.2:11434");
    }

    #[test]
    fn empty_model_rejected() {
        let err = DocChatConfig::builder().model("  ").build().unwrap_err();
        assert!(err.to_string().contains("Model identifier"));
    }
}
