//! The grounded conversation session.
//!
//! A [`Session`] is an explicit value object holding exactly the per-user
//! mutable state: the bound [`Document`] (at most one, ever) and the
//! append-only turn history. Nothing here is global — callers create a
//! session, feed it one upload, and ask questions against it until they
//! drop it.
//!
//! ## State machine
//!
//! `Empty` (no document) → `Bound` (document + zero or more turns). The
//! transition happens at most once; there is no path back to `Empty` and no
//! rebinding to a different document. From `Bound`, each accepted question
//! is a self-loop appending one [`ConversationTurn`].
//!
//! ## No multi-turn model context
//!
//! Prior turns are never included in the prompt: each question is answered
//! fresh against the document alone. The history exists so the caller can
//! replay the exchange to the user, not to give the model memory.

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::DocChatConfig;
use crate::document::{ConversationTurn, Document};
use crate::error::DocChatError;
use crate::llm::{self, ChatCapability, OllamaChat};
use crate::normalize;
use crate::pipeline::ocr::{OcrEngine, TesseractOcr};
use crate::prompts;

/// Process/user-scoped conversation state bound to at most one document.
pub struct Session {
    config: DocChatConfig,
    chat: Arc<dyn ChatCapability>,
    ocr: Arc<dyn OcrEngine>,
    document: Option<Document>,
    turns: Vec<ConversationTurn>,
}

impl Session {
    /// Create an empty session.
    ///
    /// Capabilities injected through the config are used as-is; otherwise
    /// the session builds an [`OllamaChat`] client and a [`TesseractOcr`]
    /// engine from the config's endpoint and binary settings.
    pub fn new(config: DocChatConfig) -> Self {
        let chat: Arc<dyn ChatCapability> = match &config.chat {
            Some(chat) => Arc::clone(chat),
            None => Arc::new(OllamaChat::new(
                config.base_url.clone(),
                config.api_timeout_secs,
            )),
        };
        let ocr: Arc<dyn OcrEngine> = match &config.ocr {
            Some(ocr) => Arc::clone(ocr),
            None => Arc::new(TesseractOcr::from_config(&config)),
        };

        Self {
            config,
            chat,
            ocr,
            document: None,
            turns: Vec::new(),
        }
    }

    /// Normalize `bytes` and bind the resulting document to this session.
    ///
    /// First-write-wins: once a document is bound, further uploads are
    /// ignored (logged, `Ok(())`, bound document untouched). On failure the
    /// session is left unambiguously unbound so a retry with a different
    /// file is possible.
    pub async fn load_document(
        &mut self,
        bytes: &[u8],
        extension: &str,
    ) -> Result<(), DocChatError> {
        if self.document.is_some() {
            debug!("Session already bound to a document; ignoring upload");
            return Ok(());
        }

        let document = normalize::normalize(bytes, extension, &self.ocr, &self.config).await?;
        info!(
            "Document bound: {} ({} bytes text, {} bytes OCR text, {} embedded images)",
            document.format,
            document.raw_text.len(),
            document.image_derived_text.len(),
            document.embedded_images.len()
        );
        self.document = Some(document);
        Ok(())
    }

    /// Ask one question grounded in the bound document.
    ///
    /// Returns `None` — no turn appended, no dispatch — when the session is
    /// unbound or the question is whitespace-only. Otherwise the answer
    /// (model text or an `"Error querying …"` description) is appended as a
    /// turn and returned; dispatch failures are answers, never errors.
    pub async fn ask(&mut self, question: &str) -> Option<String> {
        let document = self.document.as_ref()?;
        if question.trim().is_empty() {
            debug!("Ignoring empty question");
            return None;
        }

        let prompt = prompts::grounded_prompt(document, question);
        let answer = llm::dispatch(&self.chat, &self.config.model, &prompt).await;

        self.turns.push(ConversationTurn {
            question: question.to_string(),
            answer: answer.clone(),
        });
        Some(answer)
    }

    /// The turn history, in submission order.
    pub fn history(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// The bound document, if any.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Whether a document has been bound.
    pub fn is_bound(&self) -> bool {
        self.document.is_some()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("bound", &self.document.is_some())
            .field("turns", &self.turns.len())
            .field("model", &self.config.model)
            .finish()
    }
}
