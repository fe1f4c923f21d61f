//! # docchat
//!
//! Chat with a single PDF or Word document through a local vision LLM.
//!
//! ## Why this crate?
//!
//! Feeding a raw PDF to a language model loses everything that is only
//! *visually* present — charts, scanned tables, text styled as an image.
//! This crate normalizes a document into one canonical representation with
//! **two independent text channels**: the native text layer, and a
//! dual-pass OCR channel covering both embedded images and full-page
//! rasters. Every question is then grounded in that representation before
//! being dispatched to the model.
//!
//! ## Pipeline Overview
//!
//! ```text
//! file bytes
//!  │
//!  ├─ 1. Dispatch   select format from the extension (pdf / docx)
//!  ├─ 2. Text       native structural text via pdfium / docx-rs
//!  ├─ 3. Rasters    embedded image objects + full-page renders
//!  ├─ 4. OCR        tesseract over both passes, failures → empty text
//!  └─ 5. Document   bound once to a Session
//!
//! per question:  Session ──grounded prompt──▶ Ollama /api/chat ──▶ turn
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docchat::{DocChatConfig, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DocChatConfig::default(); // llava:7b on localhost:11434
//!     let mut session = Session::new(config);
//!
//!     let bytes = std::fs::read("report.pdf")?;
//!     session.load_document(&bytes, "pdf").await?;
//!
//!     if let Some(answer) = session.ask("What does the chart on page 2 show?").await {
//!         println!("{answer}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docchat` REPL binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! docchat = { version = "0.1", default-features = false }
//! ```
//!
//! ## External requirements
//!
//! * A pdfium shared library (system-wide or via `PDFIUM_LIB_PATH`).
//! * The `tesseract` binary on PATH (or set via config) — OCR silently
//!   degrades to empty text without it.
//! * An Ollama-compatible chat endpoint; unreachable endpoints surface as
//!   `"Error querying …"` answers, never as crashes.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod llm;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{DocChatConfig, DocChatConfigBuilder};
pub use document::{ConversationTurn, Document, DocumentFormat};
pub use error::{DispatchError, DocChatError};
pub use llm::{ChatCapability, ChatMessage, OllamaChat};
pub use normalize::normalize;
pub use pipeline::ocr::{OcrEngine, TesseractOcr};
pub use session::Session;
