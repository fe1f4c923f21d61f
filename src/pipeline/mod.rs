//! Normalization pipeline stages.
//!
//! Each submodule implements exactly one extraction concern. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. a different OCR engine) without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! bytes ──▶ text ─────────────────────────────▶ raw_text
//!       └─▶ images ──▶ ocr ──────────────────▶ image_derived_text
//!           (pdfium)   (tesseract, 2 passes)
//! ```
//!
//! 1. [`text`]   — native structural text (pdfium pages / docx paragraphs);
//!    runs in `spawn_blocking` because neither parser is async-safe
//! 2. [`images`] — embedded image objects plus full-page rasters, both in
//!    document order (PDF only)
//! 3. [`ocr`]    — per-image recognition with bounded, order-preserving
//!    concurrency; the only stage allowed to swallow failures

pub mod images;
pub mod ocr;
pub mod text;
