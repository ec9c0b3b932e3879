//! Pipeline stages for bookmark splitting and Markdown conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different heading heuristic) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ outline ──▶ segment ──▶ split ──▶ markdown ──▶ postprocess
//! (path/dir) (pdfium)   (pure)     (pdfium)  (pdfium)      (cleanup)
//! ```
//!
//! 1. [`engine`]  — resolve the pdfium shared-library binding once per run
//! 2. [`input`]   — expand the user-supplied path to the list of PDFs to
//!    process, validating magic bytes
//! 3. [`outline`] — read the document's bookmark tree and metadata tags,
//!    flattened into plain data
//! 4. [`segment`] — pure planning: turn outline + page count + mode into a
//!    gap-free, overlap-free list of page ranges
//! 5. [`split`]   — copy each planned page range into a new PDF document
//! 6. [`markdown`] — extract positioned text spans and format them as
//!    Markdown with font-size heading heuristics
//! 7. [`postprocess`] — deterministic text-cleanup rules (line endings,
//!    typographic artefacts, blank-line collapse, final newline)

pub mod engine;
pub mod input;
pub mod markdown;
pub mod outline;
pub mod postprocess;
pub mod segment;
pub mod split;
