//! # splitmd
//!
//! Split PDFs along their bookmark outline and convert each slice to
//! Markdown for LLM preprocessing.
//!
//! ## Why this crate?
//!
//! Feeding a 400-page PDF to an LLM wastes context and buries the section
//! you care about. Authors already structured the document: the bookmark
//! outline names every chapter and points at its first page. This crate
//! turns that outline into a partition of the page range, writes each part
//! out as a standalone PDF, and extracts a Markdown rendition of the same
//! pages with headings inferred from font sizes. Each chapter becomes a
//! self-contained unit a model can ingest whole.
//!
//! All PDF parsing is delegated to pdfium via `pdfium-render`; nothing here
//! reads PDF syntax directly.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF (file or directory)
//!  │
//!  ├─ 1. Input    resolve and validate input PDFs
//!  ├─ 2. Outline  flatten the bookmark tree into document order
//!  ├─ 3. Segment  plan a gap-free partition of the page range
//!  ├─ 4. Split    copy each page range into a standalone PDF
//!  ├─ 5. Markdown extract positioned text, infer headings by font size
//!  └─ 6. Polish   deterministic cleanup (hyphens, quotes, blank lines)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use splitmd::{process, SplitConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SplitConfig::builder()
//!         .output_dir("output")
//!         .level(2)
//!         .build()?;
//!     let report = process("book.pdf", &config)?;
//!     for file in &report.files {
//!         println!("{}: {} segments", file.input.display(), file.segments.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `splitmd` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! splitmd = { version = "0.3", default-features = false }
//! ```
//!
//! ## Runtime Requirement
//!
//! A pdfium shared library must be available at runtime. Resolution order:
//! the directory named by `SPLITMD_PDFIUM_PATH`, then the current directory,
//! then the system library path.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    FolderLayout, PageSeparator, SplitConfig, SplitConfigBuilder, SplitMode,
};
pub use error::{FileError, SegmentError, SplitMdError};
pub use output::{
    DocumentMetadata, FileReport, OutlineEntry, RunReport, RunStats, SegmentOutput,
};
pub use process::{inspect, process};
pub use progress::{NoopProgressCallback, ProgressCallback, SplitProgressCallback};
