//! Error types for the splitmd library.
//!
//! Three distinct error types reflect three distinct failure scopes:
//!
//! * [`SplitMdError`] — **Fatal**: the run cannot proceed at all (input path
//!   does not exist, invalid configuration, no pdfium library). Returned as
//!   `Err(SplitMdError)` from the top-level `process*` functions.
//!
//! * [`FileError`] — **Per-file**: one PDF in a batch failed (corrupt file,
//!   wrong password, unwritable output directory) but the remaining files are
//!   fine. Stored inside [`crate::output::FileReport`] so batch runs continue
//!   and callers can inspect partial success.
//!
//! * [`SegmentError`] — **Per-segment**: one split segment failed to write or
//!   convert; the other segments of the same document proceed.
//!
//! The separation lets callers decide their own tolerance: abort on the first
//! file failure, log and continue, or collect all errors for a post-run report.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the splitmd library.
///
/// File-level failures use [`FileError`] and are stored in
/// [`crate::output::FileReport`] rather than propagated here.
#[derive(Debug, Error)]
pub enum SplitMdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input path was not found.
    #[error("Input path not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the input.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// The input directory contains no PDF files.
    #[error("No PDF files found in directory: '{path}'")]
    EmptyDirectory { path: PathBuf },

    /// The input is neither a regular file nor a directory.
    #[error("Input path is neither a file nor a directory: '{path}'")]
    UnsupportedInput { path: PathBuf },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set SPLITMD_PDFIUM_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Place the pdfium shared library in the current directory.\n\
  • Install libpdfium system-wide.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Promoted file errors ──────────────────────────────────────────────
    /// A per-file failure in a context where there is only one file, so it
    /// is fatal (e.g. `inspect` on an encrypted PDF).
    #[error(transparent)]
    File(#[from] FileError),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single input file in a batch run.
///
/// Stored in [`crate::output::FileReport`]; the batch driver logs it and
/// moves on to the next file.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt or unreadable: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The document reports zero pages; nothing to split.
    #[error("PDF '{path}' has no pages")]
    EmptyDocument { path: PathBuf },

    /// Could not create the output directories for this file.
    #[error("Failed to create output directory '{path}': {detail}")]
    OutputDirFailed { path: PathBuf, detail: String },

    /// Every segment of this document failed to write.
    #[error("All {total} segments failed for '{path}'.\nFirst error: {first_error}")]
    AllSegmentsFailed {
        path: PathBuf,
        total: usize,
        first_error: String,
    },
}

/// A non-fatal error for a single segment of a document.
///
/// Stored alongside [`crate::output::SegmentOutput`] when one segment fails;
/// the remaining segments of the same document still proceed.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum SegmentError {
    /// Copying the page range into a new PDF (or saving it) failed.
    #[error("Segment '{title}' (pages {start}-{end}): split failed: {detail}")]
    SplitFailed {
        title: String,
        start: usize,
        end: usize,
        detail: String,
    },

    /// Text extraction failed for the segment's pages.
    #[error("Segment '{title}': text extraction failed: {detail}")]
    ExtractionFailed { title: String, detail: String },

    /// Could not write the segment's Markdown file.
    #[error("Segment '{title}': failed to write '{path}': {detail}")]
    MarkdownWriteFailed {
        title: String,
        path: PathBuf,
        detail: String,
    },
}
