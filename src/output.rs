//! Result types returned by the processing entry points.
//!
//! Everything here is plain data with `serde` derives so the CLI `--json`
//! mode can print the full run report, and so callers embedding the library
//! can persist or diff reports between runs.

use crate::error::{FileError, SegmentError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The complete result of one run over one or more input PDFs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// One entry per input file, in processing order.
    pub files: Vec<FileReport>,
    /// Aggregate counters for the whole run.
    pub stats: RunStats,
}

impl RunReport {
    /// True when every file produced all of its segments.
    pub fn is_full_success(&self) -> bool {
        self.stats.failed_files == 0 && self.stats.failed_segments == 0
    }
}

/// The outcome for a single input PDF.
///
/// `error` is `Some` when the file could not be processed at all; in that
/// case `segments` is empty. Individual segment failures live inside
/// [`SegmentOutput::error`] instead and do not poison the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// The input PDF path.
    pub input: PathBuf,
    /// Segments in page order. Empty when the whole file failed.
    pub segments: Vec<SegmentOutput>,
    /// Set when the file failed before any segment could be written.
    pub error: Option<FileError>,
}

impl FileReport {
    /// Number of segments that produced both a PDF and a Markdown file.
    pub fn segments_ok(&self) -> usize {
        self.segments.iter().filter(|s| s.error.is_none()).count()
    }
}

/// One produced segment: a page range written as a standalone PDF plus its
/// Markdown rendition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentOutput {
    /// 1-indexed position of the segment within its document.
    pub index: usize,
    /// Segment title (unsanitised bookmark title, file stem, or `Page N`).
    pub title: String,
    /// First page of the segment (0-indexed, inclusive).
    pub start_page: usize,
    /// One past the last page of the segment (0-indexed, exclusive).
    pub end_page: usize,
    /// Path of the written segment PDF.
    pub pdf_path: PathBuf,
    /// Path of the written Markdown file.
    pub md_path: PathBuf,
    /// Set when this segment failed; the paths then point at files that were
    /// not (fully) written.
    pub error: Option<SegmentError>,
}

/// Aggregate counters for a run.
///
/// Owned and updated by the batch driver; no global state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Input files discovered.
    pub total_files: usize,
    /// Files fully processed (possibly with individual segment failures).
    pub processed_files: usize,
    /// Files that failed outright.
    pub failed_files: usize,
    /// Segments planned across all files.
    pub total_segments: usize,
    /// Segments that produced both output files.
    pub converted_segments: usize,
    /// Segments that failed to split or convert.
    pub failed_segments: usize,
    /// Wall-clock duration of the whole run in milliseconds.
    pub total_duration_ms: u64,
}

/// Document metadata read from the PDF's information dictionary, plus the
/// flattened outline. Returned by [`crate::process::inspect`] and used for
/// extended YAML front matter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    /// Flattened outline in document order; empty when the PDF has no
    /// bookmarks.
    pub outline: Vec<OutlineEntry>,
}

/// One flattened bookmark: title, nesting level, and 0-indexed target page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub title: String,
    /// Nesting depth, 1 = top level.
    pub level: u32,
    /// 0-indexed destination page.
    pub page_index: usize,
}
