//! Segment planning: turn an outline, a page count, and a split mode into an
//! ordered list of page ranges.
//!
//! This stage is pure — no pdfium types, no I/O — so every boundary rule and
//! fallback is unit-testable without a PDF. The planner guarantees a single
//! invariant that all downstream stages rely on: the returned segments
//! partition `[0, page_count)` exactly, in order, with no gaps, no overlaps,
//! and no empty ranges.
//!
//! ## Boundary rules (bookmarks mode)
//!
//! * Outline entries at or above the requested level start a new segment;
//!   deeper entries are absorbed into their nearest ancestor segment.
//! * Consecutive boundaries on the same page merge; the first title wins.
//! * A boundary whose target page precedes an earlier boundary is absorbed
//!   (boundaries never move backwards); targets past the last page clamp to
//!   the last page.
//! * Pages before the first boundary become a leading "Front Matter" segment
//!   so the cover and table of contents are not dropped.
//!
//! ## Fallbacks
//!
//! * No outline at all → whole-document mode.
//! * Requested level deeper than the outline's deepest level → the deepest
//!   level that exists.

use crate::config::SplitMode;
use crate::output::OutlineEntry;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Title used for the implicit segment covering pages before the first
/// bookmark boundary.
pub const FRONT_MATTER_TITLE: &str = "Front Matter";

/// A planned contiguous page range `[start, end)` producing one output PDF
/// and one Markdown file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// 1-indexed position within the document.
    pub index: usize,
    /// Unsanitised display title.
    pub title: String,
    /// First page, 0-indexed, inclusive.
    pub start: usize,
    /// One past the last page, 0-indexed, exclusive. Always `> start`.
    pub end: usize,
}

impl Segment {
    /// Number of pages covered by this segment.
    pub fn page_count(&self) -> usize {
        self.end - self.start
    }
}

/// Plan the segments for one document.
///
/// `doc_stem` titles the whole-document segment (and the bookmark-mode
/// fallback when the outline is empty). `page_count` must be non-zero; the
/// caller rejects empty documents before planning.
pub fn plan_segments(
    mode: SplitMode,
    level: u32,
    outline: &[OutlineEntry],
    page_count: usize,
    doc_stem: &str,
) -> Vec<Segment> {
    debug_assert!(page_count > 0, "empty documents are rejected upstream");

    match mode {
        SplitMode::Whole => whole_segment(page_count, doc_stem),
        SplitMode::Pages => per_page_segments(page_count),
        SplitMode::Bookmarks => {
            if outline.is_empty() {
                warn!("No bookmarks found; falling back to whole-document mode");
                return whole_segment(page_count, doc_stem);
            }
            bookmark_segments(level, outline, page_count)
        }
    }
}

fn whole_segment(page_count: usize, doc_stem: &str) -> Vec<Segment> {
    vec![Segment {
        index: 1,
        title: doc_stem.to_string(),
        start: 0,
        end: page_count,
    }]
}

fn per_page_segments(page_count: usize) -> Vec<Segment> {
    (0..page_count)
        .map(|p| Segment {
            index: p + 1,
            title: format!("Page {}", p + 1),
            start: p,
            end: p + 1,
        })
        .collect()
}

fn bookmark_segments(level: u32, outline: &[OutlineEntry], page_count: usize) -> Vec<Segment> {
    let deepest = outline.iter().map(|e| e.level).max().unwrap_or(1);
    let effective = level.min(deepest);
    if effective < level {
        warn!(
            "Requested bookmark level {} exceeds outline depth {}; using level {}",
            level, deepest, effective
        );
    }

    // Collect boundaries in document order: (start_page, title).
    let mut boundaries: Vec<(usize, &str)> = Vec::new();
    for entry in outline.iter().filter(|e| e.level <= effective) {
        let page = entry.page_index.min(page_count - 1);
        match boundaries.last() {
            // Same page as the previous boundary: merge, first title wins.
            Some(&(last, _)) if page == last => {}
            // Target jumped backwards (malformed outline): absorb.
            Some(&(last, _)) if page < last => {
                warn!(
                    "Bookmark '{}' targets page {} before the previous boundary; absorbing",
                    entry.title, page
                );
            }
            _ => boundaries.push((page, entry.title.as_str())),
        }
    }

    // Cover any pages ahead of the first bookmark.
    let mut segments = Vec::with_capacity(boundaries.len() + 1);
    if boundaries.first().map(|&(p, _)| p) != Some(0) {
        let first = boundaries.first().map(|&(p, _)| p).unwrap_or(page_count);
        segments.push(Segment {
            index: 1,
            title: FRONT_MATTER_TITLE.to_string(),
            start: 0,
            end: first,
        });
    }

    for (i, &(start, title)) in boundaries.iter().enumerate() {
        let end = boundaries
            .get(i + 1)
            .map(|&(next, _)| next)
            .unwrap_or(page_count);
        segments.push(Segment {
            index: segments.len() + 1,
            title: title.to_string(),
            start,
            end,
        });
    }

    debug!(
        "Planned {} segments at level {} over {} pages",
        segments.len(),
        effective,
        page_count
    );

    segments
}
