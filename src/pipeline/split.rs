//! Segment writing: copy a planned page range into a new PDF document.
//!
//! pdfium does the heavy lifting (`create_new_pdf` + page-range import +
//! save); this stage only translates a [`Segment`] into the inclusive u16
//! range pdfium expects and maps failures to per-segment errors so one bad
//! segment never aborts its siblings.

use crate::error::SegmentError;
use crate::pipeline::segment::Segment;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::debug;

/// Copy `segment`'s page range out of `source` into a standalone PDF at
/// `path`.
///
/// The planner guarantees `start < end <= page_count`, so the inclusive
/// range conversion below cannot underflow.
pub fn write_segment_pdf(
    pdfium: &Pdfium,
    source: &PdfDocument<'_>,
    segment: &Segment,
    path: &Path,
) -> Result<(), SegmentError> {
    let split_err = |detail: String| SegmentError::SplitFailed {
        title: segment.title.clone(),
        start: segment.start,
        end: segment.end,
        detail,
    };

    let mut dest = pdfium
        .create_new_pdf()
        .map_err(|e| split_err(format!("{:?}", e)))?;

    let first = segment.start as PdfPageIndex;
    let last = (segment.end - 1) as PdfPageIndex;
    dest.pages_mut()
        .copy_page_range_from_document(source, first..=last, 0)
        .map_err(|e| split_err(format!("{:?}", e)))?;

    dest.save_to_file(path)
        .map_err(|e| split_err(format!("{:?}", e)))?;

    debug!(
        "Wrote segment '{}' (pages {}..{}) → {}",
        segment.title,
        segment.start,
        segment.end,
        path.display()
    );

    Ok(())
}
