//! Outline and metadata extraction.
//!
//! pdfium exposes bookmarks as a tree of `PdfBookmark` nodes; segment
//! planning wants a flat, document-ordered list of `(title, level, page)`
//! records with no pdfium lifetimes attached. Flattening here keeps every
//! later stage free of pdfium types.

use crate::output::{DocumentMetadata, OutlineEntry};
use pdfium_render::prelude::*;
use tracing::{debug, warn};

/// Flatten the document's bookmark tree depth-first into document order.
///
/// Only the root's sibling chain is walked here; `flatten_bookmark` descends
/// into children itself, so each bookmark is visited exactly once at its
/// true depth.
///
/// Entries whose destination page cannot be resolved (action-only bookmarks,
/// broken links) are skipped with a warning; their children are still
/// visited so a malformed parent does not hide an intact subtree.
pub fn read_outline(document: &PdfDocument<'_>) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();

    let mut node = document.bookmarks().root();
    while let Some(bookmark) = node {
        flatten_bookmark(&bookmark, 1, &mut entries);
        node = bookmark.next_sibling();
    }

    debug!("Flattened {} outline entries", entries.len());
    entries
}

fn flatten_bookmark(bookmark: &PdfBookmark, level: u32, out: &mut Vec<OutlineEntry>) {
    let title = bookmark
        .title()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Untitled".to_string());

    match bookmark
        .destination()
        .and_then(|dest| dest.page_index().ok())
    {
        Some(page_index) => out.push(OutlineEntry {
            title,
            level,
            page_index: page_index as usize,
        }),
        None => warn!("Bookmark '{}' has no resolvable destination; skipping", title),
    }

    let mut child = bookmark.first_child();
    while let Some(c) = child {
        flatten_bookmark(&c, level + 1, out);
        child = c.next_sibling();
    }
}

/// Read the document information dictionary and outline.
pub fn read_metadata(document: &PdfDocument<'_>) -> DocumentMetadata {
    let metadata = document.metadata();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        page_count: document.pages().len() as usize,
        outline: read_outline(document),
    }
}
