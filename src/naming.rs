//! Output naming and folder layout.
//!
//! Bookmark titles arrive as arbitrary Unicode ("3.2  What is a «monad»?…")
//! and must become filesystem-safe, deterministic, collision-free file names.
//! The rules here are deliberately boring: strip anything outside word
//! characters/whitespace/hyphens, collapse runs to a single underscore, cap
//! the length, and disambiguate duplicates with a numeric suffix. Running the
//! tool twice over the same input yields byte-identical paths, so outputs are
//! overwritten rather than duplicated.

use crate::config::FolderLayout;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Subfolder receiving the per-segment PDFs.
pub const PDF_SUBDIR: &str = "Split_PDFs";

/// Subfolder receiving the per-segment Markdown files.
pub const MD_SUBDIR: &str = "MD_Files";

/// Maximum character length of a sanitised title within a file name.
/// Long enough for real chapter titles, short enough to stay well inside
/// every filesystem's 255-byte component limit once the numeric prefix and
/// extension are added.
const MAX_TITLE_CHARS: usize = 80;

static RE_DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static RE_SEPARATOR_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_]+").unwrap());

/// Sanitise a bookmark title into a filesystem-safe name fragment.
///
/// Guarantees: never empty, never contains path separators or characters
/// outside `[A-Za-z0-9_-]` plus Unicode word characters, never longer than
/// [`MAX_TITLE_CHARS`] characters.
pub fn sanitize_title(title: &str) -> String {
    let stripped = RE_DISALLOWED.replace_all(title, "");
    let collapsed = RE_SEPARATOR_RUNS.replace_all(stripped.trim(), "_");
    let trimmed = collapsed.trim_matches('_');

    let truncated: String = trimmed.chars().take(MAX_TITLE_CHARS).collect();
    let truncated = truncated.trim_matches('_').to_string();

    if truncated.is_empty() {
        "untitled".to_string()
    } else {
        truncated
    }
}

/// Hands out unique file stems within one output folder.
///
/// The first claim of a stem returns it unchanged; later claims of the same
/// stem get `_2`, `_3`, … appended. Claims are processed in segment order, so
/// the mapping is deterministic for a given input.
#[derive(Debug, Default)]
pub struct UniqueNamer {
    seen: HashMap<String, usize>,
}

impl UniqueNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a stem, returning a variant unique among all prior claims.
    pub fn claim(&mut self, stem: &str) -> String {
        // Case-insensitive bookkeeping: HFS+/NTFS would silently merge
        // "Intro" and "INTRO" otherwise.
        let key = stem.to_lowercase();
        let count = self.seen.entry(key).or_insert(0);
        *count += 1;
        if *count == 1 {
            stem.to_string()
        } else {
            format!("{}_{}", stem, count)
        }
    }
}

/// Resolved output folders for one input PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPaths {
    /// Folder for the segment PDFs.
    pub pdf_dir: PathBuf,
    /// Folder for the segment Markdown files.
    pub md_dir: PathBuf,
}

impl LayoutPaths {
    /// Compute the output folders for `pdf_stem` under `output_root`.
    ///
    /// Separate-folders layout nests a per-document subfolder; combined
    /// layout shares one pair of folders across all inputs.
    pub fn resolve(output_root: &Path, layout: FolderLayout, pdf_stem: &str) -> Self {
        let base = match layout {
            FolderLayout::SeparateFolders => output_root.join(sanitize_title(pdf_stem)),
            FolderLayout::CombinedFolder => output_root.to_path_buf(),
        };
        Self {
            pdf_dir: base.join(PDF_SUBDIR),
            md_dir: base.join(MD_SUBDIR),
        }
    }
}

/// Build the numbered file stem for a segment: `NNN_<sanitised title>`.
///
/// The 3-digit, 1-based prefix keeps directory listings in reading order and
/// is what makes re-runs idempotent even when two chapters share a title.
pub fn segment_stem(index: usize, title: &str) -> String {
    format!("{:03}_{}", index, sanitize_title(title))
}
