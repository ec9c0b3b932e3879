//! Configuration types for splitting and Markdown conversion.
//!
//! All run behaviour is controlled through [`SplitConfig`], built via its
//! [`SplitConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share configs across calls, serialise them for logging, and diff two
//! runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field.
//! The builder pattern lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::SplitMdError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration for one splitmd run.
///
/// Built via [`SplitConfig::builder()`] or using [`SplitConfig::default()`].
///
/// # Example
/// ```rust
/// use splitmd::{FolderLayout, SplitConfig, SplitMode};
///
/// let config = SplitConfig::builder()
///     .mode(SplitMode::Bookmarks)
///     .level(2)
///     .output_dir("out")
///     .layout(FolderLayout::CombinedFolder)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct SplitConfig {
    /// How segments are derived from the document. Default: [`SplitMode::Bookmarks`].
    pub mode: SplitMode,

    /// Bookmark level that defines segment boundaries (1 = top level). Default: 1.
    ///
    /// Entries deeper than this level are absorbed into their nearest ancestor
    /// segment. If the document's outline never reaches this depth, the run
    /// falls back to the deepest level that exists, so a `--level 3` request
    /// on a two-level outline still splits rather than producing nothing.
    pub level: u32,

    /// Base output directory. Default: `output`.
    pub output_dir: PathBuf,

    /// Folder layout for batch runs. Default: [`FolderLayout::SeparateFolders`].
    pub layout: FolderLayout,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Include extended YAML front matter (author, producer, page count)
    /// read from the document's metadata tags. Default: false.
    ///
    /// The basic front matter (`title`, `source`) is always written; it is
    /// what downstream LLM pipelines key on to attribute a chunk back to its
    /// source document.
    pub include_metadata: bool,

    /// Page separator in each segment's Markdown. Default: None.
    pub page_separator: PageSeparator,

    /// Progress callback invoked after each file/segment completes.
    /// Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            mode: SplitMode::default(),
            level: 1,
            output_dir: PathBuf::from("output"),
            layout: FolderLayout::default(),
            password: None,
            include_metadata: false,
            page_separator: PageSeparator::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SplitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitConfig")
            .field("mode", &self.mode)
            .field("level", &self.level)
            .field("output_dir", &self.output_dir)
            .field("layout", &self.layout)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("include_metadata", &self.include_metadata)
            .field("page_separator", &self.page_separator)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl SplitConfig {
    /// Create a new builder for `SplitConfig`.
    pub fn builder() -> SplitConfigBuilder {
        SplitConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SplitConfig`].
#[derive(Debug)]
pub struct SplitConfigBuilder {
    config: SplitConfig,
}

impl SplitConfigBuilder {
    pub fn mode(mut self, mode: SplitMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn level(mut self, level: u32) -> Self {
        self.config.level = level;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn layout(mut self, layout: FolderLayout) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn include_metadata(mut self, v: bool) -> Self {
        self.config.include_metadata = v;
        self
    }

    pub fn page_separator(mut self, sep: PageSeparator) -> Self {
        self.config.page_separator = sep;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SplitConfig, SplitMdError> {
        let c = &self.config;
        if c.level == 0 {
            return Err(SplitMdError::InvalidConfig(
                "Bookmark level is 1-indexed; minimum is 1".into(),
            ));
        }
        if c.output_dir.as_os_str().is_empty() {
            return Err(SplitMdError::InvalidConfig(
                "Output directory must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How a document is divided into segments.
///
/// Whole and pages modes are degenerate cases of the bookmark segment model:
/// all three produce the same [`crate::pipeline::segment::Segment`] list and
/// share every downstream writing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SplitMode {
    /// One segment per bookmark at the configured level (default).
    /// Falls back to whole-document mode when the PDF has no outline.
    #[default]
    Bookmarks,
    /// One segment spanning the entire document.
    Whole,
    /// One segment per page.
    Pages,
}

/// Output folder layout for batch runs.
///
/// With `SeparateFolders` each input PDF gets its own subfolder under the
/// output root; with `CombinedFolder` all inputs share one pair of output
/// folders and segment names are disambiguated instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FolderLayout {
    /// `<output>/<pdf-stem>/Split_PDFs` + `<output>/<pdf-stem>/MD_Files` (default).
    #[default]
    SeparateFolders,
    /// `<output>/Split_PDFs` + `<output>/MD_Files` shared by all inputs.
    CombinedFolder,
}

/// How to separate pages inside a segment's Markdown output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSeparator {
    /// No separator; pages joined with "\n\n". (default)
    #[default]
    None,
    /// Horizontal rule: "\n\n---\n\n"
    HorizontalRule,
    /// HTML comment with page number: "<!-- page N -->"
    Comment,
    /// Custom string inserted between pages.
    Custom(String),
}

impl PageSeparator {
    /// Render the separator string for the given page number (1-indexed).
    pub fn render(&self, page_num: usize) -> String {
        match self {
            PageSeparator::None => "\n\n".to_string(),
            PageSeparator::HorizontalRule => "\n\n---\n\n".to_string(),
            PageSeparator::Comment => format!("\n\n<!-- page {} -->\n\n", page_num),
            PageSeparator::Custom(s) => format!("\n\n{}\n\n", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SplitConfig::builder().build().unwrap();
        assert_eq!(config.mode, SplitMode::Bookmarks);
        assert_eq!(config.level, 1);
        assert_eq!(config.layout, FolderLayout::SeparateFolders);
        assert_eq!(config.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn level_zero_is_rejected() {
        let err = SplitConfig::builder().level(0).build().unwrap_err();
        assert!(matches!(err, SplitMdError::InvalidConfig(_)));
    }

    #[test]
    fn empty_output_dir_is_rejected() {
        let err = SplitConfig::builder().output_dir("").build().unwrap_err();
        assert!(matches!(err, SplitMdError::InvalidConfig(_)));
    }

    #[test]
    fn debug_redacts_password() {
        let config = SplitConfig::builder().password("hunter2").build().unwrap();
        let dbg = format!("{:?}", config);
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("redacted"));
    }

    #[test]
    fn separator_render() {
        assert_eq!(PageSeparator::None.render(3), "\n\n");
        assert_eq!(PageSeparator::HorizontalRule.render(3), "\n\n---\n\n");
        assert!(PageSeparator::Comment.render(3).contains("page 3"));
        assert_eq!(
            PageSeparator::Custom("***".into()).render(1),
            "\n\n***\n\n"
        );
    }
}
