//! Processing entry points: single-run orchestration and the batch driver.
//!
//! One PDF is fully processed — opened, planned, split, converted, closed —
//! before the next begins. Per-file failures become [`FileError`] values
//! inside the report, never early returns, so a corrupt PDF in the middle of
//! a directory cannot abort the batch. All counters are explicit locals
//! threaded through the loop.

use crate::config::{FolderLayout, SplitConfig};
use crate::error::{FileError, SegmentError, SplitMdError};
use crate::naming::{segment_stem, LayoutPaths, UniqueNamer};
use crate::output::{DocumentMetadata, FileReport, RunReport, RunStats, SegmentOutput};
use crate::pipeline::{engine, input, markdown, outline, segment, split};
use pdfium_render::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};

/// Split and convert a PDF file or a directory of PDFs.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input`  — path to a PDF file or a directory containing PDFs
/// * `config` — run configuration
///
/// # Returns
/// `Ok(RunReport)` whenever the batch ran, even if some files failed
/// (check `report.stats.failed_files`).
///
/// # Errors
/// Returns `Err(SplitMdError)` only for fatal errors: input path missing or
/// unreadable, a directory with no PDFs, or no pdfium library to bind to.
pub fn process(input: impl AsRef<Path>, config: &SplitConfig) -> Result<RunReport, SplitMdError> {
    let run_start = Instant::now();
    let input = input.as_ref();
    info!("Starting run: {}", input.display());

    let files = input::resolve_inputs(input)?;
    let pdfium = engine::create_pdfium()?;
    let total_files = files.len();

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(total_files);
    }

    // Combined layout shares one output folder across all inputs, so the
    // namer must live at batch scope to keep names unique within it.
    // Separate layout gets a fresh namer per file.
    let mut shared_namer = UniqueNamer::new();

    let mut reports = Vec::with_capacity(total_files);
    let mut stats = RunStats {
        total_files,
        ..Default::default()
    };

    for (i, path) in files.iter().enumerate() {
        let file_num = i + 1;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if let Some(ref cb) = config.progress_callback {
            cb.on_file_start(file_num, total_files, &name);
        }
        info!("[{}/{}] Processing {}", file_num, total_files, name);

        let mut fresh_namer = UniqueNamer::new();
        let namer = match config.layout {
            FolderLayout::CombinedFolder => &mut shared_namer,
            FolderLayout::SeparateFolders => &mut fresh_namer,
        };

        let report = match process_file(&pdfium, path, config, file_num, namer) {
            Ok(segments) => {
                stats.processed_files += 1;
                stats.total_segments += segments.len();
                stats.converted_segments += segments.iter().filter(|s| s.error.is_none()).count();
                stats.failed_segments += segments.iter().filter(|s| s.error.is_some()).count();

                let ok = segments.iter().filter(|s| s.error.is_none()).count();
                if let Some(ref cb) = config.progress_callback {
                    cb.on_file_complete(file_num, total_files, ok);
                }
                FileReport {
                    input: path.clone(),
                    segments,
                    error: None,
                }
            }
            Err(e) => {
                stats.failed_files += 1;
                error!("[{}/{}] {}", file_num, total_files, e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_file_error(file_num, total_files, &e.to_string());
                }
                FileReport {
                    input: path.clone(),
                    segments: Vec::new(),
                    error: Some(e),
                }
            }
        };
        reports.push(report);
    }

    stats.total_duration_ms = run_start.elapsed().as_millis() as u64;
    info!(
        "Run complete: {}/{} files, {}/{} segments, {}ms",
        stats.processed_files,
        stats.total_files,
        stats.converted_segments,
        stats.total_segments,
        stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(total_files, stats.processed_files);
    }

    Ok(RunReport {
        files: reports,
        stats,
    })
}

/// Read a PDF's metadata and outline without writing anything.
///
/// Does not require an output directory and never touches the filesystem
/// beyond reading the input.
pub fn inspect(
    input: impl AsRef<Path>,
    password: Option<&str>,
) -> Result<DocumentMetadata, SplitMdError> {
    let input = input.as_ref();
    let files = input::resolve_inputs(input)?;
    if files.len() != 1 {
        return Err(SplitMdError::UnsupportedInput {
            path: input.to_path_buf(),
        });
    }

    let pdfium = engine::create_pdfium()?;
    let document = open_document(&pdfium, &files[0], password)?;

    Ok(outline::read_metadata(&document))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Process one PDF: open, plan, split, convert.
///
/// Segment failures are recorded inside the returned list; only whole-file
/// problems (open failure, unwritable output directory, every segment
/// failing) surface as `FileError`.
fn process_file(
    pdfium: &Pdfium,
    path: &Path,
    config: &SplitConfig,
    file_num: usize,
    namer: &mut UniqueNamer,
) -> Result<Vec<SegmentOutput>, FileError> {
    let document = open_document(pdfium, path, config.password.as_deref())?;

    let page_count = document.pages().len() as usize;
    if page_count == 0 {
        return Err(FileError::EmptyDocument {
            path: path.to_path_buf(),
        });
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let source_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| stem.clone());

    let doc_outline = outline::read_outline(&document);
    let metadata = if config.include_metadata {
        Some(outline::read_metadata(&document))
    } else {
        None
    };

    let segments = segment::plan_segments(
        config.mode,
        config.level,
        &doc_outline,
        page_count,
        &stem,
    );
    info!(
        "{}: {} pages → {} segments",
        source_name,
        page_count,
        segments.len()
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_segments_planned(file_num, segments.len());
    }

    let layout = LayoutPaths::resolve(&config.output_dir, config.layout, &stem);
    for dir in [&layout.pdf_dir, &layout.md_dir] {
        std::fs::create_dir_all(dir).map_err(|e| FileError::OutputDirFailed {
            path: dir.clone(),
            detail: e.to_string(),
        })?;
    }

    let total_segments = segments.len();
    let mut outputs = Vec::with_capacity(total_segments);

    for seg in &segments {
        let file_stem = namer.claim(&segment_stem(seg.index, &seg.title));
        let pdf_path = layout.pdf_dir.join(format!("{}.pdf", file_stem));
        let md_path = layout.md_dir.join(format!("{}.md", file_stem));

        let result = write_segment(
            pdfium,
            &document,
            seg,
            &source_name,
            config,
            metadata.as_ref(),
            &pdf_path,
            &md_path,
        );

        match &result {
            Ok(()) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_segment_complete(seg.index, total_segments, &seg.title);
                }
            }
            Err(e) => {
                warn!("{}: {}", source_name, e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_segment_error(seg.index, total_segments, &e.to_string());
                }
            }
        }

        outputs.push(SegmentOutput {
            index: seg.index,
            title: seg.title.clone(),
            start_page: seg.start,
            end_page: seg.end,
            pdf_path,
            md_path,
            error: result.err(),
        });
    }

    if !outputs.is_empty() && outputs.iter().all(|s| s.error.is_some()) {
        let first_error = outputs
            .iter()
            .find_map(|s| s.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(FileError::AllSegmentsFailed {
            path: path.to_path_buf(),
            total: outputs.len(),
            first_error,
        });
    }

    Ok(outputs)
}

/// Write one segment's PDF and Markdown files.
#[allow(clippy::too_many_arguments)]
fn write_segment(
    pdfium: &Pdfium,
    document: &PdfDocument<'_>,
    seg: &segment::Segment,
    source_name: &str,
    config: &SplitConfig,
    metadata: Option<&DocumentMetadata>,
    pdf_path: &Path,
    md_path: &Path,
) -> Result<(), SegmentError> {
    split::write_segment_pdf(pdfium, document, seg, pdf_path)?;

    let md = markdown::segment_markdown(
        document,
        seg,
        source_name,
        &config.page_separator,
        metadata,
    )?;

    // Atomic write: temp file + rename, so an interrupted run never leaves a
    // half-written Markdown file behind.
    let tmp_path = md_path.with_extension("md.tmp");
    let write_err = |detail: String| SegmentError::MarkdownWriteFailed {
        title: seg.title.clone(),
        path: md_path.to_path_buf(),
        detail,
    };
    std::fs::write(&tmp_path, &md).map_err(|e| write_err(e.to_string()))?;
    std::fs::rename(&tmp_path, md_path).map_err(|e| write_err(e.to_string()))?;

    Ok(())
}

/// Open a PDF, classifying pdfium failures into per-file error kinds.
fn open_document<'a>(
    pdfium: &'a Pdfium,
    path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, FileError> {
    pdfium.load_pdf_from_file(path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                FileError::WrongPassword {
                    path: path.to_path_buf(),
                }
            } else {
                FileError::PasswordRequired {
                    path: path.to_path_buf(),
                }
            }
        } else {
            FileError::CorruptPdf {
                path: path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}
