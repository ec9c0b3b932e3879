//! CLI binary for splitmd.
//!
//! A thin shim over the library crate that maps CLI flags to `SplitConfig`
//! and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use splitmd::{
    inspect, process, FolderLayout, PageSeparator, ProgressCallback, SplitConfig, SplitMode,
    SplitProgressCallback,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar across segments
/// and per-segment log lines using [indicatif]. Files are processed one at a
/// time, so the bar length is reset whenever a new file's segments are
/// planned.
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically by
    /// `on_segments_planned` (called after each file's outline is read).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set per file

        // Initial style: spinner only (no counter until segments are planned).
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} segments  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Splitting");
    }
}

impl SplitProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_files: usize) {
        if total_files > 1 {
            self.bar.println(format!(
                "{} {}",
                cyan("◆"),
                bold(&format!("Processing {total_files} PDF files…"))
            ));
        }
    }

    fn on_file_start(&self, file_num: usize, total_files: usize, name: &str) {
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("[{file_num}/{total_files}] {name}"))
        ));
        self.bar.set_message(name.to_string());
    }

    fn on_segments_planned(&self, _file_num: usize, segment_count: usize) {
        self.activate_bar(segment_count);
    }

    fn on_segment_complete(&self, segment_num: usize, total_segments: usize, title: &str) {
        self.bar.println(format!(
            "  {} Segment {:>3}/{:<3}  {}",
            green("✓"),
            segment_num,
            total_segments,
            dim(title),
        ));
        self.bar.inc(1);
    }

    fn on_segment_error(&self, segment_num: usize, total_segments: usize, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = truncate_message(error, 80);

        self.bar.println(format!(
            "  {} Segment {:>3}/{:<3}  {}",
            red("✗"),
            segment_num,
            total_segments,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, file_num: usize, total_files: usize, error: &str) {
        self.bar.println(format!(
            "  {} [{}/{}] {}",
            red("✗"),
            file_num,
            total_files,
            red(error),
        ));
    }

    fn on_run_complete(&self, total_files: usize, files_ok: usize) {
        let failed = total_files.saturating_sub(files_ok);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} files processed successfully",
                green("✔"),
                bold(&files_ok.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files processed  ({} failed)",
                if failed == total_files {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&files_ok.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Split along top-level bookmarks (chapters)
  splitmd book.pdf

  # Split on chapters AND sections
  splitmd --level 2 book.pdf -o out/

  # Every PDF in a directory, one output folder per document
  splitmd ./pdfs/ --separate-folders

  # No splitting, just convert whole documents
  splitmd --mode whole report.pdf

  # One segment per page
  splitmd --mode pages slides.pdf

  # Encrypted document
  splitmd --password hunter2 sealed.pdf

  # Inspect the outline without writing anything
  splitmd --inspect-only book.pdf

  # Machine-readable run report
  splitmd --json book.pdf > report.json

SPLIT MODES:
  bookmarks (default)  Partition pages at outline entries at or above --level.
                       Falls back to whole-document when there is no outline.
  whole                One segment spanning the entire document.
  pages                One segment per page.

OUTPUT LAYOUT:
  <output>/<doc>/Split_PDFs/NNN_Title.pdf     (--separate-folders, default)
  <output>/<doc>/MD_Files/NNN_Title.md
  <output>/Split_PDFs/NNN_Title.pdf           (--combined-folder)
  <output>/MD_Files/NNN_Title.md

ENVIRONMENT VARIABLES:
  SPLITMD_OUTPUT        Output directory (same as -o)
  SPLITMD_LEVEL         Bookmark depth (same as -l)
  SPLITMD_MODE          Split mode (same as -m)
  SPLITMD_PASSWORD      PDF user password
  SPLITMD_SEPARATOR     Page separator in Markdown output
  SPLITMD_PDFIUM_PATH   Directory containing the pdfium shared library

SETUP:
  splitmd needs the pdfium shared library at runtime. Either install it
  system-wide, drop it in the working directory, or point
  SPLITMD_PDFIUM_PATH at the directory containing it. Prebuilt binaries:
  https://github.com/bblanchon/pdfium-binaries
"#;

/// Split PDFs by bookmark hierarchy and convert each part to Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "splitmd",
    version,
    about = "Split PDFs by bookmark hierarchy and convert each part to Markdown",
    long_about = "Split PDF documents along their bookmark outline into standalone per-chapter \
PDFs, each paired with a Markdown rendition whose headings are inferred from font sizes. \
Built for preparing large documents for LLM ingestion: every chapter becomes a \
self-contained unit.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file or directory containing PDFs.
    input: PathBuf,

    /// Output directory root.
    #[arg(short, long, env = "SPLITMD_OUTPUT", default_value = "output")]
    output: PathBuf,

    /// Bookmark depth to split at (1 = top-level chapters).
    #[arg(short, long, env = "SPLITMD_LEVEL", default_value_t = 1,
          value_parser = clap::value_parser!(u32).range(1..))]
    level: u32,

    /// Split mode.
    #[arg(short, long, env = "SPLITMD_MODE", value_enum, default_value = "bookmarks")]
    mode: ModeArg,

    /// One output folder per input document (default).
    #[arg(long, conflicts_with = "combined_folder")]
    separate_folders: bool,

    /// All outputs share one Split_PDFs/ and one MD_Files/ folder.
    #[arg(long)]
    combined_folder: bool,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "SPLITMD_PASSWORD")]
    password: Option<String>,

    /// Page separator in Markdown output: none, hr, comment, or custom string.
    #[arg(long, env = "SPLITMD_SEPARATOR", default_value = "none")]
    separator: String,

    /// Prepend extended YAML front-matter with document metadata.
    #[arg(long, env = "SPLITMD_METADATA")]
    metadata: bool,

    /// Output a structured JSON run report instead of human-readable text.
    #[arg(long, env = "SPLITMD_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "SPLITMD_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata and outline only, no splitting.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SPLITMD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SPLITMD_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Bookmarks,
    Whole,
    Pages,
}

impl From<ModeArg> for SplitMode {
    fn from(v: ModeArg) -> Self {
        match v {
            ModeArg::Bookmarks => SplitMode::Bookmarks,
            ModeArg::Whole => SplitMode::Whole,
            ModeArg::Pages => SplitMode::Pages,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input, cli.password.as_deref())
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:      {}", cli.input.display());
            if let Some(ref t) = meta.title {
                println!("Title:     {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:    {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:   {}", s);
            }
            println!("Pages:     {}", meta.page_count);
            if let Some(ref p) = meta.producer {
                println!("Producer:  {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:   {}", c);
            }
            if meta.outline.is_empty() {
                println!("Outline:   (none)");
            } else {
                println!("Outline:   {} entries", meta.outline.len());
                for entry in &meta.outline {
                    let indent = "  ".repeat(entry.level.saturating_sub(1) as usize);
                    println!(
                        "{}{}  {}",
                        indent,
                        entry.title,
                        dim(&format!("(p. {})", entry.page_index + 1))
                    );
                }
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn SplitProgressCallback>)
    } else {
        None
    };

    let layout = if cli.combined_folder {
        FolderLayout::CombinedFolder
    } else {
        FolderLayout::SeparateFolders
    };

    let mut builder = SplitConfig::builder()
        .mode(cli.mode.into())
        .level(cli.level)
        .output_dir(&cli.output)
        .layout(layout)
        .include_metadata(cli.metadata)
        .page_separator(parse_separator(&cli.separator));

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run ──────────────────────────────────────────────────────────────
    let report = process(&cli.input, &config).context("Processing failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(json.as_bytes())
            .context("Failed to write to stdout")?;
        handle.write_all(b"\n").ok();
    } else if !cli.quiet && !show_progress {
        // Only print inline stats when the progress callback is disabled.
        let s = &report.stats;
        eprintln!(
            "Processed {}/{} files, {}/{} segments in {}ms",
            s.processed_files, s.total_files, s.converted_segments, s.total_segments,
            s.total_duration_ms
        );
        if s.failed_files > 0 {
            eprintln!("  {} files failed", s.failed_files);
        }
        if s.failed_segments > 0 {
            eprintln!("  {} segments failed", s.failed_segments);
        }
    } else if !cli.quiet {
        eprintln!(
            "   {} segments written  {}  {}ms total",
            dim(&report.stats.converted_segments.to_string()),
            bold(&cli.output.display().to_string()),
            report.stats.total_duration_ms,
        );
    }

    if !report.is_full_success() {
        std::process::exit(1);
    }
    Ok(())
}

/// Parse `--separator` string into `PageSeparator`.
fn parse_separator(s: &str) -> PageSeparator {
    match s.to_lowercase().as_str() {
        "none" => PageSeparator::None,
        "hr" | "---" => PageSeparator::HorizontalRule,
        "comment" => PageSeparator::Comment,
        custom => PageSeparator::Custom(custom.to_string()),
    }
}

/// Cap `msg` at `max_chars` characters, appending an ellipsis when cut.
///
/// Error messages embed arbitrary bookmark titles, so the cut must land on a
/// character boundary, never a byte offset.
fn truncate_message(msg: &str, max_chars: usize) -> String {
    if msg.chars().count() <= max_chars {
        return msg.to_string();
    }
    let mut truncated: String = msg.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('\u{2026}');
    truncated
}
