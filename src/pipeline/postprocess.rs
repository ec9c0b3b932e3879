//! Post-processing: deterministic cleanup of extracted Markdown.
//!
//! ## Why is post-processing necessary?
//!
//! Text pulled out of PDF content streams carries print-layout artefacts
//! that are *visually correct* on paper but *structurally wrong* in text —
//! for example:
//!
//! - Soft hyphens left over from justified line breaking
//! - Typographic quotes and dashes that trip up downstream tokenisers
//! - Zero-width joiners and BOMs embedded by authoring tools
//! - Runs of blank lines where the page had vertical whitespace
//!
//! This module applies cheap, deterministic string rules that fix those
//! artefacts without touching content. Keeping them here rather than in the
//! extraction geometry means the extractor stays focused on *layout*, not on
//! *character-level edge cases*. Each rule is independently testable.
//!
//! ## Rule Order
//!
//! Rules must run in this specific order: normalise line endings before
//! trimming, and collapse blank lines before heading-spacing so heading
//! detection works on clean input.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all post-processing rules to raw extracted Markdown.
///
/// Runs the cleanup passes in a defined order. Each pass is a pure function
/// (`&str → String`) with no shared state, making the pipeline easy to
/// extend or re-order without side effects.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF → LF)
/// 2. Normalise typographic characters (smart quotes, soft hyphens)
/// 3. Strip invisible Unicode (zero-width spaces, BOM, joiners)
/// 4. Trim trailing whitespace per line
/// 5. Collapse 3+ consecutive blank lines down to 2
/// 6. Ensure heading lines have a blank line before them
/// 7. Ensure the file ends with exactly one newline
pub fn clean_markdown(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = normalise_typography(&s);
    let s = remove_invisible_chars(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    let s = normalise_heading_spacing(&s);
    ensure_final_newline(&s)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Normalise typographic characters ─────────────────────────────────
//
// Print typography maps to plain equivalents so the output tokenises and
// diffs cleanly. Soft hyphens are deleted outright: they mark optional
// line-break points, not real hyphens.

fn normalise_typography(input: &str) -> String {
    input
        .replace('\u{00AD}', "") // soft hyphen
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace('\u{2011}', "-") // non-breaking hyphen
        .replace('\u{00A0}', " ") // non-breaking space
}

// ── Rule 3: Strip invisible Unicode ──────────────────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 4: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 5: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").to_string()
}

// ── Rule 6: Normalise heading spacing ────────────────────────────────────────

fn normalise_heading_spacing(input: &str) -> String {
    // Ensure a blank line before each heading (unless at the very start)
    let mut result = String::with_capacity(input.len() + 64);
    for (i, line) in input.lines().enumerate() {
        let is_heading = line.starts_with('#') && line.contains(' ');
        if is_heading && i > 0 {
            let trimmed = result.trim_end_matches('\n');
            result.truncate(trimmed.len());
            result.push_str("\n\n");
        }
        result.push_str(line);
        result.push('\n');
    }
    result
}

// ── Rule 7: Ensure file ends with single newline ─────────────────────────────

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::from("\n")
    } else {
        format!("{}\n", trimmed)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_line_endings() {
        assert_eq!(normalise_line_endings("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_soft_hyphens_are_deleted() {
        assert_eq!(normalise_typography("hy\u{00AD}phen"), "hyphen");
    }

    #[test]
    fn test_smart_quotes_become_ascii() {
        assert_eq!(
            normalise_typography("\u{201C}hi\u{201D} \u{2018}there\u{2019}"),
            "\"hi\" 'there'"
        );
    }

    #[test]
    fn test_nbsp_becomes_space() {
        assert_eq!(normalise_typography("a\u{00A0}b"), "a b");
    }

    #[test]
    fn test_remove_invisible() {
        let input = "hello\u{200B}world\u{FEFF}foo\u{200D}bar";
        assert_eq!(remove_invisible_chars(input), "helloworldfoobar");
    }

    #[test]
    fn test_trim_trailing_whitespace() {
        assert_eq!(
            trim_trailing_whitespace("  hello   \nworld  "),
            "  hello\nworld"
        );
    }

    #[test]
    fn test_collapse_blank_lines() {
        let input = "a\n\n\n\n\n\nb";
        assert_eq!(collapse_blank_lines(input), "a\n\n\nb");
    }

    #[test]
    fn test_heading_spacing() {
        let input = "some text\n# Heading\nmore text";
        let result = normalise_heading_spacing(input);
        assert!(result.contains("\n\n# Heading\n"));
    }

    #[test]
    fn test_ensure_final_newline() {
        assert_eq!(ensure_final_newline("hello"), "hello\n");
        assert_eq!(ensure_final_newline("hello\n\n\n"), "hello\n");
        assert_eq!(ensure_final_newline(""), "\n");
    }

    #[test]
    fn test_clean_markdown_full_pipeline() {
        let input = "# Title\r\n\r\nSome\u{00AD} text   \n\n\n\n\n\n## Section\nbody \u{201C}quoted\u{201D}";
        let result = clean_markdown(input);
        assert!(result.starts_with("# Title"));
        assert!(result.ends_with('\n'));
        assert!(result.contains("Some text"));
        assert!(result.contains("\"quoted\""));
        assert!(result.contains("\n\n## Section"));
        assert!(!result.contains("\n\n\n\n"));
    }
}
