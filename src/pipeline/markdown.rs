//! Page text to Markdown conversion.
//!
//! pdfium gives us positioned characters with font sizes; everything after
//! that is geometry and string formatting, kept pure so the heuristics are
//! unit-testable without a PDF:
//!
//! 1. Sort characters top-to-bottom, left-to-right (PDF y grows upwards).
//! 2. Group characters into lines by vertical proximity.
//! 3. Group lines into blocks: a vertical gap larger than the running line
//!    height starts a new paragraph, as does a font-size change.
//! 4. Classify blocks: text noticeably larger than the page's dominant body
//!    size becomes a heading (`#`/`##`/`###` by size ratio); everything else
//!    is a paragraph with its lines rejoined.
//!
//! This is a best-effort heuristic conversion, not a lossless transform —
//! multi-column layouts and tables will come out as plain reading-order
//! text.

use crate::config::PageSeparator;
use crate::error::SegmentError;
use crate::output::DocumentMetadata;
use crate::pipeline::postprocess;
use crate::pipeline::segment::Segment;
use pdfium_render::prelude::*;
use tracing::{debug, trace};

/// One character with its page position and font size, in PDF points.
/// `y` is the top of the character's bounding box; PDF y grows upwards.
#[derive(Debug, Clone, Copy)]
pub struct PositionedChar {
    pub ch: char,
    pub x: f32,
    pub y: f32,
    pub right: f32,
    pub font_size: f32,
}

/// Font-size ratio (vs. dominant body size) above which a block becomes a
/// heading of the given level. Checked in order; first match wins.
const HEADING_RATIOS: [(f32, usize); 3] = [(1.6, 1), (1.35, 2), (1.15, 3)];

/// Blocks longer than this are never headings, whatever their font size;
/// large-print documents would otherwise turn into wall-to-wall `#`.
const MAX_HEADING_CHARS: usize = 120;

/// Extract the positioned characters of one page.
pub fn extract_page_chars(page: &PdfPage<'_>) -> Result<Vec<PositionedChar>, PdfiumError> {
    let text = page.text()?;
    let mut chars = Vec::new();

    for char_info in text.chars().iter() {
        let Ok(bounds) = char_info.loose_bounds() else {
            continue;
        };
        let Some(s) = char_info.unicode_string() else {
            continue;
        };
        let Some(ch) = s.chars().next() else {
            continue;
        };
        if ch == '\n' || ch == '\r' {
            continue;
        }
        chars.push(PositionedChar {
            ch,
            x: bounds.left().value,
            y: bounds.top().value,
            right: bounds.right().value,
            font_size: char_info.scaled_font_size().value,
        });
    }

    trace!("Extracted {} characters", chars.len());
    Ok(chars)
}

/// Convert one page's characters to Markdown. Pure.
pub fn page_markdown(chars: &[PositionedChar]) -> String {
    let lines = group_lines(chars);
    if lines.is_empty() {
        return String::new();
    }

    let body_size = dominant_font_size(&lines);
    let blocks = group_blocks(&lines);

    let mut out = String::new();
    for block in &blocks {
        let text = block
            .lines
            .iter()
            .map(|l| l.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            continue;
        }

        match heading_level(block.font_size, body_size, text.len()) {
            Some(level) => {
                out.push_str(&"#".repeat(level));
                out.push(' ');
                out.push_str(&text);
            }
            None => out.push_str(&text),
        }
        out.push_str("\n\n");
    }

    out.trim_end().to_string()
}

/// Assemble the Markdown for one segment of an open document.
///
/// Extraction failures on any page fail the whole segment; partial segment
/// text would silently corrupt downstream chunking.
pub fn segment_markdown(
    document: &PdfDocument<'_>,
    segment: &Segment,
    source_name: &str,
    separator: &PageSeparator,
    metadata: Option<&DocumentMetadata>,
) -> Result<String, SegmentError> {
    let extraction_err = |detail: String| SegmentError::ExtractionFailed {
        title: segment.title.clone(),
        detail,
    };

    let mut pages = Vec::with_capacity(segment.page_count());
    for page_index in segment.start..segment.end {
        let page = document
            .pages()
            .get(page_index as PdfPageIndex)
            .map_err(|e| extraction_err(format!("page {}: {:?}", page_index + 1, e)))?;
        let chars = extract_page_chars(&page)
            .map_err(|e| extraction_err(format!("page {}: {:?}", page_index + 1, e)))?;
        pages.push((page_index + 1, page_markdown(&chars)));
    }

    let mut parts = vec![front_matter(&segment.title, source_name, metadata)];
    let mut first = true;
    for (page_num, md) in pages {
        if md.is_empty() {
            continue;
        }
        if !first {
            parts.push(separator.render(page_num));
        }
        parts.push(md);
        first = false;
    }

    debug!(
        "Converted segment '{}' ({} pages) to Markdown",
        segment.title,
        segment.page_count()
    );

    Ok(postprocess::clean_markdown(&parts.concat()))
}

/// YAML front matter identifying the segment and its source document.
///
/// `title` and `source` are always present (downstream LLM pipelines key on
/// them); the remaining fields appear only when metadata was requested.
pub fn front_matter(
    title: &str,
    source_name: &str,
    metadata: Option<&DocumentMetadata>,
) -> String {
    let mut yaml = String::from("---\n");
    yaml.push_str(&format!("title: {}\n", title));
    yaml.push_str(&format!("source: {}\n", source_name));

    if let Some(meta) = metadata {
        if let Some(ref a) = meta.author {
            yaml.push_str(&format!("author: \"{}\"\n", a));
        }
        if let Some(ref s) = meta.subject {
            yaml.push_str(&format!("subject: \"{}\"\n", s));
        }
        if let Some(ref p) = meta.producer {
            yaml.push_str(&format!("producer: \"{}\"\n", p));
        }
        if let Some(ref d) = meta.creation_date {
            yaml.push_str(&format!("created: \"{}\"\n", d));
        }
        yaml.push_str(&format!("pages: {}\n", meta.page_count));
    }

    yaml.push_str("---\n\n");
    yaml
}

// ── Geometry helpers ─────────────────────────────────────────────────────

#[derive(Debug)]
struct Line {
    y: f32,
    font_size: f32,
    text: String,
}

#[derive(Debug)]
struct Block {
    font_size: f32,
    lines: Vec<Line>,
}

/// Group characters into lines by vertical proximity, then assemble each
/// line left-to-right, inserting a space where the horizontal gap between
/// neighbouring characters is wide enough to mean word separation.
fn group_lines(chars: &[PositionedChar]) -> Vec<Line> {
    let mut sorted: Vec<PositionedChar> = chars.to_vec();
    // Descending y: PDF y grows from the bottom of the page.
    sorted.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut rows: Vec<Vec<PositionedChar>> = Vec::new();
    for c in sorted {
        match rows.last_mut() {
            Some(row) => {
                let row_y = row[0].y;
                let tolerance = (row[0].font_size.max(c.font_size) * 0.5).max(2.0);
                if (row_y - c.y).abs() <= tolerance {
                    row.push(c);
                } else {
                    rows.push(vec![c]);
                }
            }
            None => rows.push(vec![c]),
        }
    }

    rows.into_iter()
        .map(|mut row| {
            row.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

            let y = row[0].y;
            let font_size = row
                .iter()
                .map(|c| c.font_size)
                .fold(0.0_f32, f32::max);

            let mut text = String::with_capacity(row.len() + 8);
            let mut prev_right: Option<f32> = None;
            for c in &row {
                if let Some(right) = prev_right {
                    let gap = c.x - right;
                    let word_gap = (c.font_size * 0.3).max(1.5);
                    if gap > word_gap && !text.ends_with(' ') && c.ch != ' ' {
                        text.push(' ');
                    }
                }
                text.push(c.ch);
                prev_right = Some(c.right);
            }

            Line { y, font_size, text }
        })
        .filter(|l| !l.text.trim().is_empty())
        .collect()
}

/// The page's body font size: the size class covering the most characters,
/// with sizes bucketed to half-point granularity.
fn dominant_font_size(lines: &[Line]) -> f32 {
    let mut weights: Vec<(f32, usize)> = Vec::new();
    for line in lines {
        let bucket = (line.font_size * 2.0).round() / 2.0;
        let weight = line.text.chars().filter(|c| !c.is_whitespace()).count();
        match weights
            .iter_mut()
            .find(|(size, _)| (*size - bucket).abs() < f32::EPSILON)
        {
            Some((_, w)) => *w += weight,
            None => weights.push((bucket, weight)),
        }
    }
    weights
        .into_iter()
        .max_by_key(|&(_, w)| w)
        .map(|(size, _)| size)
        .unwrap_or(12.0)
        .max(1.0)
}

/// Group lines into paragraph blocks: a new block starts on a wide vertical
/// gap or a font-size change.
fn group_blocks(lines: &[Line]) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();

    for line in lines {
        let start_new = match blocks.last() {
            None => true,
            Some(block) => {
                let prev = block.lines.last().expect("blocks are never empty");
                let gap = prev.y - line.y;
                let size_changed = (prev.font_size - line.font_size).abs() > 1.0;
                gap > prev.font_size * 1.8 || size_changed
            }
        };

        if start_new {
            blocks.push(Block {
                font_size: line.font_size,
                lines: Vec::new(),
            });
        }

        let block = blocks.last_mut().expect("just pushed");
        block.font_size = block.font_size.max(line.font_size);
        block.lines.push(Line {
            y: line.y,
            font_size: line.font_size,
            text: line.text.clone(),
        });
    }

    blocks
}

fn heading_level(block_size: f32, body_size: f32, text_len: usize) -> Option<usize> {
    if text_len > MAX_HEADING_CHARS {
        return None;
    }
    let ratio = block_size / body_size;
    HEADING_RATIOS
        .iter()
        .find(|&&(min_ratio, _)| ratio >= min_ratio)
        .map(|&(_, level)| level)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lay out a string of characters on one line at the given position.
    fn lay_out(text: &str, x: f32, y: f32, font_size: f32) -> Vec<PositionedChar> {
        let advance = font_size * 0.5;
        text.chars()
            .enumerate()
            .map(|(i, ch)| PositionedChar {
                ch,
                x: x + i as f32 * advance,
                y,
                right: x + (i as f32 + 0.92) * advance,
                font_size,
            })
            .collect()
    }

    #[test]
    fn empty_page_yields_empty_markdown() {
        assert_eq!(page_markdown(&[]), "");
    }

    #[test]
    fn single_paragraph_reads_left_to_right() {
        let chars = lay_out("hello world", 50.0, 700.0, 11.0);
        assert_eq!(page_markdown(&chars), "hello world");
    }

    #[test]
    fn large_text_becomes_a_heading() {
        let mut chars = lay_out("Introduction", 50.0, 720.0, 24.0);
        // Enough body text below to establish 11pt as the dominant size.
        chars.extend(lay_out("This chapter covers the basics of the", 50.0, 690.0, 11.0));
        chars.extend(lay_out("subject in a fair amount of detail.", 50.0, 676.0, 11.0));

        let md = page_markdown(&chars);
        assert!(md.starts_with("# Introduction"), "got: {md}");
        assert!(md.contains("This chapter covers"));
    }

    #[test]
    fn moderately_large_text_maps_to_deeper_headings() {
        let mut chars = lay_out("Subsection", 50.0, 720.0, 16.0);
        chars.extend(lay_out("body text body text body text body text", 50.0, 690.0, 11.0));
        chars.extend(lay_out("more body text more body text more body", 50.0, 676.0, 11.0));

        let md = page_markdown(&chars);
        // 16/11 ≈ 1.45 → level 2.
        assert!(md.starts_with("## Subsection"), "got: {md}");
    }

    #[test]
    fn long_large_print_text_is_not_a_heading() {
        let long = "x".repeat(200);
        let chars = lay_out(&long, 50.0, 700.0, 20.0);
        let md = page_markdown(&chars);
        assert!(!md.starts_with('#'), "got: {md}");
    }

    #[test]
    fn vertical_gap_starts_a_new_paragraph() {
        let mut chars = lay_out("first paragraph text here ok", 50.0, 700.0, 10.0);
        chars.extend(lay_out("second paragraph far below it", 50.0, 600.0, 10.0));

        let md = page_markdown(&chars);
        assert!(
            md.contains("ok\n\nsecond"),
            "expected paragraph break, got: {md}"
        );
    }

    #[test]
    fn adjacent_lines_join_into_one_paragraph() {
        let mut chars = lay_out("wrapped line one continues on", 50.0, 700.0, 10.0);
        chars.extend(lay_out("the following line of text", 50.0, 688.0, 10.0));

        let md = page_markdown(&chars);
        assert_eq!(md, "wrapped line one continues on the following line of text");
    }

    #[test]
    fn wide_horizontal_gap_becomes_a_space() {
        let mut chars = lay_out("left", 50.0, 700.0, 10.0);
        chars.extend(lay_out("right", 120.0, 700.0, 10.0));
        let md = page_markdown(&chars);
        assert_eq!(md, "left right");
    }

    #[test]
    fn out_of_order_input_is_sorted_by_position() {
        let mut chars = lay_out("below", 50.0, 650.0, 10.0);
        chars.extend(lay_out("above", 50.0, 700.0, 10.0));
        let md = page_markdown(&chars);
        let above = md.find("above").unwrap();
        let below = md.find("below").unwrap();
        assert!(above < below, "got: {md}");
    }

    #[test]
    fn front_matter_minimal() {
        let fm = front_matter("Chapter 1", "book.pdf", None);
        assert!(fm.starts_with("---\n"));
        assert!(fm.contains("title: Chapter 1\n"));
        assert!(fm.contains("source: book.pdf\n"));
        assert!(fm.ends_with("---\n\n"));
    }

    #[test]
    fn front_matter_extended() {
        let meta = DocumentMetadata {
            title: Some("The Book".into()),
            author: Some("A. Writer".into()),
            subject: None,
            creator: None,
            producer: Some("TeX".into()),
            creation_date: None,
            modification_date: None,
            page_count: 42,
            outline: vec![],
        };
        let fm = front_matter("Chapter 1", "book.pdf", Some(&meta));
        assert!(fm.contains("author: \"A. Writer\""));
        assert!(fm.contains("producer: \"TeX\""));
        assert!(fm.contains("pages: 42"));
    }
}
