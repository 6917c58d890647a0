//! Width-aware wrapping for transcript content.
//!
//! Wrapping happens at display time for the current width; cells store
//! unwrapped text.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use super::style::{Style, StyledLine, StyledSpan};
use crate::common::sanitize_for_display;

/// Greedy word wrap to `width` terminal columns. Words wider than the
/// target width fall back to grapheme wrapping.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for line in text.split('\n') {
        if line.width() <= width {
            rows.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        for word in line.split(' ') {
            let word_width = word.width();
            if current.is_empty() {
                if word_width <= width {
                    current.push_str(word);
                } else {
                    current = push_broken_word(&mut rows, word, width);
                }
            } else if current.width() + 1 + word_width <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                rows.push(std::mem::take(&mut current));
                if word_width <= width {
                    current.push_str(word);
                } else {
                    current = push_broken_word(&mut rows, word, width);
                }
            }
        }
        rows.push(current);
    }

    rows
}

/// Splits an over-wide word into full rows, returning the partial tail
/// for the caller to continue filling.
fn push_broken_word(rows: &mut Vec<String>, word: &str, width: usize) -> String {
    let mut chunks = wrap_chars(word, width);
    let tail = chunks.pop().unwrap_or_default();
    rows.extend(chunks);
    tail
}

/// Hard wrap on grapheme boundaries, for tokens with no break points
/// (URLs, session ids, JSON).
pub fn wrap_chars(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();

    for grapheme in text.graphemes(true) {
        if !current.is_empty() && current.width() + grapheme.width() > width {
            rows.push(std::mem::take(&mut current));
        }
        current.push_str(grapheme);
    }
    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}

/// Wraps multi-line content behind a styled prefix.
///
/// The first line carries `prefix`; continuation lines repeat it when
/// `repeat_prefix` is set (user cells draw a bar down the left edge) or
/// get a matching space indent otherwise.
pub fn render_prefixed_content(
    prefix: &str,
    content: &str,
    width: usize,
    prefix_style: Style,
    content_style: Style,
    repeat_prefix: bool,
) -> Vec<StyledLine> {
    let prefix_width = prefix.width();
    let content_width = width.saturating_sub(prefix_width).max(10);
    let mut lines = Vec::new();

    for raw_line in content.split('\n') {
        let safe_line = sanitize_for_display(raw_line);
        for row in wrap_text(&safe_line, content_width) {
            let lead = if lines.is_empty() || repeat_prefix {
                StyledSpan {
                    text: prefix.to_string(),
                    style: prefix_style,
                }
            } else {
                StyledSpan {
                    text: " ".repeat(prefix_width),
                    style: Style::Plain,
                }
            };
            lines.push(StyledLine {
                spans: vec![
                    lead,
                    StyledSpan {
                        text: row,
                        style: content_style,
                    },
                ],
            });
        }
    }

    lines
}
