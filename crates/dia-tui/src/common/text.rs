//! Text utilities for TUI rendering.

use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncates a string with ellipsis if it exceeds `max_width` terminal
/// columns. Unicode-aware: CJK and emoji count as their display width.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return "…".to_string();
    }
    let mut truncated = String::new();
    for ch in text.chars() {
        let next_width = truncated.width() + ch.width().unwrap_or(0);
        if next_width + 1 > max_width {
            break;
        }
        truncated.push(ch);
    }
    truncated.push('…');
    truncated
}

/// Truncates from the front, keeping the tail visible. Used for file
/// paths where the basename matters more than the directory.
pub fn truncate_start_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return "…".to_string();
    }
    let mut tail = String::new();
    for ch in text.chars().rev() {
        let next_width = tail.width() + ch.width().unwrap_or(0);
        if next_width + 1 > max_width {
            break;
        }
        tail.insert(0, ch);
    }
    format!("…{tail}")
}

/// Sanitizes a line for display by stripping ANSI escapes and expanding
/// tabs to four spaces. Backend responses are free-form text and may
/// contain either; `unicode_width` treats control characters as
/// zero-width, which breaks column math if they reach the renderer.
pub fn sanitize_for_display(s: &str) -> Cow<'_, str> {
    if s.contains('\x1b') || s.contains('\t') {
        Cow::Owned(s.replace('\x1b', "").replace('\t', "    "))
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis_fits() {
        assert_eq!(truncate_with_ellipsis("session", 10), "session");
        assert_eq!(truncate_with_ellipsis("session", 7), "session");
    }

    #[test]
    fn test_truncate_with_ellipsis_long() {
        assert_eq!(truncate_with_ellipsis("document analysis", 9), "document…");
    }

    #[test]
    fn test_truncate_with_ellipsis_tiny_width() {
        assert_eq!(truncate_with_ellipsis("anything", 1), "…");
        assert_eq!(truncate_with_ellipsis("anything", 0), "…");
    }

    #[test]
    fn test_truncate_with_ellipsis_wide_chars() {
        // Each CJK character is two columns wide.
        assert_eq!(truncate_with_ellipsis("中文abc", 7), "中文abc");
        assert_eq!(truncate_with_ellipsis("中文abc", 5), "中文…");
    }

    #[test]
    fn test_truncate_start_keeps_tail() {
        assert_eq!(
            truncate_start_with_ellipsis("/home/user/docs/report.pdf", 15),
            "…cs/report.pdf"
        );
        assert_eq!(truncate_start_with_ellipsis("short.txt", 15), "short.txt");
    }

    #[test]
    fn test_sanitize_for_display_passthrough() {
        let clean = sanitize_for_display("plain response");
        assert!(matches!(clean, Cow::Borrowed(_)));
    }

    #[test]
    fn test_sanitize_for_display_strips_ansi_and_tabs() {
        let result = sanitize_for_display("\x1b[1mchunk\x1b[0m\tcount");
        assert_eq!(result, "[1mchunk[0m    count");
    }
}
