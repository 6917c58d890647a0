//! Input feature view.
//!
//! Renders the single-line input box with the active session and its
//! routing badge on the border.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::features::session::SessionType;
use crate::state::TuiState;

/// Height of the input area in lines, borders included.
pub const INPUT_HEIGHT: u16 = 3;

/// Prompt shown before the input text.
const PROMPT: &str = "> ";

/// Hint shown while the input line is empty.
const PLACEHOLDER: &str = "Ask about the domain or documents (/ for commands)";

/// Renders the input area with the session name on the top border and
/// the backend provider/model on the right.
pub fn render_input(state: &TuiState, frame: &mut ratatui::Frame, area: Rect) {
    let base_style = Style::default().fg(Color::DarkGray);

    let mut title_spans = vec![Span::styled(
        format!(
            " {}",
            state.session.active_name.as_deref().unwrap_or("no session")
        ),
        base_style,
    )];
    if state.session.active_id.is_some() {
        let badge_style = match state.session.session_type {
            SessionType::Domain => base_style.add_modifier(Modifier::DIM),
            SessionType::Document => Style::default().fg(Color::Cyan),
        };
        title_spans.push(Span::styled(
            format!(" [{}]", state.session.session_type.label()),
            badge_style,
        ));
    }
    title_spans.push(Span::styled(" ", base_style));

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(base_style)
        .title(Line::from(title_spans));
    if let Some(backend) = backend_label(state) {
        block = block.title_top(
            Line::from(Span::styled(backend, base_style.add_modifier(Modifier::DIM)))
                .alignment(Alignment::Right),
        );
    }

    let inner = block.inner(area);
    if inner.width <= PROMPT.len() as u16 || inner.height == 0 {
        frame.render_widget(block, area);
        return;
    }

    let available = inner.width as usize - PROMPT.len();
    let text = state.input.text();
    let cursor_cols = width_before_cursor(text, state.input.cursor());
    let (shown, cursor_rel) = visible_slice(text, cursor_cols, available);

    let line = if text.is_empty() {
        Line::from(vec![
            Span::styled(PROMPT, Style::default().fg(Color::Cyan)),
            Span::styled(
                truncated_placeholder(available),
                base_style.add_modifier(Modifier::DIM),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled(PROMPT, Style::default().fg(Color::Cyan)),
            Span::styled(shown, Style::default().fg(Color::White)),
        ])
    };

    frame.render_widget(Paragraph::new(line).block(block), area);

    let cursor_x = inner.x + PROMPT.len() as u16 + cursor_rel as u16;
    if cursor_x < inner.x + inner.width {
        frame.set_cursor_position((cursor_x, inner.y));
    }
}

fn backend_label(state: &TuiState) -> Option<String> {
    match (&state.llm_provider, &state.llm_model) {
        (Some(provider), Some(model)) => Some(format!(" {provider} · {model} ")),
        (Some(provider), None) => Some(format!(" {provider} ")),
        (None, Some(model)) => Some(format!(" {model} ")),
        (None, None) => None,
    }
}

fn truncated_placeholder(available: usize) -> String {
    crate::common::truncate_with_ellipsis(PLACEHOLDER, available)
}

/// Display width of the text left of the char-index cursor.
fn width_before_cursor(text: &str, cursor: usize) -> usize {
    text.chars()
        .take(cursor)
        .map(|c| UnicodeWidthChar::width(c).unwrap_or(0))
        .sum()
}

/// Horizontal window over `text` that keeps the cursor column visible.
///
/// Returns the visible slice and the cursor column relative to it. The
/// window slides so the cursor sits at the right edge when the text
/// outgrows the box; there is no stored scroll state.
fn visible_slice(text: &str, cursor_cols: usize, available: usize) -> (String, usize) {
    if available == 0 {
        return (String::new(), 0);
    }
    let target_offset = cursor_cols.saturating_sub(available - 1);

    let mut start_cols = 0usize;
    let mut shown = String::new();
    let mut shown_width = 0usize;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if start_cols < target_offset {
            // Still left of the window; a wide char straddling the edge
            // is skipped entirely.
            start_cols += w;
            continue;
        }
        if shown_width + w > available {
            break;
        }
        shown.push(ch);
        shown_width += w;
    }

    (shown, cursor_cols.saturating_sub(start_cols))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_slice_fits_without_scrolling() {
        let (shown, cursor) = visible_slice("hello", 5, 20);
        assert_eq!(shown, "hello");
        assert_eq!(cursor, 5);
    }

    #[test]
    fn test_visible_slice_keeps_cursor_at_right_edge() {
        // Text wider than the box with the cursor at the end: the tail
        // stays visible and the cursor lands one past it.
        let (shown, cursor) = visible_slice("abcdef", 6, 4);
        assert_eq!(shown, "def");
        assert_eq!(cursor, 3);
    }

    #[test]
    fn test_visible_slice_cursor_mid_text() {
        let (shown, cursor) = visible_slice("abcdef", 2, 4);
        assert_eq!(shown, "abcd");
        assert_eq!(cursor, 2);
    }

    #[test]
    fn test_visible_slice_counts_display_width() {
        // "你好" occupies 4 columns; cursor after both chars
        let (shown, cursor) = visible_slice("你好ab", 4, 10);
        assert_eq!(shown, "你好ab");
        assert_eq!(cursor, 4);
    }
}
