//! Converts transcript cells into ratatui lines.
//!
//! The transcript is re-rendered in full each frame: cell content is
//! small (chat turns, not streamed tool output), so wrapping every cell
//! at the current width is cheap and keeps scroll math trivial.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::state::TranscriptState;
use super::style::{Style as TranscriptStyle, StyledLine};

/// Renders every cell at `width`, with one blank line between cells.
pub fn transcript_lines(transcript: &TranscriptState, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (idx, cell) in transcript.cells().iter().enumerate() {
        if idx > 0 {
            lines.push(Line::default());
        }
        lines.extend(cell.display_lines(width).into_iter().map(convert_styled_line));
    }
    lines
}

/// Line count `transcript_lines` would produce, for scroll layout.
pub fn total_line_count(transcript: &TranscriptState, width: usize) -> usize {
    let cells = transcript.cells();
    let content: usize = cells.iter().map(|cell| cell.display_lines(width).len()).sum();
    content + cells.len().saturating_sub(1)
}

fn convert_styled_line(styled_line: StyledLine) -> Line<'static> {
    let spans: Vec<Span<'static>> = styled_line
        .spans
        .into_iter()
        .map(|s| Span::styled(s.text, convert_style(s.style)))
        .collect();
    Line::from(spans)
}

fn convert_style(style: TranscriptStyle) -> Style {
    match style {
        TranscriptStyle::Plain => Style::default(),
        TranscriptStyle::UserPrefix => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        TranscriptStyle::User => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::ITALIC),
        TranscriptStyle::Assistant => Style::default().fg(Color::White),
        TranscriptStyle::Source => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        TranscriptStyle::SystemPrefix => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        TranscriptStyle::System => Style::default().fg(Color::DarkGray),
        TranscriptStyle::ErrorPrefix => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
        TranscriptStyle::Error => Style::default().fg(Color::Red),
        TranscriptStyle::JsonTitle => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        TranscriptStyle::Json => Style::default().fg(Color::DarkGray),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::HistoryCell;

    #[test]
    fn test_blank_line_between_cells() {
        let mut transcript = TranscriptState::new();
        transcript.push_cell(HistoryCell::user("question"));
        transcript.push_cell(HistoryCell::assistant("answer"));

        let lines = transcript_lines(&transcript, 40);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].spans.is_empty());
    }

    #[test]
    fn test_total_line_count_matches_rendered() {
        let mut transcript = TranscriptState::new();
        transcript.push_cell(HistoryCell::user("a\nb"));
        transcript.push_cell(HistoryCell::system("c"));
        transcript.push_cell(HistoryCell::assistant("word ".repeat(30)));

        for width in [20, 40, 80] {
            assert_eq!(
                total_line_count(&transcript, width),
                transcript_lines(&transcript, width).len()
            );
        }
    }

    #[test]
    fn test_empty_transcript_renders_nothing() {
        let transcript = TranscriptState::new();
        assert!(transcript_lines(&transcript, 40).is_empty());
        assert_eq!(total_line_count(&transcript, 40), 0);
    }
}
