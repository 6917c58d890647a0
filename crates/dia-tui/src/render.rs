//! Pure view functions for the TUI.
//!
//! Everything here reads `&AppState` and draws to a ratatui frame.
//! Scroll math runs in the reducer on Frame events; rendering only
//! resolves the already-clamped offset.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::common::Scrollbar;
use crate::features::input::{self, INPUT_HEIGHT};
use crate::features::transcript::transcript_lines;
use crate::overlays::OverlayExt;
use crate::state::{AppState, TuiState};

/// Height of the status line below the input.
const STATUS_HEIGHT: u16 = 1;

/// Transcript horizontal margin (padding on each side).
const TRANSCRIPT_MARGIN: u16 = 1;

/// Width reserved for the scrollbar on the right side.
const SCROLLBAR_WIDTH: u16 = 1;

/// Spinner frames for the status line animation.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Ticks per spinner frame. Ticks arrive at frame rate; dividing keeps
/// the spinner readable.
const SPINNER_SPEED_DIVISOR: usize = 8;

/// Text width and viewport height available to the transcript for a
/// terminal of the given size. The reducer uses the same numbers for
/// scroll layout, so view and state agree on what fits.
pub fn transcript_viewport(terminal_width: u16, terminal_height: u16) -> (usize, usize) {
    let text_width = terminal_width.saturating_sub(TRANSCRIPT_MARGIN * 2 + SCROLLBAR_WIDTH);
    let viewport_height = terminal_height.saturating_sub(INPUT_HEIGHT + STATUS_HEIGHT);
    (text_width as usize, viewport_height as usize)
}

/// Renders the whole TUI: transcript, input box, status line, and any
/// active overlay on top.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let state = &app.tui;

    let (text_width, viewport_height) = transcript_viewport(area.width, area.height);

    let all_lines = transcript_lines(&state.transcript, text_width);
    let total_lines = all_lines.len();

    // The scroll state was laid out on the previous Frame event; clamp
    // against this frame's numbers so a resize never slices past the end.
    let max_offset = total_lines.saturating_sub(viewport_height);
    let offset = state.transcript.scroll.resolved_offset().min(max_offset);

    let visible_end = (offset + viewport_height).min(total_lines);
    let content_lines: Vec<Line<'static>> = all_lines
        .into_iter()
        .skip(offset)
        .take(visible_end.saturating_sub(offset))
        .collect();

    // Bottom-align short transcripts: pad blank lines at the top.
    let visible_lines: Vec<Line<'static>> = if content_lines.len() < viewport_height {
        let padding = viewport_height - content_lines.len();
        let mut padded = vec![Line::default(); padding];
        padded.extend(content_lines);
        padded
    } else {
        content_lines
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);

    // Content is pre-wrapped by transcript_lines; no Paragraph wrap here.
    let transcript_area = Rect {
        x: chunks[0].x + TRANSCRIPT_MARGIN,
        y: chunks[0].y,
        width: chunks[0]
            .width
            .saturating_sub(TRANSCRIPT_MARGIN * 2 + SCROLLBAR_WIDTH),
        height: chunks[0].height,
    };
    frame.render_widget(Paragraph::new(visible_lines), transcript_area);
    frame.render_widget(Scrollbar::new(total_lines, viewport_height, offset), chunks[0]);

    input::render_input(state, frame, chunks[1]);
    render_status_line(state, frame, chunks[2]);

    // Overlay last, so it draws on top.
    app.overlay.render(frame, area, chunks[1].y);
}

/// Status line below the input: spinner plus the most relevant activity,
/// or key hints when idle.
fn render_status_line(state: &TuiState, frame: &mut Frame, area: Rect) {
    let spinner_idx = (state.spinner_frame / SPINNER_SPEED_DIVISOR) % SPINNER_FRAMES.len();
    let spinner = SPINNER_FRAMES[spinner_idx];

    let busy = |label: &str, color: Color| {
        vec![
            Span::styled(spinner.to_string(), Style::default().fg(color)),
            Span::raw(" "),
            Span::styled(label.to_string(), Style::default().fg(color)),
        ]
    };

    let spans: Vec<Span> = if state.session.active_is_waiting() {
        busy("Waiting for the analyzer...", Color::Yellow)
    } else if state.tasks.upload.is_running() {
        busy("Uploading documents...", Color::Cyan)
    } else if state.tasks.model_load.is_running() {
        busy("Loading model...", Color::Cyan)
    } else if state.tasks.is_mutating_sessions() {
        busy("Updating sessions...", Color::Green)
    } else if state.tasks.is_any_running() {
        busy("Working...", Color::Green)
    } else {
        vec![
            Span::styled("Ctrl+P", Style::default().fg(Color::DarkGray)),
            Span::raw(" commands  "),
            Span::styled("Ctrl+S", Style::default().fg(Color::DarkGray)),
            Span::raw(" sessions  "),
            Span::styled("Ctrl+C", Style::default().fg(Color::DarkGray)),
            Span::raw(" quit"),
        ]
    };

    let status = Paragraph::new(Line::from(spans)).alignment(Alignment::Left);
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_viewport_reserves_chrome() {
        let (width, height) = transcript_viewport(80, 24);
        assert_eq!(width, 80 - 3);
        assert_eq!(height, 24 - 4);
    }

    #[test]
    fn test_transcript_viewport_saturates_on_tiny_terminals() {
        let (width, height) = transcript_viewport(2, 3);
        assert_eq!(width, 0);
        assert_eq!(height, 0);
    }
}
