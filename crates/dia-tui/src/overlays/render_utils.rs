//! Popup chrome shared by the overlays.
//!
//! Every overlay draws the same shell: a cleared, bordered box floated
//! over the transcript with a key-hint footer in the accent color.
//! [`OverlayChrome`] builds that shell; drawing it hands back an
//! [`OverlayBody`] that addresses the interior one row at a time, which
//! is how all of the overlays lay themselves out.

use ratatui::Frame;
use ratatui::layout::{Alignment, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::common::truncate_start_with_ellipsis;

/// Popups always leave transcript visible on each side and a row above
/// the input bar, no matter what size the overlay asks for.
const HORIZONTAL_INSET: u16 = 4;
const VERTICAL_INSET: u16 = 2;

/// Builder for the shared overlay shell.
pub struct OverlayChrome<'a> {
    title: &'a str,
    accent: Color,
    width: u16,
    height: u16,
    hints: &'a [(&'a str, &'a str)],
}

impl<'a> OverlayChrome<'a> {
    pub fn new(title: &'a str, accent: Color) -> Self {
        Self {
            title,
            accent,
            width: 50,
            height: 7,
            hints: &[],
        }
    }

    pub fn size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Key hints for the footer, as `(keys, action)` pairs.
    pub fn hints(mut self, hints: &'a [(&'a str, &'a str)]) -> Self {
        self.hints = hints;
        self
    }

    /// Clears the popup region and draws the border, title, and hint
    /// footer. Returns the body for the caller to fill.
    pub fn draw(self, frame: &mut Frame, screen: Rect, input_top_y: u16) -> OverlayBody {
        let popup = place_popup(screen, input_top_y, self.width, self.height);

        frame.render_widget(Clear, popup);
        let shell = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.accent))
            .title(format!(" {} ", self.title))
            .title_style(
                Style::default()
                    .fg(self.accent)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(shell, popup);

        let mut body = popup.inner(Margin::new(1, 1));
        if !self.hints.is_empty() && body.height > 0 {
            let footer = Rect::new(body.x, body.y + body.height - 1, body.width, 1);
            draw_hints(frame, footer, self.hints, self.accent);
            body.height -= 1;
        }

        OverlayBody {
            area: body,
            accent: self.accent,
        }
    }
}

/// Interior of a drawn overlay. Rows index from the top of the body;
/// anything past the bottom clips to a zero-height rect, so callers can
/// lay out optimistically on small terminals.
pub struct OverlayBody {
    area: Rect,
    accent: Color,
}

impl OverlayBody {
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Single-row rect at `row`.
    pub fn row(&self, row: u16) -> Rect {
        self.rows(row, 1)
    }

    /// Rect covering `count` rows starting at `row`.
    pub fn rows(&self, row: u16, count: u16) -> Rect {
        let available = self.area.height.saturating_sub(row);
        Rect::new(
            self.area.x,
            self.area.y + row.min(self.area.height),
            self.area.width,
            count.min(available),
        )
    }

    /// Dim horizontal rule across the body.
    pub fn separator(&self, frame: &mut Frame, row: u16) {
        let target = self.row(row);
        let rule = "─".repeat(target.width as usize);
        frame.render_widget(Paragraph::new(Line::from(Span::styled(rule, dim()))), target);
    }

    /// Centered single line of text.
    pub fn centered_line(&self, frame: &mut Frame, row: u16, line: Line<'_>) {
        frame.render_widget(
            Paragraph::new(line).alignment(Alignment::Center),
            self.row(row),
        );
    }

    /// One-line text input: dim `> ` prompt, accent-colored text, block
    /// cursor. While the value is empty the placeholder shows dimmed
    /// behind the cursor. Overflow truncates from the front so the end
    /// of the value stays visible while typing.
    pub fn input_line(&self, frame: &mut Frame, row: u16, value: &str, placeholder: Option<&str>) {
        const PROMPT: &str = "> ";
        let target = self.row(row);
        let budget = target.width.saturating_sub(PROMPT.len() as u16 + 1) as usize;
        let accent = Style::default().fg(self.accent);

        let mut spans = vec![Span::styled(PROMPT, dim())];
        match placeholder {
            Some(hint) if value.is_empty() => {
                spans.push(Span::styled("█", accent));
                let shown = truncate_start_with_ellipsis(hint, budget);
                if !shown.is_empty() {
                    spans.push(Span::styled(shown, dim()));
                }
            }
            _ => {
                spans.push(Span::styled(
                    truncate_start_with_ellipsis(value, budget),
                    accent,
                ));
                spans.push(Span::styled("█", accent));
            }
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), target);
    }
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn draw_hints(frame: &mut Frame, area: Rect, hints: &[(&str, &str)], accent: Color) {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (keys, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", dim()));
        }
        spans.push(Span::styled(*keys, Style::default().fg(accent)));
        spans.push(Span::styled(format!(" {action}"), dim()));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

/// Centers the popup horizontally on the screen and vertically in the
/// space above the input bar.
fn place_popup(screen: Rect, input_top_y: u16, width: u16, height: u16) -> Rect {
    let width = width.min(screen.width.saturating_sub(HORIZONTAL_INSET));
    let height = height.min(input_top_y.saturating_sub(VERTICAL_INSET));
    Rect::new(
        screen.width.saturating_sub(width) / 2,
        input_top_y.saturating_sub(height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_popup_centers_in_available_space() {
        let screen = Rect::new(0, 0, 100, 40);
        let popup = place_popup(screen, 36, 50, 10);
        assert_eq!(popup, Rect::new(25, 13, 50, 10));
    }

    #[test]
    fn test_place_popup_clamps_to_insets() {
        let screen = Rect::new(0, 0, 30, 12);
        let popup = place_popup(screen, 9, 60, 20);
        assert_eq!(popup.width, 26);
        assert_eq!(popup.height, 7);
        // Still fully on screen
        assert!(popup.x + popup.width <= screen.width);
        assert!(popup.y + popup.height <= 9);
    }

    #[test]
    fn test_body_rows_clip_at_bottom() {
        let body = OverlayBody {
            area: Rect::new(5, 3, 40, 4),
            accent: Color::Cyan,
        };

        assert_eq!(body.row(0), Rect::new(5, 3, 40, 1));
        assert_eq!(body.rows(1, 2), Rect::new(5, 4, 40, 2));
        // Requests past the body collapse instead of spilling out
        assert_eq!(body.rows(2, 5).height, 2);
        assert_eq!(body.row(4).height, 0);
        assert_eq!(body.row(9).y, 7);
    }
}
