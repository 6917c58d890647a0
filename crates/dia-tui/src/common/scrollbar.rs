//! Transcript scrollbar with a stable thumb.
//!
//! ratatui's Scrollbar rounds the thumb start and end independently, so
//! the thumb visibly grows and shrinks while scrolling. This widget
//! computes one fixed thumb length and slides it along the track,
//! landing flush at the bottom when fully scrolled.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

const THUMB_SYMBOL: &str = "█";
const TRACK_SYMBOL: &str = "│";

#[derive(Debug, Clone)]
pub struct Scrollbar {
    total_lines: usize,
    viewport_height: usize,
    scroll_offset: usize,
}

impl Scrollbar {
    pub fn new(total_lines: usize, viewport_height: usize, scroll_offset: usize) -> Self {
        Self {
            total_lines,
            viewport_height,
            scroll_offset,
        }
    }

    fn should_display(&self) -> bool {
        self.total_lines > self.viewport_height
    }

    /// Returns `(thumb_start, thumb_len)` rows within a track of
    /// `track_len` rows, or None when there is nothing to scroll.
    fn thumb_geometry(&self, track_len: usize) -> Option<(usize, usize)> {
        let max_scroll = self.total_lines.saturating_sub(self.viewport_height);
        if track_len == 0 || max_scroll == 0 {
            return None;
        }
        let viewport_len = self.viewport_height.min(track_len);

        // Matches ratatui's thumb size at the top position:
        // round(track_len * viewport_len / (total_lines - 1 + viewport_len))
        let denom = self
            .total_lines
            .saturating_sub(1)
            .saturating_add(viewport_len);
        let thumb_len = if denom > 0 {
            let numerator = track_len as u64 * viewport_len as u64;
            let rounded = (numerator + (denom as u64 / 2)) / denom as u64;
            (rounded as usize).clamp(1, track_len)
        } else {
            track_len
        };

        // Slide over the remaining rows so max scroll puts the thumb at
        // the bottom exactly.
        let available = track_len.saturating_sub(thumb_len);
        let thumb_start =
            ((self.scroll_offset as u64 * available as u64) / max_scroll as u64) as usize;
        Some((thumb_start, thumb_len))
    }
}

impl Widget for Scrollbar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.should_display() {
            return;
        }
        let Some((thumb_start, thumb_len)) = self.thumb_geometry(area.height as usize) else {
            return;
        };

        let x = area.x + area.width.saturating_sub(1);
        for (idx, y) in (area.y..area.y + area.height).enumerate() {
            let (symbol, style) = if idx >= thumb_start && idx < thumb_start + thumb_len {
                (THUMB_SYMBOL, Style::default())
            } else {
                (TRACK_SYMBOL, Style::default().fg(Color::DarkGray))
            };
            buf.set_string(x, y, symbol, style);
        }
    }
}
