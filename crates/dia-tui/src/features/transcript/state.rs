//! Transcript state: cells plus scroll position.

use super::cell::HistoryCell;
use crate::mutations::TranscriptMutation;

/// Scroll position within the rendered transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollMode {
    /// Stick to the newest content as it arrives.
    FollowLatest,
    /// Pinned at a fixed line offset from the top.
    Anchored { offset: usize },
}

/// Lines scrolled per mouse wheel event.
const WHEEL_SCROLL_LINES: usize = 3;

/// Scroll bookkeeping. `total_lines` and `viewport_height` are refreshed
/// from the layout each frame before any scroll math runs.
#[derive(Debug, Clone)]
pub struct ScrollState {
    pub mode: ScrollMode,
    total_lines: usize,
    pub viewport_height: usize,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            mode: ScrollMode::FollowLatest,
            total_lines: 0,
            viewport_height: 0,
        }
    }
}

impl ScrollState {
    pub fn update_layout(&mut self, total_lines: usize, viewport_height: usize) {
        self.total_lines = total_lines;
        self.viewport_height = viewport_height;
    }

    pub fn max_scroll(&self) -> usize {
        self.total_lines.saturating_sub(self.viewport_height)
    }

    /// The top line to draw this frame. Anchors are clamped so content
    /// removal (clear, session switch) cannot leave the view past the end.
    pub fn resolved_offset(&self) -> usize {
        match self.mode {
            ScrollMode::FollowLatest => self.max_scroll(),
            ScrollMode::Anchored { offset } => offset.min(self.max_scroll()),
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        let offset = self.resolved_offset().saturating_sub(lines);
        self.mode = ScrollMode::Anchored { offset };
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let offset = self.resolved_offset().saturating_add(lines);
        if offset >= self.max_scroll() {
            self.mode = ScrollMode::FollowLatest;
        } else {
            self.mode = ScrollMode::Anchored { offset };
        }
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.viewport_height.max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.viewport_height.max(1));
    }

    pub fn scroll_to_top(&mut self) {
        self.mode = ScrollMode::Anchored { offset: 0 };
    }

    pub fn scroll_to_bottom(&mut self) {
        self.mode = ScrollMode::FollowLatest;
    }
}

/// Coalesces mouse wheel events between frames. Terminals can deliver
/// dozens of wheel events per frame; applying them one by one makes
/// scrolling feel erratic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollAccumulator {
    delta: i32,
}

impl ScrollAccumulator {
    pub fn accumulate(&mut self, delta: i32) {
        self.delta += delta;
    }

    pub fn take(&mut self) -> i32 {
        std::mem::take(&mut self.delta)
    }
}

/// Transcript display state for the active session.
#[derive(Debug, Clone, Default)]
pub struct TranscriptState {
    cells: Vec<HistoryCell>,
    pub scroll: ScrollState,
    pub scroll_accumulator: ScrollAccumulator,
}

impl TranscriptState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[HistoryCell] {
        &self.cells
    }

    pub fn push_cell(&mut self, cell: HistoryCell) {
        self.cells.push(cell);
    }

    /// Drops all cells and resumes following the latest content. Used
    /// when switching sessions and after clearing chat history.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.scroll.scroll_to_bottom();
    }

    /// Applies one frame's worth of accumulated wheel movement.
    pub fn apply_scroll_delta(&mut self) {
        let delta = self.scroll_accumulator.take();
        if delta < 0 {
            self.scroll
                .scroll_up(delta.unsigned_abs() as usize * WHEEL_SCROLL_LINES);
        } else if delta > 0 {
            self.scroll
                .scroll_down(delta.unsigned_abs() as usize * WHEEL_SCROLL_LINES);
        }
    }

    pub fn apply(&mut self, mutation: TranscriptMutation) {
        match mutation {
            TranscriptMutation::AppendCell(cell) => self.push_cell(cell),
            TranscriptMutation::AppendSystemMessage(message) => {
                self.push_cell(HistoryCell::system(message));
            }
            TranscriptMutation::AppendErrorMessage(message) => {
                self.push_cell(HistoryCell::error(message));
            }
            TranscriptMutation::Clear => self.clear(),
            TranscriptMutation::PageUp => self.scroll.page_up(),
            TranscriptMutation::PageDown => self.scroll.page_down(),
            TranscriptMutation::ScrollToTop => self.scroll.scroll_to_top(),
            TranscriptMutation::ScrollToBottom => self.scroll.scroll_to_bottom(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrolled(total: usize, viewport: usize) -> ScrollState {
        let mut scroll = ScrollState::default();
        scroll.update_layout(total, viewport);
        scroll
    }

    #[test]
    fn test_follow_latest_resolves_to_bottom() {
        let scroll = scrolled(100, 20);
        assert_eq!(scroll.resolved_offset(), 80);
    }

    #[test]
    fn test_scroll_up_anchors() {
        let mut scroll = scrolled(100, 20);
        scroll.scroll_up(5);
        assert_eq!(scroll.mode, ScrollMode::Anchored { offset: 75 });
    }

    #[test]
    fn test_scroll_down_past_end_resumes_following() {
        let mut scroll = scrolled(100, 20);
        scroll.scroll_up(5);
        scroll.scroll_down(10);
        assert_eq!(scroll.mode, ScrollMode::FollowLatest);
    }

    #[test]
    fn test_anchor_clamped_after_shrink() {
        let mut scroll = scrolled(100, 20);
        scroll.mode = ScrollMode::Anchored { offset: 70 };
        scroll.update_layout(30, 20);
        assert_eq!(scroll.resolved_offset(), 10);
    }

    #[test]
    fn test_page_movement_uses_viewport() {
        let mut scroll = scrolled(100, 20);
        scroll.page_up();
        assert_eq!(scroll.mode, ScrollMode::Anchored { offset: 60 });
        scroll.page_down();
        assert_eq!(scroll.mode, ScrollMode::FollowLatest);
    }

    #[test]
    fn test_wheel_delta_coalesced_once_per_frame() {
        let mut transcript = TranscriptState::new();
        transcript.scroll.update_layout(100, 20);

        transcript.scroll_accumulator.accumulate(-1);
        transcript.scroll_accumulator.accumulate(-1);
        transcript.apply_scroll_delta();

        assert_eq!(
            transcript.scroll.mode,
            ScrollMode::Anchored {
                offset: 80 - 2 * WHEEL_SCROLL_LINES
            }
        );
        // Drained: a second apply is a no-op.
        transcript.apply_scroll_delta();
        assert_eq!(
            transcript.scroll.mode,
            ScrollMode::Anchored {
                offset: 80 - 2 * WHEEL_SCROLL_LINES
            }
        );
    }

    #[test]
    fn test_clear_resets_cells_and_follows() {
        let mut transcript = TranscriptState::new();
        transcript.push_cell(HistoryCell::system("hello"));
        transcript.scroll.scroll_to_top();

        transcript.clear();

        assert!(transcript.cells().is_empty());
        assert_eq!(transcript.scroll.mode, ScrollMode::FollowLatest);
    }
}
