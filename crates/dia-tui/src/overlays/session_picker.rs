//! Session picker overlay (Ctrl+S or the `sessions` command).
//!
//! Lists the cached backend sessions with an incremental filter. Picking
//! one routes through `UiEffect::SelectSession` so the reducer's
//! activation rules (including stale-id healing) always apply.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dia_core::api::SessionEntry;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState};

use super::OverlayUpdate;
use crate::effects::UiEffect;
use crate::features::session::SessionState;
use crate::state::TuiState;

/// Maximum number of sessions shown at once; longer lists scroll.
pub const MAX_VISIBLE_SESSIONS: usize = 10;

#[derive(Debug)]
pub struct SessionPickerState {
    pub sessions: Vec<SessionEntry>,
    pub selected: usize,
    pub offset: usize,
    pub filter: String,
    /// Id of the session that was active when the picker opened, marked
    /// in the list.
    pub active_id: Option<String>,
}

impl SessionPickerState {
    pub fn open(session: &SessionState) -> (Self, Vec<UiEffect>) {
        let sessions = session.sessions.clone();
        let selected = session
            .active_id
            .as_deref()
            .and_then(|id| sessions.iter().position(|s| s.id == id))
            .unwrap_or(0);
        let mut state = Self {
            sessions,
            selected,
            offset: 0,
            filter: String::new(),
            active_id: session.active_id.clone(),
        };
        state.scroll_to_selection();
        (state, vec![])
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, input_y: u16) {
        render_session_picker(frame, self, area, input_y);
    }

    pub fn handle_key(&mut self, tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => OverlayUpdate::close(),
            KeyCode::Char('c') if ctrl => OverlayUpdate::close(),
            KeyCode::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                    if self.selected < self.offset {
                        self.offset = self.selected;
                    }
                }
                OverlayUpdate::stay()
            }
            KeyCode::Down => {
                let total = self.visible_sessions().len();
                if self.selected + 1 < total {
                    self.selected += 1;
                    let height = self.visible_height();
                    if self.selected >= self.offset + height {
                        self.offset = self.selected - height + 1;
                    }
                }
                OverlayUpdate::stay()
            }
            KeyCode::Enter => {
                if tui.tasks.is_mutating_sessions() {
                    return OverlayUpdate::stay();
                }
                match self.selected_session() {
                    Some(entry) => {
                        let session_id = entry.id.clone();
                        OverlayUpdate::close()
                            .with_ui_effects(vec![UiEffect::SelectSession { session_id }])
                    }
                    None => OverlayUpdate::close(),
                }
            }
            // Ctrl+U: clear the filter
            KeyCode::Char('u') if ctrl => {
                self.filter.clear();
                self.clamp_selection();
                OverlayUpdate::stay()
            }
            KeyCode::Backspace => {
                self.filter.pop();
                self.clamp_selection();
                OverlayUpdate::stay()
            }
            KeyCode::Char(c) if !ctrl => {
                self.filter.push(c);
                self.clamp_selection();
                OverlayUpdate::stay()
            }
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn visible_sessions(&self) -> Vec<&SessionEntry> {
        if self.filter.is_empty() {
            self.sessions.iter().collect()
        } else {
            let filter = self.filter.to_lowercase();
            self.sessions
                .iter()
                .filter(|s| {
                    s.name.to_lowercase().contains(&filter)
                        || s.id.to_lowercase().contains(&filter)
                })
                .collect()
        }
    }

    pub fn selected_session(&self) -> Option<&SessionEntry> {
        self.visible_sessions().get(self.selected).copied()
    }

    fn visible_height(&self) -> usize {
        self.visible_sessions().len().clamp(1, MAX_VISIBLE_SESSIONS)
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_sessions().len();
        if count == 0 {
            self.selected = 0;
            self.offset = 0;
        } else if self.selected >= count {
            self.selected = count - 1;
            self.scroll_to_selection();
        }
    }

    fn scroll_to_selection(&mut self) {
        let height = self.visible_height();
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected - height + 1;
        }
    }
}

fn render_session_picker(
    frame: &mut Frame,
    picker: &SessionPickerState,
    area: Rect,
    input_top_y: u16,
) {
    use super::render_utils::OverlayChrome;

    let visible = picker.visible_sessions();
    let list_height = visible.len().clamp(1, MAX_VISIBLE_SESSIONS) as u16;

    let picker_width = area.width.saturating_sub(4).clamp(30, 70);
    let picker_height = list_height + 6;

    let body = OverlayChrome::new("Sessions", Color::Cyan)
        .size(picker_width, picker_height)
        .hints(&[("↑↓", "navigate"), ("Enter", "switch"), ("Esc", "cancel")])
        .draw(frame, area, input_top_y);

    body.input_line(frame, 0, &picker.filter, Some("Filter by name or id..."));
    body.separator(frame, 1);

    let list_area = body.rows(2, body.area().height.saturating_sub(2));

    let items: Vec<ListItem> = if visible.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "  No matching sessions",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        visible
            .iter()
            .skip(picker.offset)
            .take(MAX_VISIBLE_SESSIONS)
            .map(|entry| {
                let is_active = picker.active_id.as_deref() == Some(entry.id.as_str());
                let marker = if is_active { "● " } else { "  " };
                let name_style = if is_active {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Cyan)),
                    Span::styled(entry.name.clone(), name_style),
                    Span::styled(
                        format!("  {}", entry.id),
                        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
                    ),
                ]))
            })
            .collect()
    };

    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::Cyan).fg(Color::Black))
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default();
    if !visible.is_empty() {
        list_state.select(Some(picker.selected.saturating_sub(picker.offset)));
    }
    frame.render_stateful_widget(list, list_area, &mut list_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str) -> SessionEntry {
        SessionEntry {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn session_state(entries: Vec<SessionEntry>, active: Option<&str>) -> SessionState {
        let mut state = SessionState::new();
        state.sessions = entries;
        if let Some(id) = active {
            let name = state.name_of(id).unwrap_or("?").to_string();
            state.activate(id, &name);
        }
        state
    }

    #[test]
    fn test_open_preselects_active_session() {
        let state = session_state(
            vec![entry("1", "A"), entry("2", "B"), entry("3", "C")],
            Some("2"),
        );
        let (picker, _) = SessionPickerState::open(&state);
        assert_eq!(picker.selected, 1);
        assert_eq!(picker.selected_session().unwrap().id, "2");
    }

    #[test]
    fn test_open_without_active_starts_at_top() {
        let state = session_state(vec![entry("1", "A")], None);
        let (picker, _) = SessionPickerState::open(&state);
        assert_eq!(picker.selected, 0);
    }

    #[test]
    fn test_filter_matches_name_and_id() {
        let state = session_state(
            vec![entry("abc-1", "Acme docs"), entry("xyz-2", "Staging")],
            None,
        );
        let (mut picker, _) = SessionPickerState::open(&state);

        picker.filter = "acme".to_string();
        assert_eq!(picker.visible_sessions().len(), 1);

        picker.filter = "xyz".to_string();
        picker.clamp_selection();
        assert_eq!(picker.visible_sessions()[0].id, "xyz-2");
        assert_eq!(picker.selected, 0);
    }

    #[test]
    fn test_clamp_selection_after_filter() {
        let state = session_state(
            vec![entry("1", "A"), entry("2", "B"), entry("3", "C")],
            Some("3"),
        );
        let (mut picker, _) = SessionPickerState::open(&state);
        assert_eq!(picker.selected, 2);

        picker.filter = "A".to_string();
        picker.clamp_selection();
        assert_eq!(picker.selected, 0);
    }

    #[test]
    fn test_offset_follows_selection_past_window() {
        let entries: Vec<SessionEntry> = (0..15)
            .map(|i| entry(&format!("id-{i}"), &format!("Session {i}")))
            .collect();
        let state = session_state(entries, Some("id-12"));
        let (picker, _) = SessionPickerState::open(&state);

        assert_eq!(picker.selected, 12);
        // Selection is inside the scrolled window
        assert!(picker.selected >= picker.offset);
        assert!(picker.selected < picker.offset + MAX_VISIBLE_SESSIONS);
    }
}
