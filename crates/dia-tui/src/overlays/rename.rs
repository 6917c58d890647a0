//! Rename overlay for the active session.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::OverlayUpdate;
use crate::effects::UiEffect;
use crate::state::TuiState;

/// Name used when the rename input is submitted empty, matching what the
/// backend calls sessions it creates on its own.
const UNTITLED_NAME: &str = "Untitled Session";

/// State for the rename overlay.
#[derive(Debug, Clone)]
pub struct RenameState {
    /// The current input text for the new name.
    pub input: String,
    /// The session being renamed.
    pub session_id: String,
    /// Current name (shown as placeholder while the input is empty).
    pub current_name: String,
    /// Feedback message (rename already in flight).
    pub error: Option<String>,
}

impl RenameState {
    pub fn open(session_id: String, current_name: String) -> (Self, Vec<UiEffect>) {
        (
            Self {
                input: String::new(),
                session_id,
                current_name,
                error: None,
            },
            vec![],
        )
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, input_y: u16) {
        render_rename_overlay(frame, self, area, input_y);
    }

    pub fn handle_key(&mut self, tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Clear feedback on any input
        if !matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            self.error = None;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('c') if key.code == KeyCode::Esc || ctrl => {
                OverlayUpdate::close()
            }
            KeyCode::Enter => {
                if tui.tasks.session_rename.is_running() {
                    self.error = Some("Rename in progress...".to_string());
                    return OverlayUpdate::stay();
                }
                // Empty submissions fall back to the backend's own
                // placeholder name instead of erroring.
                let name = match self.input.trim() {
                    "" => UNTITLED_NAME.to_string(),
                    trimmed => trimmed.to_string(),
                };
                OverlayUpdate::close().with_ui_effects(vec![UiEffect::RenameSession {
                    session_id: self.session_id.clone(),
                    name,
                }])
            }
            KeyCode::Backspace => {
                self.input.pop();
                OverlayUpdate::stay()
            }
            KeyCode::Char(c) if !ctrl => {
                self.input.push(c);
                OverlayUpdate::stay()
            }
            _ => OverlayUpdate::stay(),
        }
    }
}

fn render_rename_overlay(frame: &mut Frame, state: &RenameState, area: Rect, input_top_y: u16) {
    use super::render_utils::OverlayChrome;

    let body = OverlayChrome::new("Rename Session", Color::Yellow)
        .hints(&[("Enter", "save"), ("Esc", "cancel")])
        .draw(frame, area, input_top_y);

    body.input_line(frame, 0, &state.input, Some(&state.current_name));
    body.separator(frame, 1);

    let (help_text, help_style) = match &state.error {
        Some(error) => (error.as_str(), Style::default().fg(Color::Red)),
        None => (
            "Type a new name for this session",
            Style::default().fg(Color::DarkGray),
        ),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(help_text, help_style))),
        body.row(2),
    );

    body.separator(frame, 3);
}

#[cfg(test)]
mod tests {
    use dia_core::config::Config;

    use super::*;
    use crate::overlays::OverlayTransition;

    fn tui() -> TuiState {
        TuiState::new(Config::default(), Config::DEFAULT_BASE_URL.to_string())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_enter_submits_trimmed_name() {
        let tui = tui();
        let (mut state, _) = RenameState::open("s1".to_string(), "Old".to_string());
        state.input = "  New Name  ".to_string();

        let update = state.handle_key(&tui, key(KeyCode::Enter));
        assert!(matches!(update.transition, OverlayTransition::Close));
        assert_eq!(
            update.effects,
            vec![UiEffect::RenameSession {
                session_id: "s1".to_string(),
                name: "New Name".to_string(),
            }]
        );
    }

    #[test]
    fn test_empty_submission_uses_untitled_name() {
        let tui = tui();
        let (mut state, _) = RenameState::open("s1".to_string(), "Old".to_string());

        let update = state.handle_key(&tui, key(KeyCode::Enter));
        assert_eq!(
            update.effects,
            vec![UiEffect::RenameSession {
                session_id: "s1".to_string(),
                name: UNTITLED_NAME.to_string(),
            }]
        );
    }

    #[test]
    fn test_enter_while_rename_running_stays_open() {
        let mut tui = tui();
        tui.tasks
            .session_rename
            .on_started(&crate::common::TaskStarted {
                id: crate::common::TaskId(1),
            });

        let (mut state, _) = RenameState::open("s1".to_string(), "Old".to_string());
        state.input = "New".to_string();

        let update = state.handle_key(&tui, key(KeyCode::Enter));
        assert!(matches!(update.transition, OverlayTransition::Stay));
        assert!(update.effects.is_empty());
        assert!(state.error.is_some());
    }

    #[test]
    fn test_escape_closes_without_effects() {
        let tui = tui();
        let (mut state, _) = RenameState::open("s1".to_string(), "Old".to_string());

        let update = state.handle_key(&tui, key(KeyCode::Esc));
        assert!(matches!(update.transition, OverlayTransition::Close));
        assert!(update.effects.is_empty());
    }
}
