//! Delete confirmation overlay.
//!
//! Confirming computes the fallback selection from the list as it is
//! right now, before the delete request leaves, so the session that
//! becomes active afterwards does not depend on backend timing.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use super::OverlayUpdate;
use crate::common::truncate_with_ellipsis;
use crate::effects::UiEffect;
use crate::mutations::{SessionMutation, StateMutation};
use crate::state::TuiState;

#[derive(Debug, Clone)]
pub struct DeleteConfirmState {
    pub session_id: String,
    pub session_name: String,
}

impl DeleteConfirmState {
    pub fn open(session_id: String, session_name: String) -> (Self, Vec<UiEffect>) {
        (
            Self {
                session_id,
                session_name,
            },
            vec![],
        )
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, input_y: u16) {
        render_delete_confirm(frame, self, area, input_y);
    }

    pub fn handle_key(&mut self, tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc | KeyCode::Char('n') => OverlayUpdate::close(),
            KeyCode::Char('c') if ctrl => OverlayUpdate::close(),
            KeyCode::Enter | KeyCode::Char('y') => {
                if tui.tasks.is_mutating_sessions() {
                    return OverlayUpdate::stay();
                }

                let mut mutations = Vec::new();
                // Deleting the active session records where to land after
                // the next list reload; deleting any other session leaves
                // the active pointer alone.
                if tui.session.is_active(&self.session_id) {
                    let fallback = tui.session.delete_fallback(&self.session_id);
                    mutations.push(StateMutation::Session(SessionMutation::SetPendingSelect(
                        fallback,
                    )));
                }

                OverlayUpdate::close()
                    .with_ui_effects(vec![UiEffect::DeleteSession {
                        session_id: self.session_id.clone(),
                    }])
                    .with_mutations(mutations)
            }
            _ => OverlayUpdate::stay(),
        }
    }
}

fn render_delete_confirm(
    frame: &mut Frame,
    state: &DeleteConfirmState,
    area: Rect,
    input_top_y: u16,
) {
    use super::render_utils::OverlayChrome;

    let body = OverlayChrome::new("Delete Session", Color::Red)
        .size(52, 7)
        .hints(&[("y/Enter", "delete"), ("Esc", "cancel")])
        .draw(frame, area, input_top_y);

    let name = truncate_with_ellipsis(&state.session_name, body.area().width as usize - 10);
    body.centered_line(
        frame,
        0,
        Line::from(vec![
            Span::styled("Delete ", Style::default().fg(Color::White)),
            Span::styled(format!("\"{name}\""), Style::default().fg(Color::Red)),
            Span::styled("?", Style::default().fg(Color::White)),
        ]),
    );

    body.separator(frame, 1);

    body.centered_line(
        frame,
        2,
        Line::from(Span::styled(
            "Chat history and indexed documents are removed.",
            Style::default().fg(Color::DarkGray),
        )),
    );

    body.separator(frame, 3);
}

#[cfg(test)]
mod tests {
    use dia_core::api::SessionEntry;
    use dia_core::config::Config;

    use super::*;
    use crate::overlays::OverlayTransition;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn tui_with_sessions(entries: &[(&str, &str)], active: &str) -> TuiState {
        let mut tui = TuiState::new(Config::default(), Config::DEFAULT_BASE_URL.to_string());
        tui.session.sessions = entries
            .iter()
            .map(|(id, name)| SessionEntry {
                id: (*id).to_string(),
                name: (*name).to_string(),
            })
            .collect();
        let name = tui.session.name_of(active).unwrap_or("?").to_string();
        tui.session.activate(active, &name);
        tui
    }

    #[test]
    fn test_confirm_active_records_fallback_before_delete() {
        let tui = tui_with_sessions(&[("1", "A"), ("2", "B")], "1");
        let (mut state, _) = DeleteConfirmState::open("1".to_string(), "A".to_string());

        let update = state.handle_key(&tui, key(KeyCode::Enter));
        assert!(matches!(update.transition, OverlayTransition::Close));
        assert_eq!(
            update.effects,
            vec![UiEffect::DeleteSession {
                session_id: "1".to_string()
            }]
        );
        assert!(matches!(
            update.mutations.as_slice(),
            [StateMutation::Session(SessionMutation::SetPendingSelect(Some(id)))] if id == "2"
        ));
    }

    #[test]
    fn test_confirm_sole_session_records_no_fallback() {
        let tui = tui_with_sessions(&[("1", "A")], "1");
        let (mut state, _) = DeleteConfirmState::open("1".to_string(), "A".to_string());

        let update = state.handle_key(&tui, key(KeyCode::Char('y')));
        assert!(matches!(
            update.mutations.as_slice(),
            [StateMutation::Session(SessionMutation::SetPendingSelect(None))]
        ));
    }

    #[test]
    fn test_confirm_non_active_leaves_selection_alone() {
        let tui = tui_with_sessions(&[("1", "A"), ("2", "B")], "2");
        let (mut state, _) = DeleteConfirmState::open("1".to_string(), "A".to_string());

        let update = state.handle_key(&tui, key(KeyCode::Enter));
        assert!(update.mutations.is_empty());
        assert_eq!(
            update.effects,
            vec![UiEffect::DeleteSession {
                session_id: "1".to_string()
            }]
        );
    }

    #[test]
    fn test_confirm_blocked_while_session_mutation_runs() {
        let mut tui = tui_with_sessions(&[("1", "A")], "1");
        tui.tasks
            .session_delete
            .on_started(&crate::common::TaskStarted {
                id: crate::common::TaskId(1),
            });
        let (mut state, _) = DeleteConfirmState::open("1".to_string(), "A".to_string());

        let update = state.handle_key(&tui, key(KeyCode::Enter));
        assert!(matches!(update.transition, OverlayTransition::Stay));
        assert!(update.effects.is_empty());
    }

    #[test]
    fn test_escape_and_n_cancel() {
        let tui = tui_with_sessions(&[("1", "A")], "1");
        let (mut state, _) = DeleteConfirmState::open("1".to_string(), "A".to_string());

        for code in [KeyCode::Esc, KeyCode::Char('n')] {
            let update = state.handle_key(&tui, key(code));
            assert!(matches!(update.transition, OverlayTransition::Close));
            assert!(update.effects.is_empty());
        }
    }
}
