//! Command palette overlay (`/` on an empty input line or Ctrl+P).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState};

use super::prompt::PromptKind;
use super::{OverlayRequest, OverlayUpdate};
use crate::common::commands::{COMMANDS, Command};
use crate::effects::UiEffect;
use crate::mutations::{SessionMutation, StateMutation, TranscriptMutation};
use crate::state::TuiState;

#[derive(Debug, Clone, Default)]
pub struct CommandPaletteState {
    pub filter: String,
    pub selected: usize,
}

impl CommandPaletteState {
    pub fn open() -> (Self, Vec<UiEffect>) {
        (Self::default(), vec![])
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, input_y: u16) {
        render_command_palette(frame, self, area, input_y);
    }

    pub fn handle_key(&mut self, tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => OverlayUpdate::close(),
            KeyCode::Char('c') if ctrl => OverlayUpdate::close(),
            KeyCode::Up => {
                let count = self.filtered_commands().len();
                if count > 0 && self.selected > 0 {
                    self.selected -= 1;
                }
                OverlayUpdate::stay()
            }
            KeyCode::Down => {
                let count = self.filtered_commands().len();
                if count > 0 && self.selected < count - 1 {
                    self.selected += 1;
                }
                OverlayUpdate::stay()
            }
            KeyCode::Enter | KeyCode::Tab => {
                if let Some(cmd_name) = self.selected_command_name() {
                    let (open_overlay, effects, mutations) = execute_command(tui, cmd_name);
                    let update = match open_overlay {
                        Some(request) => OverlayUpdate::open(request),
                        None => OverlayUpdate::close(),
                    };
                    update.with_ui_effects(effects).with_mutations(mutations)
                } else {
                    OverlayUpdate::close()
                }
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

    pub fn filtered_commands(&self) -> Vec<&'static Command> {
        if self.filter.is_empty() {
            COMMANDS.iter().collect()
        } else {
            COMMANDS.iter().filter(|cmd| cmd.matches(&self.filter)).collect()
        }
    }

    pub fn clamp_selection(&mut self) {
        let count = self.filtered_commands().len();
        if count == 0 {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(count - 1);
        }
    }

    fn selected_command_name(&self) -> Option<&'static str> {
        self.filtered_commands().get(self.selected).map(|cmd| cmd.name)
    }
}

fn execute_command(
    tui: &TuiState,
    cmd_name: &str,
) -> (Option<OverlayRequest>, Vec<UiEffect>, Vec<StateMutation>) {
    match cmd_name {
        "analyze" => require_session(tui, OverlayRequest::Prompt(PromptKind::AnalyzeDomain)),
        "urls" => require_session(tui, OverlayRequest::Prompt(PromptKind::AnalyzeUrls)),
        "upload" => require_session(tui, OverlayRequest::Prompt(PromptKind::UploadFiles)),
        "clear" => {
            let (effects, mutations) = execute_chat_request(tui, |session_id| UiEffect::ClearChat {
                session_id,
            });
            (None, effects, mutations)
        }
        "sync" => {
            let (effects, mutations) = execute_chat_request(tui, |session_id| {
                UiEffect::SyncDomain { session_id }
            });
            (None, effects, mutations)
        }
        "clear-docs" => match tui.session.active_id.clone() {
            Some(session_id) => (None, vec![UiEffect::ClearDocuments { session_id }], vec![]),
            None => (None, vec![], vec![no_session_mutation()]),
        },
        "config" => (None, vec![UiEffect::OpenConfig], vec![]),
        "delete" => {
            if tui.session.active_id.is_none() {
                (None, vec![], vec![no_session_mutation()])
            } else if tui.tasks.is_mutating_sessions() {
                (None, vec![], vec![])
            } else {
                (Some(OverlayRequest::DeleteConfirm), vec![], vec![])
            }
        }
        "rename" => {
            if tui.session.active_id.is_none() {
                (None, vec![], vec![no_session_mutation()])
            } else {
                (Some(OverlayRequest::Rename), vec![], vec![])
            }
        }
        "new" => {
            if tui.tasks.is_mutating_sessions() {
                (None, vec![], vec![])
            } else {
                (
                    None,
                    vec![UiEffect::CreateSession {
                        name: tui.config.session_name.clone(),
                        provider: tui.config.provider,
                    }],
                    vec![],
                )
            }
        }
        "sessions" => (Some(OverlayRequest::SessionPicker), vec![], vec![]),
        "provider" => (Some(OverlayRequest::ProviderPicker), vec![], vec![]),
        "status" => {
            if tui.tasks.backend_status.is_running() {
                (None, vec![], vec![])
            } else {
                (None, vec![UiEffect::LoadBackendStatus { announce: true }], vec![])
            }
        }
        "model" => {
            if tui.tasks.model_load.is_running() {
                (None, vec![], vec![])
            } else {
                (
                    None,
                    vec![UiEffect::LoadModel],
                    vec![StateMutation::Transcript(
                        TranscriptMutation::AppendSystemMessage(
                            "Asking the backend to load its model...".to_string(),
                        ),
                    )],
                )
            }
        }
        "quit" => (None, vec![UiEffect::Quit], vec![]),
        _ => (None, vec![], vec![]),
    }
}

/// Opens `request` when a session is active, otherwise reports the
/// missing session in the transcript.
fn require_session(
    tui: &TuiState,
    request: OverlayRequest,
) -> (Option<OverlayRequest>, Vec<UiEffect>, Vec<StateMutation>) {
    if tui.session.active_id.is_some() {
        (Some(request), vec![], vec![])
    } else {
        (None, vec![], vec![no_session_mutation()])
    }
}

/// Builds a chat-family request against the active session, marking it
/// as waiting. A session that is already waiting swallows the command.
fn execute_chat_request(
    tui: &TuiState,
    effect: impl FnOnce(String) -> UiEffect,
) -> (Vec<UiEffect>, Vec<StateMutation>) {
    let Some(session_id) = tui.session.active_id.clone() else {
        return (vec![], vec![no_session_mutation()]);
    };
    if tui.session.is_waiting(&session_id) {
        return (vec![], vec![]);
    }
    (
        vec![effect(session_id.clone())],
        vec![StateMutation::Session(SessionMutation::SetWaiting(session_id))],
    )
}

fn no_session_mutation() -> StateMutation {
    StateMutation::Transcript(TranscriptMutation::AppendSystemMessage(
        "No active session yet.".to_string(),
    ))
}

pub fn render_command_palette(
    frame: &mut Frame,
    palette: &CommandPaletteState,
    area: Rect,
    input_top_y: u16,
) {
    use super::render_utils::OverlayChrome;

    let commands = palette.filtered_commands();

    let max_width = area.width.saturating_sub(4);
    let palette_width = max_width.clamp(20, 72);
    // +1 for description line
    let palette_height = (commands.len() as u16 + 7).max(8);

    let body = OverlayChrome::new("Commands", Color::Magenta)
        .size(palette_width, palette_height)
        .hints(&[("↑↓", "navigate"), ("Enter", "select"), ("Esc", "cancel")])
        .draw(frame, area, input_top_y);

    body.input_line(frame, 0, &palette.filter, None);
    body.separator(frame, 1);

    // -1 for description line
    let list_height = body.area().height.saturating_sub(4);
    let list_area = body.rows(2, list_height);

    let items: Vec<ListItem> = if commands.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "  No matching commands",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        commands
            .iter()
            .enumerate()
            .map(|(idx, cmd)| {
                let is_selected = idx == palette.selected;
                let name_style = if is_selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                ListItem::new(Line::from(Span::styled(cmd.display_name(), name_style)))
            })
            .collect()
    };

    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::Magenta))
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default();
    if !commands.is_empty() {
        list_state.select(Some(palette.selected));
    }
    frame.render_stateful_widget(list, list_area, &mut list_state);

    body.separator(frame, 2 + list_height);

    // Selected command description
    let description = commands
        .get(palette.selected)
        .map(|cmd| cmd.description)
        .unwrap_or("");
    body.centered_line(
        frame,
        3 + list_height,
        Line::from(Span::styled(
            description,
            Style::default().fg(Color::DarkGray),
        )),
    );
}

#[cfg(test)]
mod tests {
    use dia_core::config::Config;

    use super::*;

    fn tui() -> TuiState {
        TuiState::new(Config::default(), Config::DEFAULT_BASE_URL.to_string())
    }

    #[test]
    fn test_filtered_commands_empty_filter_lists_all() {
        let (state, _) = CommandPaletteState::open();
        assert_eq!(state.filtered_commands().len(), COMMANDS.len());
    }

    #[test]
    fn test_filtered_commands_with_filter() {
        let (mut state, _) = CommandPaletteState::open();
        state.filter = "cle".to_string();
        let names: Vec<&str> = state.filtered_commands().iter().map(|c| c.name).collect();
        assert!(names.contains(&"clear"));
        assert!(names.contains(&"clear-docs"));
        assert!(!names.contains(&"quit"));
    }

    #[test]
    fn test_filtered_commands_match_aliases() {
        let (mut state, _) = CommandPaletteState::open();
        state.filter = "switch".to_string();
        let names: Vec<&str> = state.filtered_commands().iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["sessions"]);
    }

    #[test]
    fn test_clamp_selection_after_filter_shrinks() {
        let (mut state, _) = CommandPaletteState::open();
        state.selected = COMMANDS.len() + 5;
        state.clamp_selection();
        assert_eq!(state.selected, COMMANDS.len() - 1);

        state.filter = "zzz".to_string();
        state.clamp_selection();
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_execute_quit_emits_quit_effect() {
        let tui = tui();
        let (overlay, effects, mutations) = execute_command(&tui, "quit");
        assert!(overlay.is_none());
        assert_eq!(effects, vec![UiEffect::Quit]);
        assert!(mutations.is_empty());
    }

    #[test]
    fn test_execute_new_uses_configured_defaults() {
        let tui = tui();
        let (_, effects, _) = execute_command(&tui, "new");
        assert_eq!(
            effects,
            vec![UiEffect::CreateSession {
                name: "New Session".to_string(),
                provider: dia_core::config::ProviderKind::Groq,
            }]
        );
    }

    #[test]
    fn test_execute_clear_without_session_reports_it() {
        let tui = tui();
        let (overlay, effects, mutations) = execute_command(&tui, "clear");
        assert!(overlay.is_none());
        assert!(effects.is_empty());
        assert_eq!(mutations.len(), 1);
    }

    #[test]
    fn test_execute_clear_marks_session_waiting() {
        let mut tui = tui();
        tui.session.activate("s1", "A");

        let (_, effects, mutations) = execute_command(&tui, "clear");
        assert_eq!(
            effects,
            vec![UiEffect::ClearChat {
                session_id: "s1".to_string()
            }]
        );
        assert!(matches!(
            mutations.as_slice(),
            [StateMutation::Session(SessionMutation::SetWaiting(id))] if id == "s1"
        ));
    }

    #[test]
    fn test_execute_sync_noop_while_waiting() {
        let mut tui = tui();
        tui.session.activate("s1", "A");
        tui.session.set_waiting("s1");

        let (_, effects, mutations) = execute_command(&tui, "sync");
        assert!(effects.is_empty());
        assert!(mutations.is_empty());
    }

    #[test]
    fn test_execute_delete_requires_session() {
        let tui = tui();
        let (overlay, _, mutations) = execute_command(&tui, "delete");
        assert!(overlay.is_none());
        assert_eq!(mutations.len(), 1);

        let mut tui = self::tui();
        tui.session.activate("s1", "A");
        let (overlay, _, _) = execute_command(&tui, "delete");
        assert!(matches!(overlay, Some(OverlayRequest::DeleteConfirm)));
    }

    #[test]
    fn test_execute_analyze_opens_prompt() {
        let mut tui = tui();
        tui.session.activate("s1", "A");
        let (overlay, _, _) = execute_command(&tui, "analyze");
        assert!(matches!(
            overlay,
            Some(OverlayRequest::Prompt(PromptKind::AnalyzeDomain))
        ));
    }
}
