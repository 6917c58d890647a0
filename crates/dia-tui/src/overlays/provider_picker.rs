//! Provider picker overlay.
//!
//! Chooses the LLM provider used for sessions created from now on. The
//! choice is persisted to the config file; existing sessions keep the
//! provider they were created with.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dia_core::config::ProviderKind;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState};

use super::OverlayUpdate;
use crate::effects::UiEffect;
use crate::mutations::{ConfigMutation, StateMutation, TranscriptMutation};
use crate::state::TuiState;

#[derive(Debug, Clone)]
pub struct ProviderPickerState {
    pub selected: usize,
}

impl ProviderPickerState {
    pub fn open(current: ProviderKind) -> (Self, Vec<UiEffect>) {
        let selected = ProviderKind::all()
            .iter()
            .position(|p| *p == current)
            .unwrap_or(0);
        (Self { selected }, vec![])
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, input_y: u16) {
        render_provider_picker(frame, self, area, input_y);
    }

    pub fn handle_key(&mut self, _tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc | KeyCode::Char('c') if key.code == KeyCode::Esc || ctrl => {
                OverlayUpdate::close()
            }
            KeyCode::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
                OverlayUpdate::stay()
            }
            KeyCode::Down => {
                if self.selected < ProviderKind::all().len() - 1 {
                    self.selected += 1;
                }
                OverlayUpdate::stay()
            }
            KeyCode::Enter => {
                let Some(&provider) = ProviderKind::all().get(self.selected) else {
                    return OverlayUpdate::close();
                };

                OverlayUpdate::close()
                    .with_ui_effects(vec![UiEffect::PersistProvider(provider)])
                    .with_mutations(vec![
                        StateMutation::Config(ConfigMutation::SetProvider(provider)),
                        StateMutation::Transcript(TranscriptMutation::AppendSystemMessage(
                            format!("New sessions will use {}.", provider.label()),
                        )),
                    ])
            }
            _ => OverlayUpdate::stay(),
        }
    }
}

fn render_provider_picker(
    frame: &mut Frame,
    picker: &ProviderPickerState,
    area: Rect,
    input_top_y: u16,
) {
    use super::render_utils::OverlayChrome;

    let providers = ProviderKind::all();

    let body = OverlayChrome::new("LLM Provider", Color::Magenta)
        .size(45, (providers.len() as u16 + 5).max(7))
        .hints(&[("↑↓", "navigate"), ("Enter", "select"), ("Esc", "cancel")])
        .draw(frame, area, input_top_y);

    let list_height = body.area().height.saturating_sub(1);
    let list_area = body.rows(0, list_height);

    let items: Vec<ListItem> = providers
        .iter()
        .map(|provider| {
            let name = format!("{:<16}", provider.label());
            // Right-align the wire id in the remaining width
            let id_width = body.area().width.saturating_sub(2 + 16 + 1) as usize;
            let id = format!("{:>id_width$}", provider.id());

            ListItem::new(Line::from(vec![
                Span::styled(
                    name,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(id, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::Magenta)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default();
    list_state.select(Some(picker.selected));
    frame.render_stateful_widget(list, list_area, &mut list_state);

    body.separator(frame, list_height);
}

#[cfg(test)]
mod tests {
    use dia_core::config::Config;

    use super::*;
    use crate::overlays::OverlayTransition;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_open_preselects_current_provider() {
        let (state, _) = ProviderPickerState::open(ProviderKind::Local);
        assert_eq!(ProviderKind::all()[state.selected], ProviderKind::Local);
    }

    #[test]
    fn test_enter_persists_and_mutates_config() {
        let tui = TuiState::new(Config::default(), Config::DEFAULT_BASE_URL.to_string());
        let (mut state, _) = ProviderPickerState::open(ProviderKind::Groq);
        state.selected = 1;

        let update = state.handle_key(&tui, key(KeyCode::Enter));
        assert!(matches!(update.transition, OverlayTransition::Close));
        assert_eq!(
            update.effects,
            vec![UiEffect::PersistProvider(ProviderKind::Local)]
        );
        assert!(matches!(
            update.mutations.first(),
            Some(StateMutation::Config(ConfigMutation::SetProvider(
                ProviderKind::Local
            )))
        ));
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let tui = TuiState::new(Config::default(), Config::DEFAULT_BASE_URL.to_string());
        let (mut state, _) = ProviderPickerState::open(ProviderKind::Groq);

        state.handle_key(&tui, key(KeyCode::Up));
        assert_eq!(state.selected, 0);

        for _ in 0..5 {
            state.handle_key(&tui, key(KeyCode::Down));
        }
        assert_eq!(state.selected, ProviderKind::all().len() - 1);
    }
}
