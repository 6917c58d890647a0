//! Single-line argument prompt for commands that need input.
//!
//! `analyze`, `urls`, and `upload` all take one line of text; this
//! overlay collects it and turns the submission into the matching
//! effect. Chat-style requests mark the session as waiting, uploads run
//! as a tracked background task instead.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::OverlayUpdate;
use crate::effects::UiEffect;
use crate::mutations::{SessionMutation, StateMutation, TranscriptMutation};
use crate::state::TuiState;

/// Which command this prompt collects an argument for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    AnalyzeDomain,
    AnalyzeUrls,
    UploadFiles,
}

impl PromptKind {
    fn title(self) -> &'static str {
        match self {
            PromptKind::AnalyzeDomain => "Analyze Domain",
            PromptKind::AnalyzeUrls => "Analyze URLs",
            PromptKind::UploadFiles => "Upload Documents",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            PromptKind::AnalyzeDomain => "example.com",
            PromptKind::AnalyzeUrls => "https://a.com/page https://b.com/page",
            PromptKind::UploadFiles => "/path/to/report.pdf /path/to/notes.docx",
        }
    }

    fn help(self) -> &'static str {
        match self {
            PromptKind::AnalyzeDomain => "Domain to crawl and summarize",
            PromptKind::AnalyzeUrls => "URLs to fetch, separated by spaces",
            PromptKind::UploadFiles => "File paths to index, separated by spaces",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PromptState {
    pub kind: PromptKind,
    pub input: String,
    pub error: Option<String>,
}

impl PromptState {
    pub fn open(kind: PromptKind) -> (Self, Vec<UiEffect>) {
        (
            Self {
                kind,
                input: String::new(),
                error: None,
            },
            vec![],
        )
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, input_y: u16) {
        render_prompt(frame, self, area, input_y);
    }

    pub fn handle_key(&mut self, tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if !matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            self.error = None;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('c') if key.code == KeyCode::Esc || ctrl => {
                OverlayUpdate::close()
            }
            KeyCode::Enter => self.submit(tui),
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

    fn submit(&mut self, tui: &TuiState) -> OverlayUpdate {
        let Some(session_id) = tui.session.active_id.clone() else {
            // The session disappeared while the prompt was open.
            return OverlayUpdate::close().with_mutations(vec![StateMutation::Transcript(
                TranscriptMutation::AppendSystemMessage("No active session yet.".to_string()),
            )]);
        };

        let value = self.input.trim().to_string();
        if value.is_empty() {
            self.error = Some("Nothing to send".to_string());
            return OverlayUpdate::stay();
        }

        match self.kind {
            PromptKind::AnalyzeDomain | PromptKind::AnalyzeUrls => {
                if tui.session.is_waiting(&session_id) {
                    self.error = Some("Waiting for the previous request...".to_string());
                    return OverlayUpdate::stay();
                }

                let (effect, banner) = match self.kind {
                    PromptKind::AnalyzeDomain => (
                        UiEffect::AnalyzeDomain {
                            session_id: session_id.clone(),
                            domain: value.clone(),
                        },
                        format!("Analyzing {value}..."),
                    ),
                    _ => {
                        let urls: Vec<String> =
                            value.split_whitespace().map(str::to_string).collect();
                        let banner = format!("Analyzing {} URL(s)...", urls.len());
                        (
                            UiEffect::AnalyzeUrls {
                                session_id: session_id.clone(),
                                urls,
                            },
                            banner,
                        )
                    }
                };

                OverlayUpdate::close()
                    .with_ui_effects(vec![effect])
                    .with_mutations(vec![
                        StateMutation::Transcript(TranscriptMutation::AppendSystemMessage(banner)),
                        StateMutation::Session(SessionMutation::SetWaiting(session_id)),
                    ])
            }
            PromptKind::UploadFiles => {
                if tui.tasks.upload.is_running() {
                    self.error = Some("Upload in progress...".to_string());
                    return OverlayUpdate::stay();
                }

                let paths: Vec<PathBuf> = value.split_whitespace().map(PathBuf::from).collect();
                let banner = format!("Uploading {} file(s)...", paths.len());
                OverlayUpdate::close()
                    .with_ui_effects(vec![UiEffect::UploadFiles { session_id, paths }])
                    .with_mutations(vec![StateMutation::Transcript(
                        TranscriptMutation::AppendSystemMessage(banner),
                    )])
            }
        }
    }
}

fn render_prompt(frame: &mut Frame, state: &PromptState, area: Rect, input_top_y: u16) {
    use super::render_utils::OverlayChrome;

    let body = OverlayChrome::new(state.kind.title(), Color::Cyan)
        .size(60, 7)
        .hints(&[("Enter", "send"), ("Esc", "cancel")])
        .draw(frame, area, input_top_y);

    body.input_line(frame, 0, &state.input, Some(state.kind.placeholder()));
    body.separator(frame, 1);

    let (help_text, help_style) = match &state.error {
        Some(error) => (error.as_str(), Style::default().fg(Color::Red)),
        None => (state.kind.help(), Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(help_text, help_style))),
        body.row(2),
    );

    body.separator(frame, 3);
}
