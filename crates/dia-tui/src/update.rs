//! Pure reducer: applies a [`UiEvent`] to the [`AppState`] and returns
//! the effects the runtime should execute.
//!
//! Every state mutation happens here, on the UI task. Backend responses
//! arrive as events carrying the session id they were issued for; the
//! reducer drops payloads whose session is no longer active instead of
//! applying them to whichever session the user switched to meanwhile.

use crate::effects::UiEffect;
use crate::events::{
    BackendUiEvent, ChatUiEvent, DocumentUiEvent, SessionUiEvent, UiEvent, UploadReport,
};
use crate::features::input;
use crate::features::session::Reconcile;
use crate::features::transcript::{HistoryCell, total_line_count};
use crate::mutations::{ConfigMutation, StateMutation, TranscriptMutation};
use crate::overlays::{
    self, CommandPaletteState, DeleteConfirmState, Overlay, OverlayRequest, OverlayTransition,
    OverlayUpdate, PromptState, ProviderPickerState, RenameState, SessionPickerState,
};
use crate::render;
use crate::state::{AppState, TuiState};

/// Processes an event and returns effects for the runtime.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Frame { width, height } => {
            handle_frame(&mut app.tui, width, height);
            vec![]
        }
        UiEvent::Terminal(terminal_event) => handle_terminal_event(app, terminal_event),

        UiEvent::TaskStarted { kind, started } => {
            app.tui.tasks.state_mut(kind).on_started(&started);
            vec![]
        }
        UiEvent::TaskCompleted { kind, completed } => {
            // Stale completions (superseded task ids) are dropped whole.
            if app.tui.tasks.state_mut(kind).finish_if_active(completed.id) {
                update(app, *completed.result)
            } else {
                vec![]
            }
        }

        UiEvent::Session(event) => handle_session_event(&mut app.tui, event),
        UiEvent::Chat(event) => handle_chat_event(&mut app.tui, event),
        UiEvent::Document(event) => handle_document_event(&mut app.tui, event),
        UiEvent::Backend(event) => handle_backend_event(&mut app.tui, event),
    }
}

/// Refreshes scroll layout from the current terminal dimensions and
/// applies wheel movement accumulated since the last frame.
fn handle_frame(tui: &mut TuiState, width: u16, height: u16) {
    let (text_width, viewport_height) = render::transcript_viewport(width, height);
    let total = total_line_count(&tui.transcript, text_width);
    tui.transcript.scroll.update_layout(total, viewport_height);
    tui.transcript.apply_scroll_delta();
}

fn handle_terminal_event(app: &mut AppState, event: crossterm::event::Event) -> Vec<UiEffect> {
    use crossterm::event::{Event, KeyEventKind, MouseEventKind};

    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Mouse(mouse) => {
            match mouse.kind {
                MouseEventKind::ScrollUp => app.tui.transcript.scroll_accumulator.accumulate(-1),
                MouseEventKind::ScrollDown => app.tui.transcript.scroll_accumulator.accumulate(1),
                _ => {}
            }
            vec![]
        }
        Event::Paste(text) => {
            input::handle_paste(&mut app.tui.input, &text);
            vec![]
        }
        // Resize is picked up by the next Frame event.
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: crossterm::event::KeyEvent) -> Vec<UiEffect> {
    // An active overlay captures all keys.
    if let Some(overlay_update) = overlays::handle_overlay_key(&app.tui, &mut app.overlay, key) {
        return apply_overlay_update(app, overlay_update);
    }

    let (mut effects, mutations, overlay_request) =
        input::handle_main_key(&mut app.tui.input, &app.tui.session, key);
    apply_mutations(&mut app.tui, mutations);

    if let Some(request) = overlay_request
        && app.overlay.is_none()
    {
        effects.extend(open_overlay_request(app, request));
    }

    effects
}

/// Applies an overlay key result: mutations first, then the transition.
fn apply_overlay_update(app: &mut AppState, overlay_update: OverlayUpdate) -> Vec<UiEffect> {
    let OverlayUpdate {
        transition,
        mutations,
        effects,
    } = overlay_update;

    apply_mutations(&mut app.tui, mutations);

    let mut all_effects = effects;
    match transition {
        OverlayTransition::Stay => {}
        OverlayTransition::Close => app.overlay = None,
        OverlayTransition::Open(request) => {
            app.overlay = None;
            all_effects.extend(open_overlay_request(app, request));
        }
    }
    all_effects
}

/// Constructs the overlay for a request and installs it. Requests that
/// target the active session dissolve into a notice when there is none.
fn open_overlay_request(app: &mut AppState, request: OverlayRequest) -> Vec<UiEffect> {
    match request {
        OverlayRequest::CommandPalette => {
            let (state, effects) = CommandPaletteState::open();
            app.overlay = Some(Overlay::CommandPalette(state));
            effects
        }
        OverlayRequest::SessionPicker => {
            let (state, effects) = SessionPickerState::open(&app.tui.session);
            app.overlay = Some(Overlay::SessionPicker(state));
            effects
        }
        OverlayRequest::ProviderPicker => {
            let (state, effects) = ProviderPickerState::open(app.tui.config.provider);
            app.overlay = Some(Overlay::ProviderPicker(state));
            effects
        }
        OverlayRequest::Prompt(kind) => {
            let (state, effects) = PromptState::open(kind);
            app.overlay = Some(Overlay::Prompt(state));
            effects
        }
        OverlayRequest::Rename => match active_session(&app.tui) {
            Some((session_id, name)) => {
                let (state, effects) = RenameState::open(session_id, name);
                app.overlay = Some(Overlay::Rename(state));
                effects
            }
            None => no_active_session(&mut app.tui),
        },
        OverlayRequest::DeleteConfirm => match active_session(&app.tui) {
            Some((session_id, name)) => {
                let (state, effects) = DeleteConfirmState::open(session_id, name);
                app.overlay = Some(Overlay::DeleteConfirm(state));
                effects
            }
            None => no_active_session(&mut app.tui),
        },
    }
}

fn active_session(tui: &TuiState) -> Option<(String, String)> {
    let session_id = tui.session.active_id.clone()?;
    let name = tui
        .session
        .active_name
        .clone()
        .unwrap_or_else(|| session_id.clone());
    Some((session_id, name))
}

fn no_active_session(tui: &mut TuiState) -> Vec<UiEffect> {
    tui.transcript
        .push_cell(HistoryCell::system("No active session yet."));
    vec![]
}

/// Applies deferred mutations from key handlers and overlays.
fn apply_mutations(tui: &mut TuiState, mutations: Vec<StateMutation>) {
    for mutation in mutations {
        match mutation {
            StateMutation::Transcript(m) => tui.transcript.apply(m),
            StateMutation::Input(m) => tui.input.apply(m),
            StateMutation::Session(m) => tui.session.apply(m),
            StateMutation::Config(ConfigMutation::SetProvider(provider)) => {
                tui.config.provider = provider;
            }
        }
    }
}

// =============================================================================
// Session events
// =============================================================================

fn handle_session_event(tui: &mut TuiState, event: SessionUiEvent) -> Vec<UiEffect> {
    match event {
        SessionUiEvent::SelectRequested { session_id } => select_session(tui, &session_id),

        SessionUiEvent::ListLoaded { sessions } => match tui.session.apply_list(sessions) {
            Reconcile::Kept => vec![],
            Reconcile::Switched { session_id } => select_session(tui, &session_id),
            Reconcile::NeedsCreate => request_replacement_session(tui),
        },
        SessionUiEvent::ListFailed { error } => {
            tui.transcript
                .push_cell(HistoryCell::error(format!("Failed to load sessions: {error}")));
            vec![]
        }

        SessionUiEvent::Created { response } => {
            tui.session.create_requested = false;
            if response.llm_provider.is_some() {
                tui.llm_provider = response.llm_provider;
            }
            if response.model.is_some() {
                tui.llm_model = response.model;
            }
            if let Some(message) = response.message {
                tui.transcript.push_cell(HistoryCell::system(message));
            }
            // The next list reload activates the new session (rule 1).
            tui.session.set_pending_select(Some(response.session_id));
            vec![UiEffect::RefreshSessions]
        }
        SessionUiEvent::CreateFailed { error } => {
            tui.session.create_requested = false;
            tui.transcript
                .push_cell(HistoryCell::error(format!("Failed to create session: {error}")));
            vec![]
        }

        SessionUiEvent::Deleted { message } => {
            tui.transcript.push_cell(HistoryCell::system(message));
            vec![UiEffect::RefreshSessions]
        }
        SessionUiEvent::DeleteFailed { error } => {
            // The recorded fallback must not fire for a delete that never
            // happened.
            tui.session.set_pending_select(None);
            tui.transcript
                .push_cell(HistoryCell::error(format!("Failed to delete session: {error}")));
            refresh_if_stale(&error)
        }

        SessionUiEvent::Renamed { message } => {
            tui.transcript.push_cell(HistoryCell::system(message));
            vec![UiEffect::RefreshSessions]
        }
        SessionUiEvent::RenameFailed { error } => {
            tui.transcript
                .push_cell(HistoryCell::error(format!("Failed to rename session: {error}")));
            refresh_if_stale(&error)
        }

        SessionUiEvent::HistoryLoaded {
            session_id,
            history,
        } => {
            if !tui.session.is_active(&session_id) {
                return vec![];
            }
            // Rebuild from scratch so a repeated select never duplicates
            // turns.
            tui.transcript.apply(TranscriptMutation::Clear);
            for message in history {
                let cell = match message.role.as_str() {
                    "user" => HistoryCell::user(message.content),
                    "assistant" => HistoryCell::assistant(message.content),
                    _ => HistoryCell::system(message.content),
                };
                tui.transcript.push_cell(cell);
            }
            vec![]
        }
        SessionUiEvent::HistoryFailed { session_id, error } => {
            if tui.session.is_active(&session_id) {
                tui.transcript
                    .push_cell(HistoryCell::error(format!("Failed to load history: {error}")));
            }
            refresh_if_stale(&error)
        }
    }
}

/// Runs the activation sequence for `session_id`: listed ids get a
/// clear+reload, unlisted ids are stale and trigger a refresh instead.
fn select_session(tui: &mut TuiState, session_id: &str) -> Vec<UiEffect> {
    let Some(name) = tui.session.name_of(session_id).map(str::to_string) else {
        tui.transcript.push_cell(HistoryCell::error(
            "That session no longer exists. Reloading the session list.",
        ));
        return vec![UiEffect::RefreshSessions];
    };

    tui.session.activate(session_id, &name);
    tui.transcript.apply(TranscriptMutation::Clear);
    vec![
        UiEffect::LoadHistory {
            session_id: session_id.to_string(),
        },
        UiEffect::LoadDocumentStatus {
            session_id: session_id.to_string(),
        },
    ]
}

/// An empty list needs a replacement session; exactly one create is
/// issued no matter how many empty reloads arrive while it is in
/// flight.
fn request_replacement_session(tui: &mut TuiState) -> Vec<UiEffect> {
    if tui.session.create_requested || tui.tasks.session_create.is_running() {
        return vec![];
    }
    tui.session.create_requested = true;
    vec![UiEffect::CreateSession {
        name: tui.config.session_name.clone(),
        provider: tui.config.provider,
    }]
}

fn refresh_if_stale(error: &dia_core::api::ApiError) -> Vec<UiEffect> {
    if error.is_stale_session() {
        vec![UiEffect::RefreshSessions]
    } else {
        vec![]
    }
}

// =============================================================================
// Chat & analysis events
// =============================================================================

fn handle_chat_event(tui: &mut TuiState, event: ChatUiEvent) -> Vec<UiEffect> {
    match event {
        ChatUiEvent::Completed {
            session_id,
            response,
        } => {
            tui.session.clear_waiting(&session_id);
            if tui.session.is_active(&session_id) {
                let sources = response.source_labels();
                tui.transcript
                    .push_cell(HistoryCell::assistant_with_sources(response.response, sources));
            }
            vec![]
        }
        ChatUiEvent::Failed { session_id, error } => {
            chat_failure(tui, &session_id, "Chat failed", error)
        }

        ChatUiEvent::DomainAnalyzed {
            session_id,
            content,
        }
        | ChatUiEvent::UrlsAnalyzed {
            session_id,
            content,
        } => {
            tui.session.clear_waiting(&session_id);
            if tui.session.is_active(&session_id) {
                tui.transcript.push_cell(HistoryCell::assistant(content));
            }
            vec![]
        }
        ChatUiEvent::AnalysisFailed { session_id, error } => {
            chat_failure(tui, &session_id, "Analysis failed", error)
        }

        ChatUiEvent::Synced { session_id, result } => {
            tui.session.clear_waiting(&session_id);
            if tui.session.is_active(&session_id) {
                tui.transcript.push_cell(HistoryCell::system(result));
            }
            vec![]
        }
        ChatUiEvent::SyncFailed { session_id, error } => {
            chat_failure(tui, &session_id, "Sync failed", error)
        }

        ChatUiEvent::Cleared {
            session_id,
            message,
        } => {
            tui.session.clear_waiting(&session_id);
            if tui.session.is_active(&session_id) {
                tui.transcript.apply(TranscriptMutation::Clear);
                tui.transcript.push_cell(HistoryCell::system(message));
            }
            vec![]
        }
        ChatUiEvent::ClearFailed { session_id, error } => {
            chat_failure(tui, &session_id, "Failed to clear chat", error)
        }
    }
}

/// Shared failure path for chat-family requests: the owning session
/// stops waiting either way, the error only renders while it is still
/// on screen, and stale ids trigger a list reload.
fn chat_failure(
    tui: &mut TuiState,
    session_id: &str,
    prefix: &str,
    error: dia_core::api::ApiError,
) -> Vec<UiEffect> {
    tui.session.clear_waiting(session_id);
    if tui.session.is_active(session_id) {
        tui.transcript
            .push_cell(HistoryCell::error(format!("{prefix}: {error}")));
    }
    refresh_if_stale(&error)
}

// =============================================================================
// Document events
// =============================================================================

fn handle_document_event(tui: &mut TuiState, event: DocumentUiEvent) -> Vec<UiEffect> {
    match event {
        DocumentUiEvent::StatusLoaded { session_id, status } => {
            if tui.session.is_active(&session_id) {
                tui.session.apply_document_status(status);
            }
            vec![]
        }
        DocumentUiEvent::StatusFailed { session_id, error } => {
            // Fail safe: treat the session as a plain domain session. Not
            // a chat error, so it only goes to the log.
            if tui.session.is_active(&session_id) {
                tui.session.clear_document_status();
            }
            tracing::warn!(%session_id, error = %error, "document status lookup failed");
            refresh_if_stale(&error)
        }

        DocumentUiEvent::UploadFinished { session_id, report } => {
            let reload = report.any_uploaded() && tui.session.is_active(&session_id);
            if tui.session.is_active(&session_id) {
                render_upload_report(tui, &report);
            }
            if reload {
                vec![UiEffect::LoadDocumentStatus { session_id }]
            } else {
                vec![]
            }
        }

        DocumentUiEvent::DocumentsCleared {
            session_id,
            message,
        } => {
            if tui.session.is_active(&session_id) {
                tui.transcript.push_cell(HistoryCell::system(message));
                // Reload so the type badge falls back to Domain.
                vec![UiEffect::LoadDocumentStatus { session_id }]
            } else {
                vec![]
            }
        }
        DocumentUiEvent::DocumentsClearFailed { session_id, error } => {
            if tui.session.is_active(&session_id) {
                tui.transcript.push_cell(HistoryCell::error(format!(
                    "Failed to clear documents: {error}"
                )));
            }
            refresh_if_stale(&error)
        }
    }
}

fn render_upload_report(tui: &mut TuiState, report: &UploadReport) {
    if report.is_empty() {
        tui.transcript
            .push_cell(HistoryCell::system("Nothing was uploaded."));
        return;
    }

    for (name, reason) in &report.skipped {
        tui.transcript
            .push_cell(HistoryCell::error(format!("Skipped {name}: {reason}")));
    }
    for (name, error) in &report.failed {
        tui.transcript
            .push_cell(HistoryCell::error(format!("Failed to upload {name}: {error}")));
    }
    for (name, response) in &report.uploaded {
        let summary = match &response.message {
            Some(message) => format!("{name}: {message}"),
            None => format!("{name}: indexed {} chunk(s)", response.chunks_added),
        };
        tui.transcript.push_cell(HistoryCell::system(summary));
    }

    if report.uploaded.is_empty() {
        tui.transcript
            .push_cell(HistoryCell::system("Nothing was uploaded."));
    }
}

// =============================================================================
// Backend events
// =============================================================================

fn handle_backend_event(tui: &mut TuiState, event: BackendUiEvent) -> Vec<UiEffect> {
    match event {
        BackendUiEvent::StatusLoaded { status, announce } => {
            if let Some(provider) = status.get("llm_provider").and_then(|v| v.as_str()) {
                tui.llm_provider = Some(provider.to_string());
            }
            if let Some(model) = status.get("model").and_then(|v| v.as_str()) {
                tui.llm_model = Some(model.to_string());
            }
            if announce {
                let pretty = serde_json::to_string_pretty(&status)
                    .unwrap_or_else(|_| status.to_string());
                tui.transcript
                    .push_cell(HistoryCell::json("Backend status", pretty));
            }
            vec![]
        }
        BackendUiEvent::StatusFailed { error, announce } => {
            if announce {
                tui.transcript
                    .push_cell(HistoryCell::error(format!("Failed to load backend status: {error}")));
            } else {
                tracing::warn!(error = %error, "backend status probe failed");
            }
            vec![]
        }
        BackendUiEvent::ModelLoaded { message } => {
            tui.transcript.push_cell(HistoryCell::system(message));
            vec![]
        }
        BackendUiEvent::ModelLoadFailed { error } => {
            tui.transcript
                .push_cell(HistoryCell::error(format!("Failed to load model: {error}")));
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use dia_core::api::{
        ApiError, ChatResponse, DocumentStatus, HistoryMessage, InitializeResponse, SessionEntry,
    };
    use dia_core::api::ChatType;
    use dia_core::config::Config;

    use super::*;
    use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};

    fn app() -> AppState {
        AppState::new(Config::default(), Config::DEFAULT_BASE_URL.to_string())
    }

    fn entry(id: &str, name: &str) -> SessionEntry {
        SessionEntry {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn list_loaded(entries: Vec<SessionEntry>) -> UiEvent {
        UiEvent::Session(SessionUiEvent::ListLoaded { sessions: entries })
    }

    fn transcript_texts(app: &AppState) -> Vec<String> {
        app.tui
            .transcript
            .cells()
            .iter()
            .map(|cell| {
                cell.display_lines(200)
                    .iter()
                    .map(|line| line.text())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect()
    }

    /// Reconciliation keeps a still-listed active session without
    /// reloading anything.
    #[test]
    fn test_list_reload_keeps_listed_active_session() {
        let mut app = app();
        app.tui.session.activate("1", "A");

        let effects = update(&mut app, list_loaded(vec![entry("1", "A"), entry("2", "B")]));

        assert!(effects.is_empty());
        assert_eq!(app.tui.session.active_id.as_deref(), Some("1"));
    }

    /// A vanished active session hands over to the first entry, with the
    /// full clear+reload sequence.
    #[test]
    fn test_list_reload_switches_to_first_when_active_vanished() {
        let mut app = app();
        app.tui.session.activate("gone", "Gone");
        app.tui.transcript.push_cell(HistoryCell::user("old turn"));

        let effects = update(&mut app, list_loaded(vec![entry("2", "B"), entry("3", "C")]));

        assert_eq!(app.tui.session.active_id.as_deref(), Some("2"));
        assert!(app.tui.transcript.cells().is_empty());
        assert_eq!(
            effects,
            vec![
                UiEffect::LoadHistory {
                    session_id: "2".to_string()
                },
                UiEffect::LoadDocumentStatus {
                    session_id: "2".to_string()
                },
            ]
        );
    }

    /// An empty list issues exactly one create; further empty reloads
    /// while it is pending issue nothing.
    #[test]
    fn test_empty_list_issues_exactly_one_create() {
        let mut app = app();

        let effects = update(&mut app, list_loaded(vec![]));
        assert_eq!(
            effects,
            vec![UiEffect::CreateSession {
                name: "New Session".to_string(),
                provider: dia_core::config::ProviderKind::Groq,
            }]
        );
        assert!(app.tui.session.create_requested);

        // Second empty reload before the create resolves: nothing.
        let effects = update(&mut app, list_loaded(vec![]));
        assert!(effects.is_empty());
    }

    /// Deleting the sole session: fallback None, empty reload creates a
    /// replacement, the created session gets selected on the reload
    /// after that.
    #[test]
    fn test_sole_session_delete_creates_and_selects_replacement() {
        let mut app = app();
        update(&mut app, list_loaded(vec![entry("1", "A")]));
        assert_eq!(app.tui.session.active_id.as_deref(), Some("1"));

        // Delete confirmed: fallback for the sole session is None.
        assert_eq!(app.tui.session.delete_fallback("1"), None);
        let effects = update(
            &mut app,
            UiEvent::Session(SessionUiEvent::Deleted {
                message: "Session deleted.".to_string(),
            }),
        );
        assert_eq!(effects, vec![UiEffect::RefreshSessions]);

        // Reload comes back empty: one create.
        let effects = update(&mut app, list_loaded(vec![]));
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::CreateSession { .. }]
        ));

        // Create resolves, refresh lists the replacement, it activates.
        let effects = update(
            &mut app,
            UiEvent::Session(SessionUiEvent::Created {
                response: InitializeResponse {
                    session_id: "2".to_string(),
                    message: None,
                    llm_provider: None,
                    model: None,
                },
            }),
        );
        assert_eq!(effects, vec![UiEffect::RefreshSessions]);
        assert!(!app.tui.session.create_requested);

        update(&mut app, list_loaded(vec![entry("2", "New Session")]));
        assert_eq!(app.tui.session.active_id.as_deref(), Some("2"));
    }

    /// Scenario from the design review: delete active session 1 of
    /// [1, 2]; the fallback (2) recorded before the delete is active
    /// after the reload.
    #[test]
    fn test_delete_active_of_two_lands_on_fallback() {
        let mut app = app();
        update(&mut app, list_loaded(vec![entry("1", "A"), entry("2", "B")]));
        assert_eq!(app.tui.session.active_id.as_deref(), Some("1"));

        let fallback = app.tui.session.delete_fallback("1");
        assert_eq!(fallback.as_deref(), Some("2"));
        app.tui.session.set_pending_select(fallback);

        update(
            &mut app,
            UiEvent::Session(SessionUiEvent::Deleted {
                message: "deleted".to_string(),
            }),
        );
        update(&mut app, list_loaded(vec![entry("2", "B")]));

        assert_eq!(app.tui.session.active_id.as_deref(), Some("2"));
        assert_eq!(app.tui.session.active_name.as_deref(), Some("B"));
    }

    /// Deleting a non-active session never moves the active pointer.
    #[test]
    fn test_delete_non_active_keeps_selection() {
        let mut app = app();
        update(&mut app, list_loaded(vec![entry("1", "A"), entry("2", "B")]));

        // No pending select is recorded for non-active deletes.
        update(
            &mut app,
            UiEvent::Session(SessionUiEvent::Deleted {
                message: "deleted".to_string(),
            }),
        );
        update(&mut app, list_loaded(vec![entry("1", "A")]));

        assert_eq!(app.tui.session.active_id.as_deref(), Some("1"));
    }

    /// Selecting the active session twice performs a clear+reload per
    /// call and never duplicates history.
    #[test]
    fn test_double_select_is_idempotent() {
        let mut app = app();
        update(&mut app, list_loaded(vec![entry("1", "A")]));

        for _ in 0..2 {
            let effects = update(
                &mut app,
                UiEvent::Session(SessionUiEvent::SelectRequested {
                    session_id: "1".to_string(),
                }),
            );
            assert_eq!(effects.len(), 2);

            update(
                &mut app,
                UiEvent::Session(SessionUiEvent::HistoryLoaded {
                    session_id: "1".to_string(),
                    history: vec![
                        HistoryMessage {
                            role: "user".to_string(),
                            content: "hello".to_string(),
                        },
                        HistoryMessage {
                            role: "assistant".to_string(),
                            content: "hi".to_string(),
                        },
                    ],
                }),
            );
        }

        // Two turns, not four.
        assert_eq!(app.tui.transcript.cells().len(), 2);
    }

    /// Selecting an unlisted id surfaces the stale notice and refreshes
    /// instead of switching.
    #[test]
    fn test_select_unlisted_id_triggers_refresh() {
        let mut app = app();
        update(&mut app, list_loaded(vec![entry("1", "A")]));

        let effects = update(
            &mut app,
            UiEvent::Session(SessionUiEvent::SelectRequested {
                session_id: "ghost".to_string(),
            }),
        );

        assert_eq!(effects, vec![UiEffect::RefreshSessions]);
        assert_eq!(app.tui.session.active_id.as_deref(), Some("1"));
        assert!(transcript_texts(&app).iter().any(|t| t.contains("no longer exists")));
    }

    /// A chat response for a session the user switched away from is
    /// dropped, but that session's waiting flag still clears.
    #[test]
    fn test_stale_chat_response_dropped_but_waiting_cleared() {
        let mut app = app();
        update(&mut app, list_loaded(vec![entry("1", "A"), entry("2", "B")]));
        app.tui.session.set_waiting("1");

        // Switch to session 2 while 1 is waiting.
        update(
            &mut app,
            UiEvent::Session(SessionUiEvent::SelectRequested {
                session_id: "2".to_string(),
            }),
        );

        let cells_before = app.tui.transcript.cells().len();
        update(
            &mut app,
            UiEvent::Chat(ChatUiEvent::Completed {
                session_id: "1".to_string(),
                response: ChatResponse {
                    response: "late answer".to_string(),
                    sources: vec![],
                },
            }),
        );

        assert_eq!(app.tui.transcript.cells().len(), cells_before);
        assert!(!app.tui.session.is_waiting("1"));
    }

    /// A document-status response for a non-active session never
    /// reclassifies the one on screen.
    #[test]
    fn test_stale_document_status_dropped() {
        let mut app = app();
        update(&mut app, list_loaded(vec![entry("1", "A"), entry("2", "B")]));
        update(
            &mut app,
            UiEvent::Session(SessionUiEvent::SelectRequested {
                session_id: "2".to_string(),
            }),
        );

        update(
            &mut app,
            UiEvent::Document(DocumentUiEvent::StatusLoaded {
                session_id: "1".to_string(),
                status: DocumentStatus {
                    total_chunks: 9,
                    documents_processed: vec![],
                },
            }),
        );

        assert_eq!(app.tui.session.chat_type(), ChatType::Auto);
    }

    /// A clear-documents failure for a session the user already left is
    /// not rendered into the new session's transcript; a stale id still
    /// triggers the list reload.
    #[test]
    fn test_stale_documents_clear_failure_not_rendered() {
        let mut app = app();
        update(&mut app, list_loaded(vec![entry("1", "A"), entry("2", "B")]));
        update(
            &mut app,
            UiEvent::Session(SessionUiEvent::SelectRequested {
                session_id: "2".to_string(),
            }),
        );
        let cells_before = app.tui.transcript.cells().len();

        let effects = update(
            &mut app,
            UiEvent::Document(DocumentUiEvent::DocumentsClearFailed {
                session_id: "1".to_string(),
                error: ApiError::api("Session not found"),
            }),
        );

        assert_eq!(app.tui.transcript.cells().len(), cells_before);
        assert_eq!(effects, vec![UiEffect::RefreshSessions]);
    }

    /// The same failure on the active session still surfaces as an
    /// error cell.
    #[test]
    fn test_active_documents_clear_failure_rendered() {
        let mut app = app();
        update(&mut app, list_loaded(vec![entry("1", "A")]));

        update(
            &mut app,
            UiEvent::Document(DocumentUiEvent::DocumentsClearFailed {
                session_id: "1".to_string(),
                error: ApiError::api("backend busy"),
            }),
        );

        assert!(
            transcript_texts(&app)
                .iter()
                .any(|t| t.contains("Failed to clear documents"))
        );
    }

    /// Chunks present classify the session as Document and route chat
    /// accordingly; a failed probe falls back to Domain.
    #[test]
    fn test_document_status_drives_chat_routing() {
        let mut app = app();
        update(&mut app, list_loaded(vec![entry("1", "A")]));

        update(
            &mut app,
            UiEvent::Document(DocumentUiEvent::StatusLoaded {
                session_id: "1".to_string(),
                status: DocumentStatus {
                    total_chunks: 5,
                    documents_processed: vec!["report.pdf".to_string()],
                },
            }),
        );
        assert_eq!(app.tui.session.chat_type(), ChatType::Document);

        update(
            &mut app,
            UiEvent::Document(DocumentUiEvent::StatusFailed {
                session_id: "1".to_string(),
                error: ApiError::api("probe failed"),
            }),
        );
        assert_eq!(app.tui.session.chat_type(), ChatType::Auto);
        // Not surfaced as a chat error.
        assert!(!transcript_texts(&app).iter().any(|t| t.contains("probe failed")));
    }

    /// A stale-session chat failure heals the list.
    #[test]
    fn test_stale_session_chat_failure_triggers_refresh() {
        let mut app = app();
        update(&mut app, list_loaded(vec![entry("1", "A")]));
        app.tui.session.set_waiting("1");

        let effects = update(
            &mut app,
            UiEvent::Chat(ChatUiEvent::Failed {
                session_id: "1".to_string(),
                error: ApiError::api("Session not found"),
            }),
        );

        assert_eq!(effects, vec![UiEffect::RefreshSessions]);
        assert!(!app.tui.session.is_waiting("1"));
        assert!(transcript_texts(&app).iter().any(|t| t.contains("Chat failed")));
    }

    /// A failed delete discards the recorded fallback so it cannot fire
    /// on a later reload.
    #[test]
    fn test_failed_delete_clears_pending_select() {
        let mut app = app();
        update(&mut app, list_loaded(vec![entry("1", "A"), entry("2", "B")]));
        app.tui.session.set_pending_select(Some("2".to_string()));

        update(
            &mut app,
            UiEvent::Session(SessionUiEvent::DeleteFailed {
                error: ApiError::api("backend busy"),
            }),
        );

        assert_eq!(app.tui.session.pending_select(), None);
        update(&mut app, list_loaded(vec![entry("1", "A"), entry("2", "B")]));
        assert_eq!(app.tui.session.active_id.as_deref(), Some("1"));
    }

    /// Task lifecycle: stale completions are dropped, current ones are
    /// unwrapped and processed.
    #[test]
    fn test_task_completion_unwraps_current_and_drops_stale() {
        let mut app = app();
        update(
            &mut app,
            UiEvent::TaskStarted {
                kind: TaskKind::SessionList,
                started: TaskStarted { id: TaskId(7) },
            },
        );

        // Stale id: payload dropped.
        let effects = update(
            &mut app,
            UiEvent::TaskCompleted {
                kind: TaskKind::SessionList,
                completed: TaskCompleted {
                    id: TaskId(3),
                    result: Box::new(list_loaded(vec![entry("1", "A")])),
                },
            },
        );
        assert!(effects.is_empty());
        assert!(app.tui.session.sessions.is_empty());

        // Current id: payload processed.
        update(
            &mut app,
            UiEvent::TaskCompleted {
                kind: TaskKind::SessionList,
                completed: TaskCompleted {
                    id: TaskId(7),
                    result: Box::new(list_loaded(vec![entry("1", "A")])),
                },
            },
        );
        assert_eq!(app.tui.session.sessions.len(), 1);
        assert!(!app.tui.tasks.session_list.is_running());
    }

    /// Created responses update the status-line provider/model and
    /// queue the new session for selection.
    #[test]
    fn test_created_records_pending_and_backend_info() {
        let mut app = app();
        update(
            &mut app,
            UiEvent::Session(SessionUiEvent::Created {
                response: InitializeResponse {
                    session_id: "s9".to_string(),
                    message: Some("Analyzer ready.".to_string()),
                    llm_provider: Some("groq".to_string()),
                    model: Some("llama-3.3-70b-versatile".to_string()),
                },
            }),
        );

        assert_eq!(app.tui.session.pending_select(), Some("s9"));
        assert_eq!(app.tui.llm_provider.as_deref(), Some("groq"));
        assert!(transcript_texts(&app).iter().any(|t| t.contains("Analyzer ready.")));
    }

    /// Upload reports render per-file outcomes and reload the document
    /// status only when something was indexed.
    #[test]
    fn test_upload_report_rendering_and_reload() {
        let mut app = app();
        update(&mut app, list_loaded(vec![entry("1", "A")]));

        let mut report = UploadReport::default();
        report.skipped.push((
            "~$draft.docx".to_string(),
            dia_core::upload::UploadSkipReason::LockFile,
        ));
        report.uploaded.push((
            "report.pdf".to_string(),
            dia_core::api::UploadResponse {
                message: Some("Indexed".to_string()),
                files_processed: vec!["report.pdf".to_string()],
                chunks_added: 12,
            },
        ));

        let effects = update(
            &mut app,
            UiEvent::Document(DocumentUiEvent::UploadFinished {
                session_id: "1".to_string(),
                report,
            }),
        );

        assert_eq!(
            effects,
            vec![UiEffect::LoadDocumentStatus {
                session_id: "1".to_string()
            }]
        );
        let texts = transcript_texts(&app);
        assert!(texts.iter().any(|t| t.contains("Skipped ~$draft.docx")));
        assert!(texts.iter().any(|t| t.contains("report.pdf: Indexed")));

        // All-skipped batch: no reload, explicit notice.
        let mut report = UploadReport::default();
        report.skipped.push((
            "huge.bin".to_string(),
            dia_core::upload::UploadSkipReason::TooLarge { size: 60 << 20 },
        ));
        let effects = update(
            &mut app,
            UiEvent::Document(DocumentUiEvent::UploadFinished {
                session_id: "1".to_string(),
                report,
            }),
        );
        assert!(effects.is_empty());
        assert!(
            transcript_texts(&app)
                .iter()
                .any(|t| t.contains("Nothing was uploaded."))
        );
    }

    /// Backend status updates the provider/model shown in the input
    /// border; announce renders the JSON.
    #[test]
    fn test_backend_status_updates_labels() {
        let mut app = app();
        let status = serde_json::json!({
            "llm_provider": "local",
            "model": "qwen2.5-7b",
            "model_loaded": true
        });

        update(
            &mut app,
            UiEvent::Backend(BackendUiEvent::StatusLoaded {
                status: status.clone(),
                announce: false,
            }),
        );
        assert_eq!(app.tui.llm_provider.as_deref(), Some("local"));
        assert_eq!(app.tui.llm_model.as_deref(), Some("qwen2.5-7b"));
        assert!(app.tui.transcript.cells().is_empty());

        update(
            &mut app,
            UiEvent::Backend(BackendUiEvent::StatusLoaded {
                status,
                announce: true,
            }),
        );
        assert!(transcript_texts(&app).iter().any(|t| t.contains("Backend status")));
    }

    /// Cleared chat wipes the transcript for the active session only.
    #[test]
    fn test_clear_chat_only_for_active_session() {
        let mut app = app();
        update(&mut app, list_loaded(vec![entry("1", "A"), entry("2", "B")]));
        app.tui.transcript.push_cell(HistoryCell::user("turn"));

        update(
            &mut app,
            UiEvent::Chat(ChatUiEvent::Cleared {
                session_id: "2".to_string(),
                message: "cleared".to_string(),
            }),
        );
        // Session 2 is not active; nothing happens.
        assert_eq!(app.tui.transcript.cells().len(), 1);

        update(
            &mut app,
            UiEvent::Chat(ChatUiEvent::Cleared {
                session_id: "1".to_string(),
                message: "Chat history cleared.".to_string(),
            }),
        );
        let texts = transcript_texts(&app);
        assert_eq!(app.tui.transcript.cells().len(), 1);
        assert!(texts[0].contains("Chat history cleared."));
    }
}
