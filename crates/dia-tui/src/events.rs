//! UI event types.
//!
//! Everything the reducer reacts to arrives as one of these: terminal
//! input, frame ticks, and the results of effects the runtime executed.
//! Backend results are grouped by feature so `update()` can hand each
//! family to a focused handler.

use dia_core::api::{
    ApiError, ChatResponse, DocumentStatus, HistoryMessage, InitializeResponse, SessionEntry,
    UploadResponse,
};
use dia_core::upload::UploadSkipReason;
use serde_json::Value;

use crate::common::{TaskCompleted, TaskKind, TaskStarted};

/// A single input to the reducer.
#[derive(Debug)]
pub enum UiEvent {
    /// Periodic timer tick; drives the spinner.
    Tick,
    /// Current terminal dimensions, injected before each render.
    Frame { width: u16, height: u16 },
    /// Raw terminal input.
    Terminal(crossterm::event::Event),

    /// A single-slot background task has started.
    TaskStarted { kind: TaskKind, started: TaskStarted },
    /// A single-slot background task has finished. The payload is the
    /// event to process if the task is still the active one.
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<UiEvent>,
    },

    Session(SessionUiEvent),
    Chat(ChatUiEvent),
    Document(DocumentUiEvent),
    Backend(BackendUiEvent),
}

/// Session lifecycle results.
#[derive(Debug)]
pub enum SessionUiEvent {
    /// A selection routed back from an overlay or effect; the reducer
    /// applies the activation rules (stale ids trigger a refresh).
    SelectRequested { session_id: String },
    ListLoaded { sessions: Vec<SessionEntry> },
    ListFailed { error: ApiError },
    Created { response: InitializeResponse },
    CreateFailed { error: ApiError },
    Deleted { message: String },
    DeleteFailed { error: ApiError },
    Renamed { message: String },
    RenameFailed { error: ApiError },
    HistoryLoaded {
        session_id: String,
        history: Vec<HistoryMessage>,
    },
    HistoryFailed { session_id: String, error: ApiError },
}

/// Chat and analysis results. Every variant names the session it was
/// issued for so the reducer can clear that session's waiting flag and
/// drop payloads that arrive after the user switched away.
#[derive(Debug)]
pub enum ChatUiEvent {
    Completed {
        session_id: String,
        response: ChatResponse,
    },
    Failed { session_id: String, error: ApiError },
    DomainAnalyzed { session_id: String, content: String },
    UrlsAnalyzed { session_id: String, content: String },
    AnalysisFailed { session_id: String, error: ApiError },
    Synced { session_id: String, result: String },
    SyncFailed { session_id: String, error: ApiError },
    Cleared { session_id: String, message: String },
    ClearFailed { session_id: String, error: ApiError },
}

/// Document pipeline results.
#[derive(Debug)]
pub enum DocumentUiEvent {
    StatusLoaded {
        session_id: String,
        status: DocumentStatus,
    },
    StatusFailed { session_id: String, error: ApiError },
    UploadFinished {
        session_id: String,
        report: UploadReport,
    },
    DocumentsCleared { session_id: String, message: String },
    DocumentsClearFailed { session_id: String, error: ApiError },
}

/// Backend diagnostics results.
#[derive(Debug)]
pub enum BackendUiEvent {
    StatusLoaded { status: Value, announce: bool },
    StatusFailed { error: ApiError, announce: bool },
    ModelLoaded { message: String },
    ModelLoadFailed { error: ApiError },
}

/// Per-file results of an upload batch. File names stay attached to
/// their outcomes so the transcript can report each member.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub uploaded: Vec<(String, UploadResponse)>,
    pub failed: Vec<(String, ApiError)>,
    pub skipped: Vec<(String, UploadSkipReason)>,
}

impl UploadReport {
    /// True when the batch contained nothing at all.
    pub fn is_empty(&self) -> bool {
        self.uploaded.is_empty() && self.failed.is_empty() && self.skipped.is_empty()
    }

    /// True when at least one file was indexed, meaning the session's
    /// document status is worth reloading.
    pub fn any_uploaded(&self) -> bool {
        !self.uploaded.is_empty()
    }
}
