//! UI effect types.
//!
//! Effects describe side effects for the runtime to perform: backend
//! requests, config writes, process-level actions. The reducer returns
//! them from `update()` instead of doing the work itself, which keeps
//! the reducer pure and unit-testable.

use std::path::PathBuf;

use dia_core::api::ChatType;
use dia_core::config::ProviderKind;

/// An action the runtime performs on behalf of the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEffect {
    /// Exit the event loop after the current iteration.
    Quit,

    // === Sessions ===
    /// Reload the session list from the backend.
    RefreshSessions,
    /// Create a backend session.
    CreateSession {
        name: String,
        provider: ProviderKind,
    },
    /// Delete a backend session.
    DeleteSession { session_id: String },
    /// Rename a backend session.
    RenameSession { session_id: String, name: String },
    /// Route a selection back through the reducer's activation rules.
    /// Overlays cannot mutate session state directly, so picking a
    /// session emits this instead.
    SelectSession { session_id: String },
    /// Load the chat history of a session.
    LoadHistory { session_id: String },

    // === Chat & analysis ===
    /// Send a chat message for a session.
    SendChat {
        session_id: String,
        message: String,
        chat_type: ChatType,
    },
    /// Start a domain crawl-and-summarize run.
    AnalyzeDomain { session_id: String, domain: String },
    /// Analyze an explicit list of URLs.
    AnalyzeUrls {
        session_id: String,
        urls: Vec<String>,
    },
    /// Re-crawl the session's domain.
    SyncDomain { session_id: String },
    /// Clear the session's chat history on the backend.
    ClearChat { session_id: String },

    // === Documents ===
    /// Reload the document status used to classify the session.
    LoadDocumentStatus { session_id: String },
    /// Upload a batch of files, applying local guards first.
    UploadFiles {
        session_id: String,
        paths: Vec<PathBuf>,
    },
    /// Remove all indexed documents for a session.
    ClearDocuments { session_id: String },

    // === Backend & housekeeping ===
    /// Fetch backend diagnostics. `announce` renders the result in the
    /// transcript; without it the response only feeds the status line.
    LoadBackendStatus { announce: bool },
    /// Ask the backend to load its local model.
    LoadModel,
    /// Persist the default provider to the config file.
    PersistProvider(ProviderKind),
    /// Open the config file with the platform handler.
    OpenConfig,
}
