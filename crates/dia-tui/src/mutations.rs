//! State mutation types.
//!
//! Key handlers and overlays run against a read-only view of the state;
//! they describe the changes they need as mutations and the reducer
//! applies them in order. Each variant targets exactly one state slice.

use dia_core::config::ProviderKind;

use crate::features::transcript::HistoryCell;

/// A deferred change to one slice of [`crate::state::TuiState`].
#[derive(Debug)]
pub enum StateMutation {
    Transcript(TranscriptMutation),
    Input(InputMutation),
    Session(SessionMutation),
    Config(ConfigMutation),
}

#[derive(Debug)]
pub enum TranscriptMutation {
    AppendCell(HistoryCell),
    AppendSystemMessage(String),
    AppendErrorMessage(String),
    Clear,
    PageUp,
    PageDown,
    ScrollToTop,
    ScrollToBottom,
}

#[derive(Debug)]
pub enum InputMutation {
    Clear,
    SetText(String),
}

#[derive(Debug)]
pub enum SessionMutation {
    /// Record (or clear) the session id the next list reload should
    /// activate. Set before deleting the active session so the fallback
    /// survives the round trip.
    SetPendingSelect(Option<String>),
    /// Mark a session as having a chat-family request in flight. Issued
    /// alongside every chat, analysis, sync, and clear-chat effect; the
    /// reducer clears the flag when the response lands.
    SetWaiting(String),
}

#[derive(Debug)]
pub enum ConfigMutation {
    /// Change the provider used for newly created sessions.
    SetProvider(ProviderKind),
}
