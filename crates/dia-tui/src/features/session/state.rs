//! Session state.
//!
//! Caches the backend session list, tracks which session is active, and
//! reconciles the two after every list reload. The reconciliation rules
//! are ordered; the first one that applies wins.

use std::collections::HashSet;

use dia_core::api::{ChatType, DocumentStatus, SessionEntry};

use crate::mutations::SessionMutation;

/// How the active session routes chat requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionType {
    /// Crawled-domain session; chat goes through automatic routing.
    #[default]
    Domain,
    /// At least one processed document chunk; chat targets the document
    /// index.
    Document,
}

impl SessionType {
    /// Badge text shown next to the session name.
    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Domain => "Domain",
            SessionType::Document => "Document",
        }
    }
}

/// Outcome of reconciling the cached state against a fresh list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconcile {
    /// The active session is still listed; nothing to reload.
    Kept,
    /// A different session must become active; the caller runs the full
    /// selection sequence for it.
    Switched { session_id: String },
    /// The list is empty; a replacement session has to be created.
    NeedsCreate,
}

/// Client-side session cache.
///
/// `sessions` mirrors the backend list in backend order and is replaced
/// wholesale on every reload; nothing here survives a refresh except the
/// active pointer, and only when reconciliation keeps it.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Last loaded session list, in backend registry order.
    pub sessions: Vec<SessionEntry>,

    /// Id of the active session, if any. May briefly point at a session
    /// the backend dropped; reconciliation and the stale-select rule
    /// heal it.
    pub active_id: Option<String>,

    /// Display name of the active session, refreshed from every list
    /// reload.
    pub active_name: Option<String>,

    /// Derived from document status; never persisted.
    pub session_type: SessionType,

    /// Last loaded document counters for the active session.
    pub document_status: Option<DocumentStatus>,

    /// True while reconciliation has a create request in flight. Blocks
    /// a second create when another empty list arrives before the first
    /// create resolves.
    pub create_requested: bool,

    /// Session ids with a chat-family request in flight.
    waiting: HashSet<String>,

    /// Id to activate after the next list reload.
    pending_select: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.iter().any(|s| s.id == session_id)
    }

    pub fn is_active(&self, session_id: &str) -> bool {
        self.active_id.as_deref() == Some(session_id)
    }

    /// Looks up the display name of a listed session.
    pub fn name_of(&self, session_id: &str) -> Option<&str> {
        self.sessions
            .iter()
            .find(|s| s.id == session_id)
            .map(|s| s.name.as_str())
    }

    /// Makes `session_id` the active session and resets everything
    /// derived from the previous one. Callers reload history and
    /// document status afterwards.
    pub fn activate(&mut self, session_id: &str, name: &str) {
        self.active_id = Some(session_id.to_string());
        self.active_name = Some(name.to_string());
        self.session_type = SessionType::Domain;
        self.document_status = None;
    }

    /// Replaces the cached list and decides which session is active now.
    ///
    /// Rules, first match wins:
    /// 1. A recorded pending selection that survived the reload is
    ///    activated (a vanished one is discarded).
    /// 2. The currently active id, when still listed, stays active with
    ///    its name refreshed.
    /// 3. A non-empty list activates its first entry.
    /// 4. An empty list asks for a replacement session.
    pub fn apply_list(&mut self, sessions: Vec<SessionEntry>) -> Reconcile {
        self.sessions = sessions;

        if let Some(pending) = self.pending_select.take()
            && self.contains(&pending)
        {
            return Reconcile::Switched {
                session_id: pending,
            };
        }

        if let Some(active) = self.active_id.clone()
            && let Some(name) = self.name_of(&active)
        {
            self.active_name = Some(name.to_string());
            return Reconcile::Kept;
        }

        if let Some(first) = self.sessions.first() {
            return Reconcile::Switched {
                session_id: first.id.clone(),
            };
        }

        self.active_id = None;
        self.active_name = None;
        self.session_type = SessionType::Domain;
        self.document_status = None;
        Reconcile::NeedsCreate
    }

    /// The session that should become active after `target_id` is
    /// deleted: the next entry in list order, wrapping around, or `None`
    /// when the target is the sole session (or not listed at all).
    ///
    /// Computed before the delete call so the answer does not depend on
    /// what the backend does to the list in the meantime.
    pub fn delete_fallback(&self, target_id: &str) -> Option<String> {
        let idx = self.sessions.iter().position(|s| s.id == target_id)?;
        let len = self.sessions.len();
        for step in 1..len {
            let candidate = &self.sessions[(idx + step) % len];
            if candidate.id != target_id {
                return Some(candidate.id.clone());
            }
        }
        None
    }

    pub fn pending_select(&self) -> Option<&str> {
        self.pending_select.as_deref()
    }

    pub fn set_pending_select(&mut self, session_id: Option<String>) {
        self.pending_select = session_id;
    }

    // === Waiting flags ===

    pub fn is_waiting(&self, session_id: &str) -> bool {
        self.waiting.contains(session_id)
    }

    /// True while the active session has a chat-family request in
    /// flight; submission is disabled for it until the response lands.
    pub fn active_is_waiting(&self) -> bool {
        self.active_id
            .as_deref()
            .is_some_and(|id| self.waiting.contains(id))
    }

    pub fn set_waiting(&mut self, session_id: &str) {
        self.waiting.insert(session_id.to_string());
    }

    pub fn clear_waiting(&mut self, session_id: &str) {
        self.waiting.remove(session_id);
    }

    // === Document-status derivation ===

    /// Chat routing for the active session. `document` is only sent
    /// while the session is classified as a document session; everything
    /// else uses automatic routing.
    pub fn chat_type(&self) -> ChatType {
        match self.session_type {
            SessionType::Document => ChatType::Document,
            SessionType::Domain => ChatType::Auto,
        }
    }

    /// Reclassifies the session from fresh document counters.
    pub fn apply_document_status(&mut self, status: DocumentStatus) {
        self.session_type = if status.total_chunks > 0 {
            SessionType::Document
        } else {
            SessionType::Domain
        };
        self.document_status = Some(status);
    }

    /// Fail-safe reset when the status lookup failed: assume a domain
    /// session and drop the stale counters.
    pub fn clear_document_status(&mut self) {
        self.session_type = SessionType::Domain;
        self.document_status = None;
    }

    /// Applies a cross-slice session mutation.
    pub fn apply(&mut self, mutation: SessionMutation) {
        match mutation {
            SessionMutation::SetPendingSelect(session_id) => {
                self.pending_select = session_id;
            }
            SessionMutation::SetWaiting(session_id) => {
                self.waiting.insert(session_id);
            }
        }
    }
}
