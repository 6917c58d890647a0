//! Application state composition.
//!
//! This module defines the top-level state hierarchy for the TUI:
//! - `AppState` - combined state (`TuiState` + overlay)
//! - `TuiState` - non-overlay UI state (input, transcript, session, tasks)
//!
//! ## State Hierarchy
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── input: InputState          (prompt line, submit history)
//! │   ├── transcript: TranscriptState (cells, scroll)
//! │   ├── session: SessionState      (session list, active id, routing)
//! │   ├── task_seq: TaskSeq          (async task id generator)
//! │   └── tasks: Tasks               (single-slot task lifecycle)
//! └── overlay: Option<Overlay>       (modal overlays)
//! ```
//!
//! ## Split State Architecture
//!
//! State is split between `TuiState` (non-overlay) and `Option<Overlay>`:
//! overlay handlers take `&mut Option<Overlay>` together with a read-only
//! `&TuiState`, so they can transition overlays without borrow conflicts
//! while all `TuiState` writes stay in the reducer.

use dia_core::config::Config;

use crate::common::{TaskSeq, Tasks};
use crate::features::input::InputState;
use crate::features::session::SessionState;
use crate::features::transcript::TranscriptState;
use crate::overlays::Overlay;

/// Combined application state for the TUI.
pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(config: Config, base_url: String) -> Self {
        Self {
            tui: TuiState::new(config, base_url),
            overlay: None,
        }
    }
}

/// TUI application state (non-overlay).
pub struct TuiState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// User input state (text, cursor, history).
    pub input: InputState,
    /// Transcript display state (cells, scroll).
    pub transcript: TranscriptState,
    /// Session list, active session, and chat routing.
    pub session: SessionState,
    /// Task id sequence for async operations.
    pub task_seq: TaskSeq,
    /// Task lifecycle state for async operations.
    pub tasks: Tasks,
    /// Loaded configuration.
    pub config: Config,
    /// Resolved backend base URL (flag > env > config > default).
    pub base_url: String,
    /// Provider reported by the backend, for the input border.
    pub llm_provider: Option<String>,
    /// Model reported by the backend, for the input border.
    pub llm_model: Option<String>,
    /// Spinner animation frame counter.
    pub spinner_frame: usize,
}

impl TuiState {
    pub fn new(config: Config, base_url: String) -> Self {
        Self {
            should_quit: false,
            input: InputState::new(),
            transcript: TranscriptState::new(),
            session: SessionState::new(),
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            config,
            base_url,
            llm_provider: None,
            llm_model: None,
            spinner_frame: 0,
        }
    }
}
