//! Overlay modules for the TUI.
//!
//! Overlays are modal UI components that temporarily take over keyboard
//! input. Each overlay is self-contained: it owns its state, key
//! handler, and render function.
//!
//! ## Module Structure
//!
//! - `command_palette.rs`: Command palette (Ctrl+P or `/` when input empty)
//! - `session_picker.rs`: Session list picker (Ctrl+S)
//! - `provider_picker.rs`: Provider selection for new sessions
//! - `rename.rs`: Session rename overlay
//! - `delete_confirm.rs`: Session delete confirmation
//! - `prompt.rs`: Single-line argument prompt (analyze, urls, upload)
//! - `render_utils.rs`: Popup chrome shared by all overlays
//!
//! ## Extension Trait
//!
//! `OverlayExt` provides convenience methods for `Option<Overlay>` to
//! encapsulate the common patterns used in the reducer.

pub mod command_palette;
pub mod delete_confirm;
pub mod prompt;
pub mod provider_picker;
pub mod rename;
pub mod render_utils;
pub mod session_picker;

pub use command_palette::CommandPaletteState;
use crossterm::event::KeyEvent;
pub use delete_confirm::DeleteConfirmState;
pub use prompt::{PromptKind, PromptState};
pub use provider_picker::ProviderPickerState;
use ratatui::Frame;
use ratatui::layout::Rect;
pub use rename::RenameState;
pub use session_picker::SessionPickerState;

use crate::effects::UiEffect;
use crate::mutations::StateMutation;
use crate::state::TuiState;

// ============================================================================
// OverlayRequest / OverlayTransition / OverlayUpdate
// ============================================================================

/// Requests to open a new overlay. Targets that need the active session
/// (rename, delete) are resolved by the reducer when it opens them.
#[derive(Debug)]
pub enum OverlayRequest {
    CommandPalette,
    SessionPicker,
    ProviderPicker,
    Rename,
    DeleteConfirm,
    Prompt(PromptKind),
}

/// Transition returned by overlay key handlers.
#[derive(Debug)]
pub enum OverlayTransition {
    Stay,
    Close,
    Open(OverlayRequest),
}

/// Update returned by overlay key handlers.
#[derive(Debug)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    pub mutations: Vec<StateMutation>,
    pub effects: Vec<UiEffect>,
}

impl OverlayUpdate {
    fn new(transition: OverlayTransition) -> Self {
        Self {
            transition,
            mutations: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn stay() -> Self {
        Self::new(OverlayTransition::Stay)
    }

    pub fn close() -> Self {
        Self::new(OverlayTransition::Close)
    }

    pub fn open(request: OverlayRequest) -> Self {
        Self::new(OverlayTransition::Open(request))
    }

    #[must_use]
    pub fn with_mutations(mut self, mutations: Vec<StateMutation>) -> Self {
        self.mutations = mutations;
        self
    }

    #[must_use]
    pub fn with_ui_effects(mut self, effects: Vec<UiEffect>) -> Self {
        self.effects = effects;
        self
    }
}

// ============================================================================
// Overlay
// ============================================================================

#[derive(Debug)]
pub enum Overlay {
    CommandPalette(CommandPaletteState),
    SessionPicker(SessionPickerState),
    ProviderPicker(ProviderPickerState),
    Rename(RenameState),
    DeleteConfirm(DeleteConfirmState),
    Prompt(PromptState),
}

impl Overlay {
    pub fn render(&self, frame: &mut Frame, area: Rect, input_y: u16) {
        match self {
            Overlay::CommandPalette(p) => p.render(frame, area, input_y),
            Overlay::SessionPicker(p) => p.render(frame, area, input_y),
            Overlay::ProviderPicker(p) => p.render(frame, area, input_y),
            Overlay::Rename(r) => r.render(frame, area, input_y),
            Overlay::DeleteConfirm(d) => d.render(frame, area, input_y),
            Overlay::Prompt(p) => p.render(frame, area, input_y),
        }
    }

    pub fn handle_key(&mut self, tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        match self {
            Overlay::CommandPalette(p) => p.handle_key(tui, key),
            Overlay::SessionPicker(p) => p.handle_key(tui, key),
            Overlay::ProviderPicker(p) => p.handle_key(tui, key),
            Overlay::Rename(r) => r.handle_key(tui, key),
            Overlay::DeleteConfirm(d) => d.handle_key(tui, key),
            Overlay::Prompt(p) => p.handle_key(tui, key),
        }
    }
}

/// Routes a key press to the active overlay, if any. The caller applies
/// the returned update (mutations first, then the transition).
pub fn handle_overlay_key(
    tui: &TuiState,
    overlay: &mut Option<Overlay>,
    key: KeyEvent,
) -> Option<OverlayUpdate> {
    overlay.as_mut().map(|active| active.handle_key(tui, key))
}

// ============================================================================
// OverlayExt - Extension trait for Option<Overlay>
// ============================================================================

/// Extension trait for `Option<Overlay>` providing convenience render helpers.
pub trait OverlayExt {
    /// Renders the overlay if one is active.
    fn render(&self, frame: &mut Frame, area: Rect, input_y: u16);
}

impl OverlayExt for Option<Overlay> {
    fn render(&self, frame: &mut Frame, area: Rect, input_y: u16) {
        if let Some(overlay) = self {
            overlay.render(frame, area, input_y);
        }
    }
}
