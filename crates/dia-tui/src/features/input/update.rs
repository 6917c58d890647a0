//! Input feature reducer.
//!
//! Handles keyboard input for the main screen: readline-style editing,
//! history navigation, transcript scrolling, overlay shortcuts, and chat
//! submission.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers as CrosstermKeyModifiers};

use super::state::InputState;
use crate::common::sanitize_for_display;
use crate::effects::UiEffect;
use crate::features::session::SessionState;
use crate::features::transcript::HistoryCell;
use crate::mutations::{SessionMutation, StateMutation, TranscriptMutation};
use crate::overlays::OverlayRequest;

/// Result type for key handlers.
type KeyResult = (Vec<UiEffect>, Vec<StateMutation>, Option<OverlayRequest>);

/// Handles paste events for input.
///
/// Pasted text is sanitized (ANSI escapes stripped, tabs expanded) and
/// flattened onto the single input line; embedded newlines become
/// spaces so a pasted URL list stays submittable.
pub fn handle_paste(input: &mut InputState, text: &str) {
    let sanitized = sanitize_for_display(text);
    let flattened = sanitized.replace(['\r', '\n'], " ");
    input.reset_navigation();
    input.insert_str(&flattened);
}

/// Handles main key input when no overlay is active.
pub fn handle_main_key(input: &mut InputState, session: &SessionState, key: KeyEvent) -> KeyResult {
    let mods = Modifiers::from(&key);

    // Try each handler category in order; first match wins
    handle_line_editing(input, key.code, &mods)
        .or_else(|| handle_word_editing(input, key.code, &mods))
        .or_else(|| handle_navigation(input, key.code, &mods))
        .or_else(|| handle_control_keys(input, key.code, &mods))
        .or_else(|| handle_overlays(input, key.code, &mods))
        .or_else(|| handle_submission(input, session, key.code, &mods))
        .unwrap_or_else(|| handle_default_input(input, key))
}

/// Parsed key modifiers for cleaner pattern matching.
struct Modifiers {
    ctrl: bool,
    shift: bool,
    alt: bool,
    super_key: bool,
}

impl Modifiers {
    fn from(key: &KeyEvent) -> Self {
        Self {
            ctrl: key.modifiers.contains(CrosstermKeyModifiers::CONTROL),
            shift: key.modifiers.contains(CrosstermKeyModifiers::SHIFT),
            alt: key.modifiers.contains(CrosstermKeyModifiers::ALT),
            super_key: key.modifiers.contains(CrosstermKeyModifiers::SUPER),
        }
    }

    fn none(&self) -> bool {
        !self.ctrl && !self.shift && !self.alt && !self.super_key
    }

    fn only_ctrl(&self) -> bool {
        self.ctrl && !self.shift && !self.alt && !self.super_key
    }

    fn only_alt(&self) -> bool {
        self.alt && !self.ctrl && !self.shift && !self.super_key
    }
}

// =============================================================================
// Line editing: Ctrl+A, Ctrl+E, Ctrl+U, Ctrl+K
// =============================================================================

fn handle_line_editing(
    input: &mut InputState,
    code: KeyCode,
    mods: &Modifiers,
) -> Option<KeyResult> {
    match code {
        // Ctrl+A: move to beginning of line
        KeyCode::Char('a') if mods.only_ctrl() => {
            input.move_home();
            Some((vec![], vec![], None))
        }
        // Ctrl+E: move to end of line
        KeyCode::Char('e') if mods.only_ctrl() => {
            input.move_end();
            Some((vec![], vec![], None))
        }
        // Ctrl+U: kill from cursor to beginning of line
        KeyCode::Char('u') if mods.only_ctrl() => {
            input.reset_navigation();
            input.delete_to_start();
            Some((vec![], vec![], None))
        }
        // Ctrl+K: kill from cursor to end of line
        KeyCode::Char('k') if mods.only_ctrl() => {
            input.reset_navigation();
            input.delete_to_end();
            Some((vec![], vec![], None))
        }
        _ => None,
    }
}

// =============================================================================
// Word editing: Ctrl+W, Alt+Backspace, Alt+f/b (word movement)
// =============================================================================

fn handle_word_editing(
    input: &mut InputState,
    code: KeyCode,
    mods: &Modifiers,
) -> Option<KeyResult> {
    match code {
        // Ctrl+W: delete word backward (common readline binding)
        KeyCode::Char('w') if mods.only_ctrl() => {
            input.reset_navigation();
            input.delete_word_left();
            Some((vec![], vec![], None))
        }
        // Alt+Backspace: delete word backward
        // (macOS sends this for Option+Delete)
        KeyCode::Backspace if mods.only_alt() => {
            input.reset_navigation();
            input.delete_word_left();
            Some((vec![], vec![], None))
        }
        // Alt+b or Alt+Left: move word backward
        KeyCode::Char('b') | KeyCode::Left if mods.only_alt() => {
            input.move_word_left();
            Some((vec![], vec![], None))
        }
        // Alt+f or Alt+Right: move word forward
        KeyCode::Char('f') | KeyCode::Right if mods.only_alt() => {
            input.move_word_right();
            Some((vec![], vec![], None))
        }
        _ => None,
    }
}

// =============================================================================
// Navigation: arrows, PageUp/Down, Home/End
// =============================================================================

fn handle_navigation(input: &mut InputState, code: KeyCode, mods: &Modifiers) -> Option<KeyResult> {
    match code {
        // PageUp/PageDown: scroll transcript
        KeyCode::PageUp => Some((
            vec![],
            vec![StateMutation::Transcript(TranscriptMutation::PageUp)],
            None,
        )),
        KeyCode::PageDown => Some((
            vec![],
            vec![StateMutation::Transcript(TranscriptMutation::PageDown)],
            None,
        )),
        // Ctrl+Home: scroll to top
        KeyCode::Home if mods.ctrl => Some((
            vec![],
            vec![StateMutation::Transcript(TranscriptMutation::ScrollToTop)],
            None,
        )),
        // Ctrl+End: scroll to bottom
        KeyCode::End if mods.ctrl => Some((
            vec![],
            vec![StateMutation::Transcript(
                TranscriptMutation::ScrollToBottom,
            )],
            None,
        )),
        KeyCode::Home if mods.none() => {
            input.move_home();
            Some((vec![], vec![], None))
        }
        KeyCode::End if mods.none() => {
            input.move_end();
            Some((vec![], vec![], None))
        }
        // Up/Down: walk submit history
        KeyCode::Up if mods.none() => {
            input.navigate_history_up();
            Some((vec![], vec![], None))
        }
        KeyCode::Down if mods.none() => {
            input.navigate_history_down();
            Some((vec![], vec![], None))
        }
        KeyCode::Left if mods.none() => {
            input.move_left();
            Some((vec![], vec![], None))
        }
        KeyCode::Right if mods.none() => {
            input.move_right();
            Some((vec![], vec![], None))
        }
        _ => None,
    }
}

// =============================================================================
// Control keys: Ctrl+C, Escape
// =============================================================================

fn handle_control_keys(
    input: &mut InputState,
    code: KeyCode,
    mods: &Modifiers,
) -> Option<KeyResult> {
    match code {
        // Ctrl+C: clear input, or quit when it is already empty
        KeyCode::Char('c') if mods.ctrl => {
            if input.is_empty() {
                Some((vec![UiEffect::Quit], vec![], None))
            } else {
                input.clear();
                Some((vec![], vec![], None))
            }
        }
        // Escape: clear input
        KeyCode::Esc => {
            input.clear();
            Some((vec![], vec![], None))
        }
        _ => None,
    }
}

// =============================================================================
// Overlays: command palette, session picker
// =============================================================================

fn handle_overlays(input: &mut InputState, code: KeyCode, mods: &Modifiers) -> Option<KeyResult> {
    match code {
        // `/` when input is empty: open command palette
        KeyCode::Char('/') if mods.none() && input.is_empty() => {
            Some((vec![], vec![], Some(OverlayRequest::CommandPalette)))
        }
        // Ctrl+P: open command palette
        KeyCode::Char('p') if mods.only_ctrl() => {
            Some((vec![], vec![], Some(OverlayRequest::CommandPalette)))
        }
        // Ctrl+S: open session picker
        KeyCode::Char('s') if mods.only_ctrl() => {
            Some((vec![], vec![], Some(OverlayRequest::SessionPicker)))
        }
        _ => None,
    }
}

// =============================================================================
// Submission: Enter key
// =============================================================================

fn handle_submission(
    input: &mut InputState,
    session: &SessionState,
    code: KeyCode,
    mods: &Modifiers,
) -> Option<KeyResult> {
    match code {
        KeyCode::Enter if !mods.shift && !mods.alt => Some(submit_input(input, session)),
        _ => None,
    }
}

/// Handles input submission.
///
/// While the active session is waiting for a reply, Enter does nothing
/// and the draft stays in the input line; there is no send queue. Blank
/// submissions are ignored the same way.
fn submit_input(input: &mut InputState, session: &SessionState) -> KeyResult {
    let Some(session_id) = session.active_id.clone() else {
        return (
            vec![],
            vec![StateMutation::Transcript(
                TranscriptMutation::AppendSystemMessage("No active session yet.".to_string()),
            )],
            None,
        );
    };

    if session.is_waiting(&session_id) {
        return (vec![], vec![], None);
    }

    let Some(message) = input.take_submission() else {
        return (vec![], vec![], None);
    };

    let effects = vec![UiEffect::SendChat {
        session_id: session_id.clone(),
        message: message.clone(),
        chat_type: session.chat_type(),
    }];
    let mutations = vec![
        StateMutation::Transcript(TranscriptMutation::AppendCell(HistoryCell::user(&message))),
        StateMutation::Session(SessionMutation::SetWaiting(session_id)),
    ];
    (effects, mutations, None)
}

// =============================================================================
// Default input handling: character insertion, Tab, Backspace, Delete
// =============================================================================

fn handle_default_input(input: &mut InputState, key: KeyEvent) -> KeyResult {
    let mods = Modifiers::from(&key);

    match key.code {
        // Tab: insert spaces (tabs cause rendering issues)
        KeyCode::Tab => {
            input.insert_str("    ");
            (vec![], vec![], None)
        }
        KeyCode::Backspace => {
            input.reset_navigation();
            input.delete_prev_char();
            (vec![], vec![], None)
        }
        KeyCode::Delete => {
            input.reset_navigation();
            input.delete_next_char();
            (vec![], vec![], None)
        }
        // Plain (possibly shifted) characters insert; `/` lands here too
        // once the line is non-empty
        KeyCode::Char(c) if !mods.ctrl && !mods.alt && !mods.super_key => {
            input.reset_navigation();
            input.insert_char(c);
            (vec![], vec![], None)
        }
        _ => (vec![], vec![], None),
    }
}
