//! Single-line input state with readline-style editing and history.

use crate::mutations::InputMutation;

/// Input line state: text, a char-index cursor, and submit history.
///
/// The cursor is tracked in char units; byte offsets are derived at the
/// edit site so multi-byte characters stay intact.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    text: String,
    cursor: usize,
    pub history: Vec<String>,
    history_index: Option<usize>,
    draft: Option<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in char units.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replaces the content and puts the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    // === Editing ===

    pub fn insert_char(&mut self, ch: char) {
        let byte_idx = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_idx, ch);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let byte_idx = char_to_byte_index(&self.text, self.cursor);
        self.text.insert_str(byte_idx, text);
        self.cursor += text.chars().count();
    }

    /// Backspace semantics.
    pub fn delete_prev_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = char_to_byte_index(&self.text, self.cursor - 1);
        let end = char_to_byte_index(&self.text, self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
    }

    /// Delete key semantics.
    pub fn delete_next_char(&mut self) {
        let char_len = self.text.chars().count();
        if self.cursor >= char_len {
            return;
        }
        let start = char_to_byte_index(&self.text, self.cursor);
        let end = char_to_byte_index(&self.text, self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    /// Deletes the segment immediately left of the cursor (Ctrl+W,
    /// Alt+Backspace). Segments follow char class, so URLs and session
    /// ids are removed piece by piece rather than all at once.
    pub fn delete_word_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let chars: Vec<char> = self.text.chars().collect();
        let target = scan_left_segment(&chars, self.cursor.min(chars.len()));

        let start = char_to_byte_index(&self.text, target);
        let end = char_to_byte_index(&self.text, self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor = target;
    }

    /// Ctrl+U: deletes from the start of the line to the cursor.
    pub fn delete_to_start(&mut self) {
        let end = char_to_byte_index(&self.text, self.cursor);
        self.text.replace_range(..end, "");
        self.cursor = 0;
    }

    /// Ctrl+K: deletes from the cursor to the end of the line.
    pub fn delete_to_end(&mut self) {
        let start = char_to_byte_index(&self.text, self.cursor);
        self.text.truncate(start);
    }

    // === Cursor movement ===

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        let char_len = self.text.chars().count();
        if self.cursor < char_len {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    pub fn move_word_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let chars: Vec<char> = self.text.chars().collect();
        self.cursor = scan_left_segment(&chars, self.cursor.min(chars.len()));
    }

    pub fn move_word_right(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        if self.cursor >= chars.len() {
            return;
        }
        self.cursor = scan_right_segment(&chars, self.cursor);
    }

    // === Submission ===

    /// Takes the trimmed input for submission, pushing it to history
    /// and clearing the line. Whitespace-only input returns None and
    /// leaves the line untouched.
    pub fn take_submission(&mut self) -> Option<String> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let submitted = trimmed.to_string();
        if self.history.last() != Some(&submitted) {
            self.history.push(submitted.clone());
        }
        self.reset_navigation();
        self.clear();
        Some(submitted)
    }

    // === History navigation ===

    pub fn reset_navigation(&mut self) {
        self.history_index = None;
        self.draft = None;
    }

    /// Up key: recalls the previous history entry, stashing whatever
    /// was typed as a draft on first entry.
    pub fn navigate_history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        match self.history_index {
            None => {
                self.draft = Some(self.text.clone());
                let index = self.history.len() - 1;
                self.history_index = Some(index);
                let entry = self.history[index].clone();
                self.set_text(&entry);
            }
            Some(index) if index > 0 => {
                let index = index - 1;
                self.history_index = Some(index);
                let entry = self.history[index].clone();
                self.set_text(&entry);
            }
            Some(_) => {}
        }
    }

    /// Down key: moves towards the newest entry, restoring the stashed
    /// draft when walking past it.
    pub fn navigate_history_down(&mut self) {
        let Some(index) = self.history_index else {
            return;
        };
        if index + 1 < self.history.len() {
            let index = index + 1;
            self.history_index = Some(index);
            let entry = self.history[index].clone();
            self.set_text(&entry);
        } else {
            self.history_index = None;
            let draft = self.draft.take().unwrap_or_default();
            self.set_text(&draft);
        }
    }

    pub fn is_navigating_history(&self) -> bool {
        self.history_index.is_some()
    }

    pub fn apply(&mut self, mutation: InputMutation) {
        match mutation {
            InputMutation::Clear => self.clear(),
            InputMutation::SetText(text) => self.set_text(&text),
        }
    }
}

// === Char class scanning ===

/// Word characters are alphanumerics and underscore. Punctuation forms
/// its own segments so path and URL components edit individually.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CharClass {
    Whitespace,
    Word,
    Punct,
}

fn char_class(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Whitespace
    } else if is_word_char(c) {
        CharClass::Word
    } else {
        CharClass::Punct
    }
}

fn scan_left_segment(chars: &[char], mut idx: usize) -> usize {
    if idx == 0 {
        return 0;
    }
    let class = char_class(chars[idx - 1]);
    while idx > 0 && char_class(chars[idx - 1]) == class {
        idx -= 1;
    }
    idx
}

fn scan_right_segment(chars: &[char], mut idx: usize) -> usize {
    if idx >= chars.len() {
        return idx;
    }
    let class = char_class(chars[idx]);
    while idx < chars.len() && char_class(chars[idx]) == class {
        idx += 1;
    }
    idx
}

fn char_to_byte_index(text: &str, col: usize) -> usize {
    if col == 0 {
        return 0;
    }
    text.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
