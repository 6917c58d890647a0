/// A styled span of text (UI-agnostic).
///
/// This is a minimal representation that can be converted to
/// ratatui Span/Line types at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub style: Style,
}

/// A line of styled spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    /// Creates an empty line.
    pub fn empty() -> Self {
        StyledLine { spans: vec![] }
    }

    /// Concatenated text content, used in tests.
    #[cfg(test)]
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

/// Semantic style identifiers (UI-agnostic).
///
/// These are translated to actual terminal styles by the renderer.
/// This keeps the transcript module free of terminal dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// No styling.
    Plain,
    /// User message prefix ("│ ").
    UserPrefix,
    /// User message content (italic).
    User,
    /// Assistant answer content.
    Assistant,
    /// Source attribution under document answers.
    Source,
    /// System message prefix.
    SystemPrefix,
    /// System message content.
    System,
    /// Error message prefix.
    ErrorPrefix,
    /// Error message content.
    Error,
    /// Title line above a JSON dump.
    JsonTitle,
    /// Pretty-printed JSON content (backend status).
    Json,
}
