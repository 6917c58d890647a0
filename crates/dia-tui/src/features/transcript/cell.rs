use std::sync::atomic::{AtomicU64, Ordering};

use unicode_width::UnicodeWidthStr;

use super::style::{Style, StyledLine, StyledSpan};
use super::wrap::{render_prefixed_content, wrap_chars, wrap_text};
use crate::common::sanitize_for_display;

/// Global counter for generating unique cell IDs.
static CELL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a transcript cell.
///
/// IDs are monotonically increasing and unique within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(pub u64);

impl CellId {
    /// Generates a new unique cell ID.
    pub fn new() -> Self {
        CellId(CELL_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for CellId {
    fn default() -> Self {
        Self::new()
    }
}

/// A logical unit in the transcript.
///
/// Each cell is a complete conceptual block: a user message, a backend
/// answer, a status banner, an error, or a JSON dump. Cells store
/// unwrapped text; wrapping happens in `display_lines`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryCell {
    /// User input message.
    User { id: CellId, content: String },

    /// Backend answer. `sources` lists retrieval attributions for
    /// document answers (empty for domain answers).
    Assistant {
        id: CellId,
        content: String,
        sources: Vec<String>,
    },

    /// System message or informational banner.
    System { id: CellId, content: String },

    /// Error surfaced in the transcript (request failures, stale
    /// session notices, rejected uploads).
    Error { id: CellId, content: String },

    /// Pretty-printed JSON block with a title (backend status).
    Json {
        id: CellId,
        title: String,
        pretty: String,
    },
}

impl HistoryCell {
    /// Returns the cell's unique ID.
    pub fn id(&self) -> CellId {
        match self {
            HistoryCell::User { id, .. } => *id,
            HistoryCell::Assistant { id, .. } => *id,
            HistoryCell::System { id, .. } => *id,
            HistoryCell::Error { id, .. } => *id,
            HistoryCell::Json { id, .. } => *id,
        }
    }

    /// Creates a new user cell.
    pub fn user(content: impl Into<String>) -> Self {
        HistoryCell::User {
            id: CellId::new(),
            content: content.into(),
        }
    }

    /// Creates an answer cell without source attributions.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::assistant_with_sources(content, Vec::new())
    }

    /// Creates an answer cell with source attributions.
    pub fn assistant_with_sources(content: impl Into<String>, sources: Vec<String>) -> Self {
        HistoryCell::Assistant {
            id: CellId::new(),
            content: content.into(),
            sources,
        }
    }

    /// Creates a system/info cell.
    pub fn system(content: impl Into<String>) -> Self {
        HistoryCell::System {
            id: CellId::new(),
            content: content.into(),
        }
    }

    /// Creates an error cell.
    pub fn error(content: impl Into<String>) -> Self {
        HistoryCell::Error {
            id: CellId::new(),
            content: content.into(),
        }
    }

    /// Creates a titled JSON cell from an already pretty-printed body.
    pub fn json(title: impl Into<String>, pretty: impl Into<String>) -> Self {
        HistoryCell::Json {
            id: CellId::new(),
            title: title.into(),
            pretty: pretty.into(),
        }
    }

    /// Renders this cell into display lines for the given width.
    pub fn display_lines(&self, width: usize) -> Vec<StyledLine> {
        match self {
            HistoryCell::User { content, .. } => {
                render_prefixed_content("│ ", content, width, Style::UserPrefix, Style::User, true)
            }
            HistoryCell::Assistant {
                content, sources, ..
            } => {
                let mut lines = Vec::new();
                for raw_line in content.split('\n') {
                    let safe_line = sanitize_for_display(raw_line);
                    for row in wrap_text(&safe_line, width.max(10)) {
                        lines.push(StyledLine {
                            spans: vec![StyledSpan {
                                text: row,
                                style: Style::Assistant,
                            }],
                        });
                    }
                }
                if !sources.is_empty() {
                    let attribution = format!("Sources: {}", sources.join(", "));
                    for row in wrap_text(&attribution, width.max(10)) {
                        lines.push(StyledLine {
                            spans: vec![StyledSpan {
                                text: row,
                                style: Style::Source,
                            }],
                        });
                    }
                }
                lines
            }
            HistoryCell::System { content, .. } => render_prefixed_content(
                "System: ",
                content,
                width,
                Style::SystemPrefix,
                Style::System,
                false,
            ),
            HistoryCell::Error { content, .. } => render_prefixed_content(
                "Error: ",
                content,
                width,
                Style::ErrorPrefix,
                Style::Error,
                false,
            ),
            HistoryCell::Json { title, pretty, .. } => {
                let mut lines = vec![StyledLine {
                    spans: vec![StyledSpan {
                        text: title.clone(),
                        style: Style::JsonTitle,
                    }],
                }];
                let content_width = width.saturating_sub(2).max(10);
                for raw_line in pretty.split('\n') {
                    let safe_line = sanitize_for_display(raw_line);
                    let rows = if safe_line.width() > content_width {
                        wrap_chars(&safe_line, content_width)
                    } else {
                        vec![safe_line.into_owned()]
                    };
                    for row in rows {
                        lines.push(StyledLine {
                            spans: vec![
                                StyledSpan {
                                    text: "  ".to_string(),
                                    style: Style::Plain,
                                },
                                StyledSpan {
                                    text: row,
                                    style: Style::Json,
                                },
                            ],
                        });
                    }
                }
                lines
            }
        }
    }
}
