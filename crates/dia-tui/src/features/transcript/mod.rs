//! Transcript feature: history cells, scroll state, and rendering.

pub mod cell;
pub mod render;
pub mod state;
pub mod style;
pub mod wrap;

pub use cell::{CellId, HistoryCell};
pub use render::{total_line_count, transcript_lines};
pub use state::{ScrollMode, TranscriptState};
