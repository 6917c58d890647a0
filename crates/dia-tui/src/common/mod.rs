//! Shared building blocks used across features, overlays, and the runtime.

pub mod commands;
pub mod scrollbar;
pub mod task;
pub mod text;

pub use scrollbar::Scrollbar;
pub use task::{TaskCompleted, TaskId, TaskKind, TaskSeq, TaskStarted, Tasks};
pub use text::{sanitize_for_display, truncate_start_with_ellipsis, truncate_with_ellipsis};
