//! Effect handlers for the TUI runtime.
//!
//! Handlers are pure async functions that perform the I/O for one
//! effect and return the resulting `UiEvent`. The runtime spawns them
//! and routes the result through the inbox; they never touch state.

pub mod backend;
pub mod chat;
pub mod documents;
pub mod sessions;

pub use backend::*;
pub use chat::*;
pub use documents::*;
pub use sessions::*;
