//! Input feature slice.
//!
//! Single-line prompt with readline editing, submit history, and the
//! key handling for the main screen.

mod render;
mod state;
mod update;

pub use render::{INPUT_HEIGHT, render_input};
pub use state::InputState;
pub use update::{handle_main_key, handle_paste};
