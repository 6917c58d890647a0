//! Session feature slice.
//!
//! Owns the cached backend session list, the active-session pointer, and
//! the reconciliation rules that keep the two consistent across reloads.

mod state;

pub use state::{Reconcile, SessionState, SessionType};
