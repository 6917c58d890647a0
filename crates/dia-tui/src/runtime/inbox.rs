//! Inbox channel types.
//!
//! Handlers send their results here; the runtime drains the receiver
//! once per loop iteration. One channel for everything keeps the event
//! loop free of per-operation receivers.

use tokio::sync::mpsc;

use crate::events::UiEvent;

pub(crate) type UiEventSender = mpsc::UnboundedSender<UiEvent>;
pub(crate) type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;
