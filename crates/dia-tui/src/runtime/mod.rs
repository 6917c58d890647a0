//! TUI runtime: owns the terminal, runs the event loop, executes
//! effects.
//!
//! This is the boundary where side effects happen. The reducer stays
//! pure and produces effects; this module turns them into HTTP calls,
//! filesystem writes, and spawned tasks.
//!
//! ## Inbox pattern
//!
//! Handlers send `UiEvent`s to `inbox_tx`; the runtime drains
//! `inbox_rx` every loop iteration. Tracked operations get a
//! `TaskStarted`/`TaskCompleted` envelope so the reducer can drop
//! superseded completions; chat-family requests are tracked per session
//! in `SessionState` instead and go through `spawn_effect`.

mod handlers;
mod inbox;

use std::future::Future;
use std::io::Stdout;

use anyhow::{Context, Result};
use crossterm::event;
use dia_core::api::ApiClient;
use dia_core::config::{Config, paths};
use inbox::{UiEventReceiver, UiEventSender};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::common::{TaskCompleted, TaskKind, TaskStarted};
use crate::effects::UiEffect;
use crate::events::{SessionUiEvent, UiEvent};
use crate::state::AppState;
use crate::{render, terminal, update};

/// Target frame interval while something is running (~60fps).
pub const FRAME_DURATION: std::time::Duration = std::time::Duration::from_millis(16);

/// Poll interval when nothing is happening. Longer timeout keeps the
/// idle CPU cost near zero.
pub const IDLE_POLL_DURATION: std::time::Duration = std::time::Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Terminal state is restored on drop,
/// panic, and Ctrl+C.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    client: ApiClient,
    /// Handlers send results here.
    inbox_tx: UiEventSender,
    /// Drained once per loop iteration.
    inbox_rx: UiEventReceiver,
    last_tick: std::time::Instant,
    /// Last terminal input, for fast polling while the user interacts.
    last_terminal_event: std::time::Instant,
}

impl TuiRuntime {
    pub fn new(config: Config, base_url: String) -> Result<Self> {
        // Panic hook before entering the alternate screen.
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let client = ApiClient::new(base_url.clone());
        let state = AppState::new(config, base_url);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let now = std::time::Instant::now();
        Ok(Self {
            terminal,
            state,
            client,
            inbox_tx,
            inbox_rx,
            last_tick: now,
            last_terminal_event: now,
        })
    }

    /// Runs the main event loop until the user quits.
    pub fn run(&mut self, initial_effects: Vec<UiEffect>) -> Result<()> {
        terminal::enable_input_features()?;
        self.execute_effects(initial_effects);

        let result = self.event_loop();

        let _ = terminal::disable_input_features();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.tui.should_quit {
            let mut events = self.collect_events()?;

            // Frame goes first so layout and scroll deltas are applied
            // before anything renders.
            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                if matches!(&event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = std::time::Instant::now();
                }

                // Only Tick marks the frame dirty; terminal events batch
                // their renders to the next tick.
                let marks_dirty = matches!(&event, UiEvent::Tick);
                let effects = update::update(&mut self.state, event);
                if marks_dirty {
                    dirty = true;
                }
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    /// Collects pending events: inbox results, terminal input, and the
    /// tick. Polls fast while work is in flight, slow when idle.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let recent_terminal_activity = self.last_terminal_event.elapsed() < IDLE_POLL_DURATION;
        let needs_fast_poll = self.state.tui.session.active_is_waiting()
            || self.state.tui.tasks.is_any_running()
            || recent_terminal_activity;
        let tick_interval = if needs_fast_poll {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(event) = self.inbox_rx.try_recv() {
            events.push(event);
        }

        // Block until the next tick is due unless there is already work
        // to process.
        let time_until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());
        let poll_duration = if events.is_empty() {
            time_until_tick
        } else {
            std::time::Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            // Drain whatever else is buffered without blocking.
            while event::poll(std::time::Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = std::time::Instant::now();
        }

        Ok(events)
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn dispatch_event(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        if !effects.is_empty() {
            self.execute_effects(effects);
        }
    }

    /// Spawns an untracked async handler and routes its result through
    /// the inbox. Used for chat-family requests, whose in-flight state
    /// lives in `SessionState` as a per-session waiting flag.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    /// Spawns a tracked task with the TaskStarted/TaskCompleted
    /// lifecycle. A fresh id is minted per spawn; the reducer drops
    /// completions whose id was superseded.
    fn spawn_task<F, Fut>(&mut self, kind: TaskKind, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let id = self.state.tui.task_seq.next_id();
        let tx = self.inbox_tx.clone();
        let _ = tx.send(UiEvent::TaskStarted {
            kind,
            started: TaskStarted { id },
        });
        tokio::spawn(async move {
            let inner = f().await;
            let completed = TaskCompleted {
                id,
                result: Box::new(inner),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        let client = self.client.clone();
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }

            // Session lifecycle (tracked tasks)
            UiEffect::RefreshSessions => {
                self.spawn_task(TaskKind::SessionList, move || handlers::sessions_load(client));
            }
            UiEffect::CreateSession { name, provider } => {
                self.spawn_task(TaskKind::SessionCreate, move || {
                    handlers::session_create(client, name, provider)
                });
            }
            UiEffect::DeleteSession { session_id } => {
                self.spawn_task(TaskKind::SessionDelete, move || {
                    handlers::session_delete(client, session_id)
                });
            }
            UiEffect::RenameSession { session_id, name } => {
                self.spawn_task(TaskKind::SessionRename, move || {
                    handlers::session_rename(client, session_id, name)
                });
            }
            UiEffect::SelectSession { session_id } => {
                // Pure state transition; goes straight back through the
                // reducer.
                self.dispatch_event(UiEvent::Session(SessionUiEvent::SelectRequested {
                    session_id,
                }));
            }
            UiEffect::LoadHistory { session_id } => {
                self.spawn_task(TaskKind::HistoryLoad, move || {
                    handlers::history_load(client, session_id)
                });
            }

            // Chat family (per-session waiting flag, untracked)
            UiEffect::SendChat {
                session_id,
                message,
                chat_type,
            } => {
                self.spawn_effect(move || handlers::chat_send(client, session_id, message, chat_type));
            }
            UiEffect::AnalyzeDomain { session_id, domain } => {
                self.spawn_effect(move || handlers::analyze_domain(client, session_id, domain));
            }
            UiEffect::AnalyzeUrls { session_id, urls } => {
                self.spawn_effect(move || handlers::analyze_urls(client, session_id, urls));
            }
            UiEffect::SyncDomain { session_id } => {
                self.spawn_effect(move || handlers::sync_domain(client, session_id));
            }
            UiEffect::ClearChat { session_id } => {
                self.spawn_effect(move || handlers::clear_chat(client, session_id));
            }

            // Documents
            UiEffect::LoadDocumentStatus { session_id } => {
                self.spawn_task(TaskKind::DocumentStatus, move || {
                    handlers::document_status(client, session_id)
                });
            }
            UiEffect::UploadFiles { session_id, paths } => {
                self.spawn_task(TaskKind::Upload, move || {
                    handlers::upload_batch(client, session_id, paths)
                });
            }
            UiEffect::ClearDocuments { session_id } => {
                self.spawn_effect(move || handlers::clear_documents(client, session_id));
            }

            // Backend
            UiEffect::LoadBackendStatus { announce } => {
                self.spawn_task(TaskKind::BackendStatus, move || {
                    handlers::backend_status(client, announce)
                });
            }
            UiEffect::LoadModel => {
                self.spawn_task(TaskKind::ModelLoad, move || handlers::model_load(client));
            }

            // Config
            UiEffect::PersistProvider(provider) => {
                // State already reflects the choice; a write failure only
                // loses persistence across restarts.
                if let Err(error) = Config::save_provider(provider) {
                    tracing::warn!(error = %error, "failed to persist provider");
                }
            }
            UiEffect::OpenConfig => {
                let config_path = paths::config_path();
                if config_path.exists() {
                    let _ = open::that(&config_path);
                }
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
