#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Single-slot request kinds. Chat-style requests are tracked per
/// session instead (see `SessionState::waiting`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    SessionList,
    SessionCreate,
    SessionDelete,
    SessionRename,
    HistoryLoad,
    DocumentStatus,
    Upload,
    BackendStatus,
    ModelLoad,
}

#[derive(Debug, Clone)]
pub struct TaskStarted {
    pub id: TaskId,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: Box<E>,
}

/// Task lifecycle state (stored in AppState, mutated only by reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn on_started(&mut self, started: &TaskStarted) {
        self.active = Some(started.id);
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub session_list: TaskState,
    pub session_create: TaskState,
    pub session_delete: TaskState,
    pub session_rename: TaskState,
    pub history_load: TaskState,
    pub document_status: TaskState,
    pub upload: TaskState,
    pub backend_status: TaskState,
    pub model_load: TaskState,
}

impl Tasks {
    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::SessionList => &mut self.session_list,
            TaskKind::SessionCreate => &mut self.session_create,
            TaskKind::SessionDelete => &mut self.session_delete,
            TaskKind::SessionRename => &mut self.session_rename,
            TaskKind::HistoryLoad => &mut self.history_load,
            TaskKind::DocumentStatus => &mut self.document_status,
            TaskKind::Upload => &mut self.upload,
            TaskKind::BackendStatus => &mut self.backend_status,
            TaskKind::ModelLoad => &mut self.model_load,
        }
    }

    pub fn is_any_running(&self) -> bool {
        self.session_list.is_running()
            || self.session_create.is_running()
            || self.session_delete.is_running()
            || self.session_rename.is_running()
            || self.history_load.is_running()
            || self.document_status.is_running()
            || self.upload.is_running()
            || self.backend_status.is_running()
            || self.model_load.is_running()
    }

    /// True while any session mutation (create, delete, rename) is in
    /// flight. Used to hold off conflicting overlay submissions.
    pub fn is_mutating_sessions(&self) -> bool {
        self.session_create.is_running()
            || self.session_delete.is_running()
            || self.session_rename.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// next_id: ids increase monotonically.
    #[test]
    fn test_task_seq_monotonic() {
        let mut seq = TaskSeq::default();
        assert_eq!(seq.next_id(), TaskId(0));
        assert_eq!(seq.next_id(), TaskId(1));
        assert_eq!(seq.next_id(), TaskId(2));
    }

    /// finish_if_active: stale completion ids are ignored.
    #[test]
    fn test_finish_if_active_ignores_stale_id() {
        let mut state = TaskState::default();
        state.on_started(&TaskStarted { id: TaskId(7) });
        assert!(state.is_running());

        assert!(!state.finish_if_active(TaskId(3)));
        assert!(state.is_running());

        assert!(state.finish_if_active(TaskId(7)));
        assert!(!state.is_running());
    }

    /// is_any_running: reflects every slot.
    #[test]
    fn test_is_any_running() {
        let mut tasks = Tasks::default();
        assert!(!tasks.is_any_running());

        tasks
            .state_mut(TaskKind::DocumentStatus)
            .on_started(&TaskStarted { id: TaskId(1) });
        assert!(tasks.is_any_running());
        assert!(!tasks.is_mutating_sessions());

        tasks
            .state_mut(TaskKind::SessionDelete)
            .on_started(&TaskStarted { id: TaskId(2) });
        assert!(tasks.is_mutating_sessions());
    }
}
