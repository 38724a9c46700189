use crate::view_model::SessionView;
use crate::DropReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Busy,
}

/// Single-flight flag: at most one scene change is processed at a time.
/// Not reentrant; a second acquire while held fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuerySession {
    busy: bool,
}

impl QuerySession {
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn state(&self) -> SessionState {
        if self.busy {
            SessionState::Busy
        } else {
            SessionState::Idle
        }
    }

    /// Returns `false` (and changes nothing) if the session is already held.
    pub fn try_acquire(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    pub fn release(&mut self) {
        self.busy = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: QuerySession,
    active_scene: Option<String>,
    received: u64,
    processed: u64,
    dropped_busy: u64,
    dropped_malformed: u64,
    last_drop: Option<DropReason>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session: self.session.state(),
            active_scene: self.active_scene.clone(),
            received: self.received,
            processed: self.processed,
            dropped_busy: self.dropped_busy,
            dropped_malformed: self.dropped_malformed,
            last_drop: self.last_drop.clone(),
        }
    }

    pub fn session(&self) -> SessionState {
        self.session.state()
    }

    pub(crate) fn record_received(&mut self) {
        self.received += 1;
    }

    pub(crate) fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::Busy => self.dropped_busy += 1,
            DropReason::Malformed(_) => self.dropped_malformed += 1,
        }
        self.last_drop = Some(reason);
    }

    pub(crate) fn record_processed(&mut self) {
        self.processed += 1;
    }

    pub(crate) fn begin_scene(&mut self, name: &str) -> bool {
        if !self.session.try_acquire() {
            return false;
        }
        self.active_scene = Some(name.to_string());
        true
    }

    /// Returns `false` if no scene change was in progress.
    pub(crate) fn finish_scene(&mut self) -> bool {
        if !self.session.is_busy() {
            return false;
        }
        self.session.release();
        self.active_scene = None;
        true
    }
}
