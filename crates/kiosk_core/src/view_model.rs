use crate::{DropReason, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionView {
    pub session: SessionState,
    pub active_scene: Option<String>,
    pub received: u64,
    pub processed: u64,
    pub dropped_busy: u64,
    pub dropped_malformed: u64,
    pub last_drop: Option<DropReason>,
}
