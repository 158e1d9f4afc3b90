/// Session state as observed from outside the fetch task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Acquiring,
    Failed(String),
}

impl SessionStatus {
    pub fn is_acquiring(&self) -> bool {
        matches!(self, SessionStatus::Acquiring)
    }

    /// Label of the control toggling the session from this state.
    pub fn toggle_label(&self) -> &'static str {
        if self.is_acquiring() {
            "Stop Camera"
        } else {
            "Start Camera"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyAcquiring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    AlreadyIdle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Started,
    Stopped,
}
