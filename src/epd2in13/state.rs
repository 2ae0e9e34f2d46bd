/// Where a display session is in its lifecycle
///
/// ```text
/// Uninitialized -> Resetting -> Configuring -> Idle <-> WritingFrame
///                                               Idle <-> Refreshing
///                                               Idle  -> Sleeping
/// ```
///
/// A failed operation leaves the state that was entered last, only
/// `initialize` leaves such a state again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Resetting,
    Configuring,
    Idle,
    WritingFrame,
    Refreshing,
    /// Deep sleep, RAM content is kept but the controller needs a reset to wake up
    Sleeping,
}

impl SessionState {
    /// RAM may be addressed and written
    pub fn accepts_writes(self) -> bool {
        matches!(self, SessionState::Idle | SessionState::WritingFrame)
    }

    /// A refresh may be started: RAM holds a complete frame
    pub fn accepts_refresh(self) -> bool {
        self == SessionState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_idle_refreshes() {
        assert!(SessionState::Idle.accepts_refresh());
        assert!(!SessionState::WritingFrame.accepts_refresh());
        assert!(!SessionState::Refreshing.accepts_refresh());
    }

    #[test]
    fn writes_need_a_configured_controller() {
        assert!(SessionState::Idle.accepts_writes());
        assert!(SessionState::WritingFrame.accepts_writes());
        for state in [
            SessionState::Uninitialized,
            SessionState::Resetting,
            SessionState::Configuring,
            SessionState::Refreshing,
            SessionState::Sleeping,
        ] {
            assert!(!state.accepts_writes(), "{state:?}");
        }
    }
}
