//! Session lifecycle state machine.

/// Lifecycle state of a client session.
///
/// A session is never restarted in place: `Stopped` is terminal, and a
/// reconnect means a fresh channel with a fresh session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Session has been constructed but the handshake has not run.
    #[default]
    Created,
    /// Handshake sent; session is live on its channel.
    Running,
    /// Session has been stopped and cannot be reused.
    Stopped,
}

impl SessionState {
    /// Check if transition to target state is valid.
    ///
    /// Valid transitions:
    /// - Created -> Running
    /// - Created -> Stopped (teardown before start)
    /// - Running -> Stopped
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (*self, target),
            (Created, Running) | (Created, Stopped) | (Running, Stopped)
        )
    }

    /// Attempt to transition to a new state.
    ///
    /// Returns `Ok(())` if the transition is valid, or an error otherwise.
    pub fn transition_to(&mut self, target: SessionState) -> crate::Result<()> {
        if self.can_transition_to(target) {
            *self = target;
            Ok(())
        } else {
            Err(crate::error::LangBridgeError::InvalidStateTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Check if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Stopped)
    }

    /// Check if the session is live on its channel.
    pub fn is_running(&self) -> bool {
        matches!(self, SessionState::Running)
    }
}
