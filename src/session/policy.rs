//! Error-recovery policy for live sessions.
//!
//! The default policy is deliberately permissive: it keeps the editor usable
//! over strict backend-failure surfacing. Operational errors are swallowed
//! and the session stays alive; a backend-initiated close is final.

/// What to do when an operational error fires during an active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorAction {
    /// Swallow the error and keep the session alive.
    #[default]
    Continue,
    /// Stop the session and close the channel.
    Shutdown,
}

/// What to do when the backend closes the session on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloseAction {
    /// Do not resurrect the channel automatically; the host must re-open.
    #[default]
    DoNotRestart,
    /// Host-driven restart is expected (not performed by the manager).
    Restart,
}

/// Recovery policy for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecoveryPolicy {
    /// Action on a generic operational error.
    pub on_error: ErrorAction,
    /// Action on backend-initiated graceful close.
    pub on_close: CloseAction,
    /// Optional cap on silently swallowed errors. `None` continues without
    /// limit, matching the original permissive behavior; `Some(n)` escalates
    /// to shutdown once more than `n` errors have been swallowed.
    pub max_silent_errors: Option<u32>,
}

impl RecoveryPolicy {
    /// Cap the number of silently swallowed errors.
    pub fn with_error_budget(mut self, budget: u32) -> Self {
        self.max_silent_errors = Some(budget);
        self
    }

    /// Decide the action for the `count`-th operational error.
    pub fn decide(&self, count: u32) -> ErrorAction {
        match self.on_error {
            ErrorAction::Shutdown => ErrorAction::Shutdown,
            ErrorAction::Continue => match self.max_silent_errors {
                Some(budget) if count > budget => ErrorAction::Shutdown,
                _ => ErrorAction::Continue,
            },
        }
    }
}
