//! Bridge finite-state machine.
//!
//! Replaces imperative open/close/error callback wiring with an explicit
//! machine: events go in through `submit`, the resulting state comes out.
//! Events submitted while a drain is in progress queue up and are processed
//! in order, so the machine stays consistent under reentrant submission.

use std::collections::VecDeque;

use tracing::trace;

use crate::error::{LangBridgeError, Result};

/// States of the channel/session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BridgeState {
    /// No channel exists.
    #[default]
    Idle,
    /// Channel construction in flight, open signal pending.
    ChannelOpening,
    /// Channel signaled ready; no session bound yet.
    ChannelReady,
    /// Session handshake sent; conversation live.
    SessionStarted,
    /// Reader closed; session stopped, channel unusable.
    SessionStopped,
}

/// Events driving the bridge machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeEvent {
    /// Host asked for a channel.
    OpenRequested,
    /// Channel signaled readiness.
    ChannelOpened,
    /// Channel failed before ever reaching ready.
    OpenFailed,
    /// Session bound and handshake sent.
    SessionStarted,
    /// Operational error swallowed by the recovery policy.
    SessionErrored,
    /// Reader signaled the underlying channel closed.
    ReaderClosed,
    /// Host teardown (unmount, navigate-away, shutdown).
    TeardownRequested,
}

/// Queue-driven state machine over the bridge lifecycle.
#[derive(Debug, Default)]
pub struct BridgeMachine {
    state: BridgeState,
    queue: VecDeque<BridgeEvent>,
    draining: bool,
}

impl BridgeMachine {
    /// Create a machine in the Idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The machine's current state.
    pub fn current_state(&self) -> BridgeState {
        self.state
    }

    /// Submit an event and drain the queue.
    ///
    /// Returns the state after all queued events have been applied. An
    /// event that is invalid for the state it meets leaves the machine
    /// unchanged and surfaces [`LangBridgeError::InvalidEvent`].
    pub fn submit(&mut self, event: BridgeEvent) -> Result<BridgeState> {
        self.queue.push_back(event);
        if self.draining {
            // A handler submitted from inside the drain; the outer loop
            // will pick it up.
            return Ok(self.state);
        }

        self.draining = true;
        let result = self.drain();
        self.draining = false;
        result
    }

    fn drain(&mut self) -> Result<BridgeState> {
        while let Some(event) = self.queue.pop_front() {
            let next = Self::apply(self.state, event).ok_or(LangBridgeError::InvalidEvent {
                state: self.state,
                event,
            })?;
            trace!(from = ?self.state, ?event, to = ?next, "bridge transition");
            self.state = next;
        }
        Ok(self.state)
    }

    /// Transition table. `None` marks an invalid (state, event) pair.
    ///
    /// There is deliberately no path back to `ChannelReady`: a closed
    /// channel is never reused, reconnection starts over from `Idle`.
    fn apply(state: BridgeState, event: BridgeEvent) -> Option<BridgeState> {
        use BridgeEvent::*;
        use BridgeState::*;

        match (state, event) {
            (Idle, OpenRequested) => Some(ChannelOpening),
            (ChannelOpening, ChannelOpened) => Some(ChannelReady),
            (ChannelOpening, OpenFailed) => Some(Idle),
            (ChannelReady, BridgeEvent::SessionStarted) => Some(BridgeState::SessionStarted),
            // Continue policy: a swallowed error leaves the session live.
            (BridgeState::SessionStarted, SessionErrored) => Some(BridgeState::SessionStarted),
            (BridgeState::SessionStarted, ReaderClosed) => Some(SessionStopped),
            // Forced teardown is valid from anywhere and idempotent in Idle.
            (_, TeardownRequested) => Some(Idle),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut machine = BridgeMachine::new();
        assert_eq!(machine.current_state(), BridgeState::Idle);

        assert_eq!(
            machine.submit(BridgeEvent::OpenRequested).unwrap(),
            BridgeState::ChannelOpening
        );
        assert_eq!(
            machine.submit(BridgeEvent::ChannelOpened).unwrap(),
            BridgeState::ChannelReady
        );
        assert_eq!(
            machine.submit(BridgeEvent::SessionStarted).unwrap(),
            BridgeState::SessionStarted
        );
        assert_eq!(
            machine.submit(BridgeEvent::ReaderClosed).unwrap(),
            BridgeState::SessionStopped
        );
        assert_eq!(
            machine.submit(BridgeEvent::TeardownRequested).unwrap(),
            BridgeState::Idle
        );
    }

    #[test]
    fn test_open_failure_returns_to_idle() {
        let mut machine = BridgeMachine::new();
        machine.submit(BridgeEvent::OpenRequested).unwrap();
        assert_eq!(
            machine.submit(BridgeEvent::OpenFailed).unwrap(),
            BridgeState::Idle
        );
    }

    #[test]
    fn test_swallowed_error_keeps_session_started() {
        let mut machine = BridgeMachine::new();
        machine.submit(BridgeEvent::OpenRequested).unwrap();
        machine.submit(BridgeEvent::ChannelOpened).unwrap();
        machine.submit(BridgeEvent::SessionStarted).unwrap();

        for _ in 0..5 {
            assert_eq!(
                machine.submit(BridgeEvent::SessionErrored).unwrap(),
                BridgeState::SessionStarted
            );
        }
    }

    #[test]
    fn test_open_while_started_is_invalid() {
        let mut machine = BridgeMachine::new();
        machine.submit(BridgeEvent::OpenRequested).unwrap();
        machine.submit(BridgeEvent::ChannelOpened).unwrap();
        machine.submit(BridgeEvent::SessionStarted).unwrap();

        let err = machine.submit(BridgeEvent::OpenRequested).unwrap_err();
        assert!(matches!(err, LangBridgeError::InvalidEvent { .. }));
        // State unchanged after the rejected event.
        assert_eq!(machine.current_state(), BridgeState::SessionStarted);
    }

    #[test]
    fn test_no_path_back_to_ready() {
        let mut machine = BridgeMachine::new();
        machine.submit(BridgeEvent::OpenRequested).unwrap();
        machine.submit(BridgeEvent::ChannelOpened).unwrap();
        machine.submit(BridgeEvent::SessionStarted).unwrap();
        machine.submit(BridgeEvent::ReaderClosed).unwrap();

        assert!(machine.submit(BridgeEvent::ChannelOpened).is_err());
        assert!(machine.submit(BridgeEvent::SessionStarted).is_err());
    }

    #[test]
    fn test_teardown_from_every_state() {
        for events in [
            &[][..],
            &[BridgeEvent::OpenRequested][..],
            &[BridgeEvent::OpenRequested, BridgeEvent::ChannelOpened][..],
            &[
                BridgeEvent::OpenRequested,
                BridgeEvent::ChannelOpened,
                BridgeEvent::SessionStarted,
            ][..],
            &[
                BridgeEvent::OpenRequested,
                BridgeEvent::ChannelOpened,
                BridgeEvent::SessionStarted,
                BridgeEvent::ReaderClosed,
            ][..],
        ] {
            let mut machine = BridgeMachine::new();
            for event in events {
                machine.submit(*event).unwrap();
            }
            assert_eq!(
                machine.submit(BridgeEvent::TeardownRequested).unwrap(),
                BridgeState::Idle
            );
            // Idempotent in Idle.
            assert_eq!(
                machine.submit(BridgeEvent::TeardownRequested).unwrap(),
                BridgeState::Idle
            );
        }
    }

    #[test]
    fn test_reader_close_before_start_is_invalid() {
        let mut machine = BridgeMachine::new();
        machine.submit(BridgeEvent::OpenRequested).unwrap();
        machine.submit(BridgeEvent::ChannelOpened).unwrap();
        assert!(machine.submit(BridgeEvent::ReaderClosed).is_err());
    }

    #[test]
    fn test_queued_events_apply_in_order() {
        let mut machine = BridgeMachine::new();
        machine.queue.push_back(BridgeEvent::OpenRequested);
        machine.queue.push_back(BridgeEvent::ChannelOpened);
        // Submitting drains the backlog first, then the new event.
        assert_eq!(
            machine.submit(BridgeEvent::SessionStarted).unwrap(),
            BridgeState::SessionStarted
        );
    }
}
