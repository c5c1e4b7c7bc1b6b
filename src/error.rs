//! Error types for lang-bridge.

use thiserror::Error;

/// Main error type for lang-bridge operations.
#[derive(Error, Debug)]
pub enum LangBridgeError {
    /// Channel has not signaled readiness yet.
    #[error("channel not ready: current state is {0:?}")]
    ChannelNotReady(crate::transport::ChannelState),

    /// The underlying channel is gone.
    #[error("channel closed")]
    ChannelClosed,

    /// Failed to establish the channel.
    #[error("channel open failed: {0}")]
    Connect(String),

    /// Event is not valid in the machine's current state.
    #[error("invalid event {event:?} in state {state:?}")]
    InvalidEvent {
        state: crate::bridge::BridgeState,
        event: crate::bridge::BridgeEvent,
    },

    /// Invalid session lifecycle transition attempted.
    #[error("invalid session state transition from {from:?} to {to:?}")]
    InvalidStateTransition {
        from: crate::session::SessionState,
        to: crate::session::SessionState,
    },

    /// A live session is already bound to the channel.
    #[error("session already bound to channel {0}")]
    SessionAlreadyBound(crate::transport::ChannelId),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Wire message encode/decode error.
    #[error("message codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Convenience Result type for lang-bridge operations.
pub type Result<T> = std::result::Result<T, LangBridgeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{ChannelId, ChannelState};

    #[test]
    fn test_channel_not_ready_display() {
        let err = LangBridgeError::ChannelNotReady(ChannelState::Opening);
        assert!(err.to_string().contains("not ready"));
        assert!(err.to_string().contains("Opening"));
    }

    #[test]
    fn test_connect_display() {
        let err = LangBridgeError::Connect("connection refused".into());
        assert!(err.to_string().contains("open failed"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_session_already_bound_display() {
        let err = LangBridgeError::SessionAlreadyBound(ChannelId::from_raw(255));
        assert!(err.to_string().contains("chan-000000ff"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such host");
        let bridge_err: LangBridgeError = io_err.into();
        assert!(matches!(bridge_err, LangBridgeError::Io(_)));
        assert!(bridge_err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_codec_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let bridge_err: LangBridgeError = json_err.into();
        assert!(bridge_err.to_string().contains("codec"));
    }
}
