//! Transport channels to the analysis backend.
//!
//! A channel is a duplex message pipe owned exclusively by the session
//! manager. Two variants exist: a network socket that becomes usable only
//! after its open signal, and an in-process worker that must be booted
//! before use. Either way, a ready channel is consumed exactly once into a
//! reader/writer pair plus a force-close handle.

mod id;
mod message;
mod pair;
mod socket;
mod target;
mod worker;

pub use id::ChannelId;
pub use message::{BootMode, WireMessage};
pub use pair::{ChannelHandle, MessageReader, MessageWriter};
pub use socket::SocketChannel;
pub use target::{SocketTarget, WorkerTarget};
pub use worker::{echo_backend, WorkerChannel, WorkerInbox, WorkerOutbox};

use crate::error::Result;

/// Lifecycle state of a channel.
///
/// A channel that reaches `Closed` is never reused; reconnection means
/// constructing an entirely new channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Constructed but not yet usable.
    Opening,
    /// Open signal received (socket) or boot posted (worker).
    Ready,
    /// Channel is gone.
    Closed,
}

/// A duplex transport channel, socket- or worker-backed.
pub enum Channel {
    /// Network-socket-backed channel.
    Socket(SocketChannel),
    /// Worker-thread-backed channel.
    Worker(WorkerChannel),
}

impl Channel {
    /// ID of the underlying channel.
    pub fn id(&self) -> ChannelId {
        match self {
            Channel::Socket(c) => c.id(),
            Channel::Worker(c) => c.id(),
        }
    }

    /// Current channel state.
    pub fn state(&self) -> ChannelState {
        match self {
            Channel::Socket(c) => c.state(),
            Channel::Worker(c) => c.state(),
        }
    }

    /// Consume the channel into its reader/writer pair and close handle.
    ///
    /// Fails with `ChannelNotReady` if the channel has not signaled
    /// readiness; no message can be written before that point.
    pub fn into_transports(self) -> Result<(MessageReader, MessageWriter, ChannelHandle)> {
        match self {
            Channel::Socket(c) => c.into_transports(),
            Channel::Worker(c) => c.into_transports(),
        }
    }
}
