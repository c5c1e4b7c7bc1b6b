//! Reader/writer pair produced from a ready channel.
//!
//! The pair is created exactly once per channel and never reused across
//! reconnects. Both halves carry the channel's ID so the session layer can
//! tell which channel instance it is bound to.

use tokio::sync::{mpsc, watch};

use super::ChannelId;
use crate::error::{LangBridgeError, Result};
use crate::transport::WireMessage;

/// Receiving half of a channel's message stream.
#[derive(Debug)]
pub struct MessageReader {
    channel: ChannelId,
    rx: mpsc::Receiver<WireMessage>,
}

impl MessageReader {
    pub(crate) fn new(channel: ChannelId, rx: mpsc::Receiver<WireMessage>) -> Self {
        Self { channel, rx }
    }

    /// ID of the channel this reader belongs to.
    pub fn channel_id(&self) -> ChannelId {
        self.channel
    }

    /// Receive the next message.
    ///
    /// Returns `None` once the underlying channel has closed (remote
    /// disconnect, worker termination, or a force-close). This is the
    /// reader's close signal.
    pub async fn recv(&mut self) -> Option<WireMessage> {
        self.rx.recv().await
    }
}

/// Sending half of a channel's message stream.
#[derive(Debug)]
pub struct MessageWriter {
    channel: ChannelId,
    tx: mpsc::Sender<WireMessage>,
}

impl MessageWriter {
    pub(crate) fn new(channel: ChannelId, tx: mpsc::Sender<WireMessage>) -> Self {
        Self { channel, tx }
    }

    /// ID of the channel this writer belongs to.
    pub fn channel_id(&self) -> ChannelId {
        self.channel
    }

    /// Send a message to the backend.
    ///
    /// Fails with [`LangBridgeError::ChannelClosed`] once the channel is gone.
    pub async fn send(&self, message: WireMessage) -> Result<()> {
        self.tx
            .send(message)
            .await
            .map_err(|_| LangBridgeError::ChannelClosed)
    }
}

/// Force-close handle for a channel whose transports have been taken.
///
/// Held by the session manager so host teardown can sever the channel even
/// while a session is live. Closing drops pending messages; no drain is
/// attempted.
#[derive(Debug)]
pub struct ChannelHandle {
    id: ChannelId,
    shutdown: watch::Sender<bool>,
}

impl ChannelHandle {
    pub(crate) fn new(id: ChannelId, shutdown: watch::Sender<bool>) -> Self {
        Self { id, shutdown }
    }

    /// ID of the channel this handle controls.
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Force-close the channel. Idempotent: repeated calls are no-ops.
    pub fn close(&self) {
        let _ = self.shutdown.send(true);
    }
}
