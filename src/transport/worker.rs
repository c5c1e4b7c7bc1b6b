//! Worker-backed channel.
//!
//! Runs the analysis backend as a background task on the runtime and talks
//! to it over in-process message channels. Unlike the socket variant there
//! is no connection handshake, but a worker must receive the boot directive
//! before it is usable; the channel stays in `Opening` until `post_boot`.

use std::future::Future;

use tokio::sync::{mpsc, watch};
use tracing::debug;

use super::{ChannelHandle, ChannelId, ChannelState, MessageReader, MessageWriter};
use crate::error::{LangBridgeError, Result};
use crate::transport::WireMessage;

/// Buffer depth for worker message channels.
const PUMP_BUFFER: usize = 64;

/// Messages flowing into a worker backend.
pub type WorkerInbox = mpsc::Receiver<WireMessage>;
/// Messages flowing out of a worker backend.
pub type WorkerOutbox = mpsc::Sender<WireMessage>;

/// A channel backed by an in-process worker task.
pub struct WorkerChannel {
    id: ChannelId,
    state: ChannelState,
    to_worker: mpsc::Sender<WireMessage>,
    from_worker: Option<mpsc::Receiver<WireMessage>>,
}

impl WorkerChannel {
    /// Spawn a backend future and wire it to a new channel.
    ///
    /// The backend receives its inbox and outbox; it runs until the inbox
    /// closes or it returns on its own. The channel is created in `Opening`
    /// state and must be booted before transports can be taken.
    pub fn spawn<F, Fut>(backend: F) -> Self
    where
        F: FnOnce(WorkerInbox, WorkerOutbox) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (to_tx, to_rx) = mpsc::channel(PUMP_BUFFER);
        let (from_tx, from_rx) = mpsc::channel(PUMP_BUFFER);
        tokio::spawn(backend(to_rx, from_tx));

        let id = ChannelId::new();
        debug!(channel = %id, "worker channel spawned");
        Self {
            id,
            state: ChannelState::Opening,
            to_worker: to_tx,
            from_worker: Some(from_rx),
        }
    }

    /// ID of this channel.
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Current channel state.
    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Post the boot directive and mark the channel ready.
    ///
    /// The boot directive is guaranteed to be the first message the worker
    /// sees, since transports cannot be taken before this call.
    pub async fn post_boot(&mut self) -> Result<()> {
        if self.state == ChannelState::Closed {
            return Err(LangBridgeError::ChannelClosed);
        }
        self.to_worker
            .send(WireMessage::boot_directive())
            .await
            .map_err(|_| LangBridgeError::ChannelClosed)?;
        self.state = ChannelState::Ready;
        debug!(channel = %self.id, "worker channel booted");
        Ok(())
    }

    /// Consume the channel, producing its reader/writer pair and force-close
    /// handle. Fails unless the channel has been booted.
    pub fn into_transports(mut self) -> Result<(MessageReader, MessageWriter, ChannelHandle)> {
        if self.state != ChannelState::Ready {
            return Err(LangBridgeError::ChannelNotReady(self.state));
        }
        let mut from_worker = self
            .from_worker
            .take()
            .ok_or(LangBridgeError::ChannelClosed)?;
        let to_worker = self.to_worker.clone();

        let (in_tx, in_rx) = mpsc::channel(PUMP_BUFFER);
        let (out_tx, mut out_rx) = mpsc::channel::<WireMessage>(PUMP_BUFFER);
        let (shutdown, _) = watch::channel(false);
        let mut out_shutdown = shutdown.subscribe();
        let mut in_shutdown = shutdown.subscribe();
        let id = self.id;

        // Outbound pump: writer -> worker inbox.
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = out_shutdown.changed() => break,
                    msg = out_rx.recv() => match msg {
                        Some(msg) => {
                            if to_worker.send(msg).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
            debug!(channel = %id, "worker outbound pump finished");
        });

        // Inbound pump: worker outbox -> reader. Dropping in_tx signals close.
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = in_shutdown.changed() => break,
                    msg = from_worker.recv() => match msg {
                        Some(msg) => {
                            if in_tx.send(msg).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
            debug!(channel = %id, "worker inbound pump finished");
        });

        Ok((
            MessageReader::new(id, in_rx),
            MessageWriter::new(id, out_tx),
            ChannelHandle::new(id, shutdown),
        ))
    }
}

/// Minimal in-process backend used by the demo binary and tests.
///
/// Acknowledges the handshake, echoes notifications back under
/// `demo/echo`, and exits on shutdown.
pub async fn echo_backend(mut inbox: WorkerInbox, outbox: WorkerOutbox) {
    while let Some(msg) = inbox.recv().await {
        match msg {
            WireMessage::Boot { .. } => {}
            WireMessage::Initialize { .. } => {
                if outbox.send(WireMessage::Initialized).await.is_err() {
                    break;
                }
            }
            WireMessage::Notification { method, params } => {
                let reply = WireMessage::Notification {
                    method: "demo/echo".to_string(),
                    params: serde_json::json!({ "method": method, "params": params }),
                };
                if outbox.send(reply).await.is_err() {
                    break;
                }
            }
            WireMessage::Shutdown => {
                let _ = outbox.send(WireMessage::Exit).await;
                break;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transports_before_boot_rejected() {
        let channel = WorkerChannel::spawn(|_inbox, _outbox| async {});
        assert_eq!(channel.state(), ChannelState::Opening);

        let err = channel.into_transports().unwrap_err();
        assert!(matches!(
            err,
            LangBridgeError::ChannelNotReady(ChannelState::Opening)
        ));
    }

    #[tokio::test]
    async fn test_boot_is_first_message() {
        let (probe_tx, mut probe_rx) = mpsc::channel(8);
        let mut channel = WorkerChannel::spawn(move |mut inbox, _outbox| async move {
            while let Some(msg) = inbox.recv().await {
                if probe_tx.send(msg).await.is_err() {
                    break;
                }
            }
        });

        channel.post_boot().await.unwrap();
        assert_eq!(channel.state(), ChannelState::Ready);

        let (_reader, writer, _handle) = channel.into_transports().unwrap();
        writer.send(WireMessage::Shutdown).await.unwrap();

        assert_eq!(probe_rx.recv().await, Some(WireMessage::boot_directive()));
        assert_eq!(probe_rx.recv().await, Some(WireMessage::Shutdown));
    }

    #[tokio::test]
    async fn test_force_close_ends_reader() {
        let mut channel = WorkerChannel::spawn(|mut inbox, outbox| async move {
            // Hold the outbox open until the inbox dies.
            while inbox.recv().await.is_some() {}
            drop(outbox);
        });
        channel.post_boot().await.unwrap();
        let (mut reader, _writer, handle) = channel.into_transports().unwrap();

        handle.close();
        assert_eq!(reader.recv().await, None);
    }

    #[tokio::test]
    async fn test_backend_exit_ends_reader() {
        let mut channel = WorkerChannel::spawn(|_inbox, outbox| async move {
            drop(outbox);
        });
        channel.post_boot().await.unwrap();
        let (mut reader, _writer, _handle) = channel.into_transports().unwrap();

        assert_eq!(reader.recv().await, None);
    }

    #[tokio::test]
    async fn test_echo_backend_handshake() {
        let mut channel = WorkerChannel::spawn(echo_backend);
        channel.post_boot().await.unwrap();
        let (mut reader, writer, _handle) = channel.into_transports().unwrap();

        writer
            .send(WireMessage::Initialize {
                client_name: "test".to_string(),
                document_selector: vec!["json".to_string()],
            })
            .await
            .unwrap();
        assert_eq!(reader.recv().await, Some(WireMessage::Initialized));

        writer.send(WireMessage::Shutdown).await.unwrap();
        assert_eq!(reader.recv().await, Some(WireMessage::Exit));
    }
}
