//! Network-socket-backed channel.
//!
//! Wraps a WebSocket connection to a remote analysis process. The channel
//! only exists in `Ready` state once the WebSocket handshake has completed,
//! so nothing can be written before the open signal.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{
    connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, error, trace};

use super::{ChannelHandle, ChannelId, ChannelState, MessageReader, MessageWriter, SocketTarget};
use crate::error::{LangBridgeError, Result};
use crate::transport::WireMessage;

/// Buffer depth for the pump channels on each side.
const PUMP_BUFFER: usize = 64;

/// A channel backed by a WebSocket to a remote backend.
#[derive(Debug)]
pub struct SocketChannel {
    id: ChannelId,
    state: ChannelState,
    ws: Option<WebSocketStream<MaybeTlsStream<TcpStream>>>,
}

impl SocketChannel {
    /// Connect to the target's WebSocket endpoint.
    ///
    /// Resolves only after the server accepts the handshake; a failure here
    /// means the channel never reached ready state.
    pub async fn connect(target: &SocketTarget) -> Result<Self> {
        let url = target.url();
        debug!(url = %url, "opening socket channel");

        let (ws, _) = connect_async(url.as_str())
            .await
            .map_err(|e| LangBridgeError::Connect(e.to_string()))?;

        let id = ChannelId::new();
        debug!(channel = %id, url = %url, "socket channel ready");
        Ok(Self {
            id,
            state: ChannelState::Ready,
            ws: Some(ws),
        })
    }

    /// ID of this channel.
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Current channel state.
    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Consume the channel, producing its reader/writer pair and force-close
    /// handle. Spawns the pump tasks bridging the WebSocket to the pair.
    pub fn into_transports(mut self) -> Result<(MessageReader, MessageWriter, ChannelHandle)> {
        if self.state != ChannelState::Ready {
            return Err(LangBridgeError::ChannelNotReady(self.state));
        }
        let ws = self.ws.take().ok_or(LangBridgeError::ChannelClosed)?;
        let (mut sink, mut stream) = ws.split();

        let (in_tx, in_rx) = mpsc::channel(PUMP_BUFFER);
        let (out_tx, mut out_rx) = mpsc::channel::<WireMessage>(PUMP_BUFFER);
        let (shutdown, _) = watch::channel(false);
        let mut write_shutdown = shutdown.subscribe();
        let mut read_shutdown = shutdown.subscribe();
        let id = self.id;

        // Write pump: serialize outgoing messages onto the socket.
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = write_shutdown.changed() => {
                        let _ = sink.send(Message::Close(None)).await;
                        break;
                    }
                    msg = out_rx.recv() => match msg {
                        Some(msg) => {
                            let text = match serde_json::to_string(&msg) {
                                Ok(text) => text,
                                Err(e) => {
                                    error!(channel = %id, "failed to encode message: {}", e);
                                    continue;
                                }
                            };
                            trace!(channel = %id, "socket write: {}", text);
                            if sink.send(Message::Text(text)).await.is_err() {
                                break;
                            }
                        }
                        None => {
                            let _ = sink.send(Message::Close(None)).await;
                            break;
                        }
                    }
                }
            }
            debug!(channel = %id, "socket write pump finished");
        });

        // Read pump: decode incoming frames; dropping in_tx is the reader's
        // close signal.
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = read_shutdown.changed() => break,
                    next = stream.next() => match next {
                        Some(Ok(Message::Text(text))) => match serde_json::from_str(&text) {
                            Ok(msg) => {
                                if in_tx.send(msg).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                // Surface malformed frames as operational
                                // errors so the recovery policy decides.
                                let report = WireMessage::Error {
                                    message: format!("malformed message: {}", e),
                                };
                                if in_tx.send(report).await.is_err() {
                                    break;
                                }
                            }
                        },
                        // Ping/pong is answered by tungstenite itself.
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => {
                            debug!(channel = %id, "socket read error: {}", e);
                            break;
                        }
                    }
                }
            }
            debug!(channel = %id, "socket read pump finished");
        });

        Ok((
            MessageReader::new(id, in_rx),
            MessageWriter::new(id, out_tx),
            ChannelHandle::new(id, shutdown),
        ))
    }
}
