//! Transport session manager.
//!
//! Owns the channel/session pair for one logical backend connection: opens
//! a channel, binds and starts the session once the channel is ready, pumps
//! the reader, and tears everything down deterministically. All lifecycle
//! transitions flow through the [`BridgeMachine`], never through ad-hoc
//! callback state.

mod host;
mod machine;

pub use host::HostContext;
pub use machine::{BridgeEvent, BridgeMachine, BridgeState};

use std::future::Future;

use tracing::{debug, info, trace, warn};

use crate::error::{LangBridgeError, Result};
use crate::session::{CloseAction, ErrorAction, Session, SessionOptions, SessionState};
use crate::transport::{
    Channel, ChannelHandle, ChannelId, MessageReader, SocketChannel, SocketTarget, WireMessage,
    WorkerChannel, WorkerInbox, WorkerOutbox,
};

/// Manages one channel and the single session bound to it.
///
/// The manager never reconnects on its own: after a stopped session the
/// host calls [`teardown`](SessionManager::teardown) and may then open a
/// fresh channel. A closed channel is never reused.
pub struct SessionManager {
    options: SessionOptions,
    machine: BridgeMachine,
    handle: Option<ChannelHandle>,
    reader: Option<MessageReader>,
    session: Option<Session>,
    error_count: u32,
}

impl SessionManager {
    /// Create a manager with the given session options.
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            machine: BridgeMachine::new(),
            handle: None,
            reader: None,
            session: None,
            error_count: 0,
        }
    }

    /// Current bridge state.
    pub fn current_state(&self) -> BridgeState {
        self.machine.current_state()
    }

    /// Lifecycle state of the bound session, if any.
    pub fn session_state(&self) -> Option<SessionState> {
        self.session.as_ref().map(|s| s.state())
    }

    /// ID of the currently open channel, if any.
    pub fn channel_id(&self) -> Option<ChannelId> {
        self.handle.as_ref().map(|h| h.id())
    }

    /// Operational errors swallowed since the session started.
    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    /// Open a socket channel to the target and start a session on it.
    ///
    /// Only valid from `Idle`; after a stopped session, call `teardown`
    /// before reopening. An open failure returns the machine to `Idle`.
    pub async fn open_socket(&mut self, target: &SocketTarget) -> Result<()> {
        self.machine.submit(BridgeEvent::OpenRequested)?;
        match SocketChannel::connect(target).await {
            Ok(channel) => {
                self.machine.submit(BridgeEvent::ChannelOpened)?;
                self.bind_channel(Channel::Socket(channel)).await
            }
            Err(e) => {
                self.machine.submit(BridgeEvent::OpenFailed)?;
                Err(e)
            }
        }
    }

    /// Spawn a worker backend, boot it, and start a session on it.
    pub async fn open_worker<F, Fut>(&mut self, backend: F) -> Result<()>
    where
        F: FnOnce(WorkerInbox, WorkerOutbox) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.machine.submit(BridgeEvent::OpenRequested)?;
        let mut channel = WorkerChannel::spawn(backend);
        match channel.post_boot().await {
            Ok(()) => {
                self.machine.submit(BridgeEvent::ChannelOpened)?;
                self.bind_channel(Channel::Worker(channel)).await
            }
            Err(e) => {
                self.machine.submit(BridgeEvent::OpenFailed)?;
                Err(e)
            }
        }
    }

    /// Wrap a ready channel into transports and start the session.
    async fn bind_channel(&mut self, channel: Channel) -> Result<()> {
        if let Some(existing) = &self.session {
            if !existing.state().is_terminal() {
                return Err(LangBridgeError::SessionAlreadyBound(existing.channel_id()));
            }
        }

        let (reader, writer, handle) = channel.into_transports()?;
        let mut session = Session::new(self.options.clone(), writer);
        if let Err(e) = session.start().await {
            // Channel died between ready and handshake; fold back to Idle.
            handle.close();
            self.machine.submit(BridgeEvent::TeardownRequested)?;
            return Err(e);
        }
        self.machine.submit(BridgeEvent::SessionStarted)?;

        self.handle = Some(handle);
        self.reader = Some(reader);
        self.session = Some(session);
        self.error_count = 0;
        Ok(())
    }

    /// Pump until the reader closes.
    pub async fn run(&mut self) -> Result<()> {
        while self.pump().await? {}
        Ok(())
    }

    /// Process one incoming message.
    ///
    /// Returns `Ok(false)` once the reader has closed (and the session has
    /// been stopped), or when there is no reader to pump.
    pub async fn pump(&mut self) -> Result<bool> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(false);
        };
        match reader.recv().await {
            Some(msg) => {
                self.handle_message(msg).await?;
                Ok(true)
            }
            None => {
                self.on_reader_closed().await?;
                Ok(false)
            }
        }
    }

    async fn handle_message(&mut self, msg: WireMessage) -> Result<()> {
        match msg {
            WireMessage::Error { message } => {
                self.error_count += 1;
                warn!(count = self.error_count, "session error: {}", message);
                match self.options.policy.decide(self.error_count) {
                    ErrorAction::Continue => {
                        // Swallowed: the session stays live.
                        self.machine.submit(BridgeEvent::SessionErrored)?;
                    }
                    ErrorAction::Shutdown => {
                        warn!("error budget exhausted, closing channel");
                        if let Some(handle) = &self.handle {
                            handle.close();
                        }
                    }
                }
            }
            WireMessage::Initialized => {
                debug!("backend acknowledged handshake");
            }
            WireMessage::Exit => {
                match self.options.policy.on_close {
                    CloseAction::DoNotRestart => {
                        info!("backend closed the session; not restarting")
                    }
                    CloseAction::Restart => {
                        info!("backend closed the session; host may re-open")
                    }
                }
                if let Some(handle) = &self.handle {
                    handle.close();
                }
            }
            WireMessage::Notification { method, .. } => {
                trace!(%method, "backend notification");
            }
            other => {
                trace!(?other, "ignoring message");
            }
        }
        Ok(())
    }

    /// Reader signaled channel closure: stop the session, exactly once.
    async fn on_reader_closed(&mut self) -> Result<()> {
        self.reader = None;
        if let Some(session) = self.session.as_mut() {
            session.stop().await?;
        }
        if self.machine.current_state() == BridgeState::SessionStarted {
            self.machine.submit(BridgeEvent::ReaderClosed)?;
        }
        info!("reader closed, session stopped");
        Ok(())
    }

    /// Force-close the channel and stop the session on host shutdown.
    ///
    /// No drain is attempted; pending messages may be dropped. Idempotent:
    /// calling with nothing open is a no-op.
    pub async fn teardown(&mut self) -> Result<()> {
        if let Some(handle) = self.handle.take() {
            debug!(channel = %handle.id(), "force-closing channel");
            handle.close();
        }
        if let Some(session) = self.session.as_mut() {
            session.stop().await?;
        }
        self.reader = None;
        self.machine.submit(BridgeEvent::TeardownRequested)?;
        Ok(())
    }
}
