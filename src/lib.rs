//! # lang-bridge
//!
//! Transport session manager bridging editor clients to language analysis
//! backends.
//!
//! This crate opens a duplex message channel to an analysis backend, either
//! over a network socket or through an in-process worker, binds it to a
//! single client session, and tears the pair down deterministically when
//! the channel closes or the host shuts down. The whole lifecycle runs
//! through an explicit state machine, so every transition is observable and
//! testable without a real socket.
//!
//! ## Features
//!
//! - **Two channel variants**: WebSocket to a remote process, or an
//!   in-process worker booted with a fixed directive
//! - **Single-owner lifecycle**: one session per channel, fresh channel per
//!   reconnect, idempotent teardown
//! - **Permissive recovery**: operational errors are swallowed by default
//!   to keep the editor usable; an optional budget caps the silence
//!
//! ## Quick Start
//!
//! ```no_run
//! use lang_bridge::{echo_backend, SessionManager, SessionOptions};
//!
//! #[tokio::main]
//! async fn main() -> lang_bridge::Result<()> {
//!     // Initialize logging
//!     lang_bridge::logging::try_init().ok();
//!
//!     // Open a worker-backed channel and start a session on it
//!     let mut manager = SessionManager::new(SessionOptions::default());
//!     manager.open_worker(echo_backend).await?;
//!
//!     // Pump messages until the backend closes the channel
//!     manager.run().await?;
//!     manager.teardown().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod transport;

// Re-export commonly used types
pub use bridge::{BridgeEvent, BridgeMachine, BridgeState, HostContext, SessionManager};
pub use config::{Config, TransportKind};
pub use error::{LangBridgeError, Result};
pub use session::{
    CloseAction, ErrorAction, RecoveryPolicy, Session, SessionOptions, SessionState,
};
pub use transport::{
    echo_backend, BootMode, Channel, ChannelHandle, ChannelId, ChannelState, MessageReader,
    MessageWriter, SocketChannel, SocketTarget, WireMessage, WorkerChannel, WorkerInbox,
    WorkerOutbox, WorkerTarget,
};
