//! Client session bound to a channel's writer.

use tracing::{debug, info};

use super::{RecoveryPolicy, SessionState};
use crate::error::Result;
use crate::transport::{ChannelId, MessageWriter, WireMessage};

/// Identity and policy for a session, fixed at construction.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Client display name announced in the handshake.
    pub name: String,
    /// Language identifiers this session's services apply to.
    pub document_selector: Vec<String>,
    /// Error-recovery policy.
    pub policy: RecoveryPolicy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            name: "Sample Language Client".to_string(),
            document_selector: vec!["json".to_string()],
            policy: RecoveryPolicy::default(),
        }
    }
}

/// One language-analysis conversation over one channel.
///
/// A session holds the write half of its channel; the read half is pumped
/// by the session manager. At most one session ever exists per channel, and
/// a stopped session is never restarted in place.
pub struct Session {
    options: SessionOptions,
    writer: MessageWriter,
    state: SessionState,
}

impl Session {
    /// Bind a new session to a channel's writer.
    pub fn new(options: SessionOptions, writer: MessageWriter) -> Self {
        Self {
            options,
            writer,
            state: SessionState::Created,
        }
    }

    /// ID of the channel this session is bound to.
    pub fn channel_id(&self) -> ChannelId {
        self.writer.channel_id()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The session's options.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Start the session: send the handshake and go live.
    pub async fn start(&mut self) -> Result<()> {
        self.writer
            .send(WireMessage::Initialize {
                client_name: self.options.name.clone(),
                document_selector: self.options.document_selector.clone(),
            })
            .await?;
        self.state.transition_to(SessionState::Running)?;
        info!(
            channel = %self.channel_id(),
            client = %self.options.name,
            "session started"
        );
        Ok(())
    }

    /// Send a notification to the backend.
    pub async fn notify(&self, method: impl Into<String>, params: serde_json::Value) -> Result<()> {
        self.writer
            .send(WireMessage::Notification {
                method: method.into(),
                params,
            })
            .await
    }

    /// Stop the session. Idempotent.
    ///
    /// The shutdown notice is best-effort: on reader-close the channel is
    /// usually already gone, and teardown does not drain.
    pub async fn stop(&mut self) -> Result<()> {
        if self.state.is_terminal() {
            return Ok(());
        }
        let _ = self.writer.send(WireMessage::Shutdown).await;
        self.state.transition_to(SessionState::Stopped)?;
        debug!(channel = %self.channel_id(), "session stopped");
        Ok(())
    }
}
