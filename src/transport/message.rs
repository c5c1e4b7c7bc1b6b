//! Wire message types exchanged with the analysis backend.

use serde::{Deserialize, Serialize};

/// Worker boot mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BootMode {
    /// Backend runs its own message loop immediately.
    Foreground,
    /// Backend waits for an explicit activation message.
    Background,
}

/// A message on the channel, tagged by `type` on the wire.
///
/// The boot directive serializes exactly as
/// `{"type":"browser/boot","mode":"foreground"}`, which worker backends
/// expect as their first message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WireMessage {
    /// Worker boot directive. Must be the first message posted to a worker.
    #[serde(rename = "browser/boot")]
    Boot {
        /// Boot mode for the worker's message loop.
        mode: BootMode,
    },

    /// Session handshake: announces the client identity and the document
    /// selector its services apply to.
    #[serde(rename = "initialize")]
    Initialize {
        /// Client display name.
        client_name: String,
        /// Language identifiers the session applies to.
        document_selector: Vec<String>,
    },

    /// Backend acknowledgment of the handshake.
    #[serde(rename = "initialized")]
    Initialized,

    /// Client-side notice that the session is shutting down.
    #[serde(rename = "shutdown")]
    Shutdown,

    /// Backend-initiated graceful close.
    #[serde(rename = "exit")]
    Exit,

    /// Generic protocol notification.
    #[serde(rename = "notification")]
    Notification {
        /// Notification method name.
        method: String,
        /// Method parameters, if any.
        #[serde(default)]
        params: serde_json::Value,
    },

    /// Operational error reported by the backend or the transport.
    #[serde(rename = "error")]
    Error {
        /// Human-readable error description.
        message: String,
    },
}

impl WireMessage {
    /// The fixed boot directive posted to freshly created workers.
    pub fn boot_directive() -> Self {
        WireMessage::Boot {
            mode: BootMode::Foreground,
        }
    }
}
