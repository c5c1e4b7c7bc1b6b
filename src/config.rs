//! Configuration management for lang-bridge.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::session::{RecoveryPolicy, SessionOptions};
use crate::transport::SocketTarget;

/// Which channel variant to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Network socket to a remote analysis process.
    #[default]
    Socket,
    /// In-process worker backend.
    Worker,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend channel configuration.
    pub backend: BackendSection,
    /// Client session configuration.
    pub client: ClientSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Backend channel configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSection {
    /// Channel variant to open.
    pub transport: TransportKind,
    /// Backend host name (socket transport).
    pub hostname: String,
    /// Backend port (socket transport).
    pub port: u16,
    /// Endpoint path (socket transport).
    pub path: String,
    /// Whether the hosting context is served securely (`wss://`).
    pub secure: bool,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            transport: TransportKind::Socket,
            hostname: "localhost".to_string(),
            port: 3000,
            path: "/sampleServer".to_string(),
            secure: false,
        }
    }
}

/// Client session configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSection {
    /// Client display name.
    pub name: String,
    /// Language identifiers the session applies to.
    pub languages: Vec<String>,
    /// Optional cap on silently swallowed session errors.
    pub max_silent_errors: Option<u32>,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            name: "Sample Language Client".to_string(),
            languages: vec!["json".to_string()],
            max_silent_errors: None,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(hostname) = std::env::var("LANG_BRIDGE_HOSTNAME") {
            self.backend.hostname = hostname;
        }

        if let Ok(port) = std::env::var("LANG_BRIDGE_PORT") {
            if let Ok(port) = port.parse() {
                self.backend.port = port;
            }
        }

        if let Ok(path) = std::env::var("LANG_BRIDGE_PATH") {
            self.backend.path = path;
        }

        if let Ok(secure) = std::env::var("LANG_BRIDGE_SECURE") {
            self.backend.secure = matches!(secure.as_str(), "1" | "true" | "yes");
        }

        if let Ok(level) = std::env::var("LANG_BRIDGE_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref hostname) = args.hostname {
            self.backend.hostname = hostname.clone();
        }
        if let Some(port) = args.port {
            self.backend.port = port;
        }
        if let Some(ref path) = args.path {
            self.backend.path = path.clone();
        }
        if args.secure {
            self.backend.secure = true;
        }
        if args.worker {
            self.backend.transport = TransportKind::Worker;
        }
        if let Some(ref language) = args.language {
            self.client.languages = vec![language.clone()];
        }
        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(ref path) = args.config {
            config = Config::from_file(path)?;
        }

        config.apply_env();
        config.apply_args(args);

        Ok(config)
    }

    /// Build the socket target from the backend section.
    pub fn to_socket_target(&self) -> SocketTarget {
        SocketTarget::new(
            self.backend.hostname.clone(),
            self.backend.port,
            self.backend.path.clone(),
            self.backend.secure,
        )
    }

    /// Build the session options from the client section.
    pub fn to_session_options(&self) -> SessionOptions {
        let mut policy = RecoveryPolicy::default();
        if let Some(budget) = self.client.max_silent_errors {
            policy = policy.with_error_budget(budget);
        }
        SessionOptions {
            name: self.client.name.clone(),
            document_selector: self.client.languages.clone(),
            policy,
        }
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
