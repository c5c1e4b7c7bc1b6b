//! Backend endpoint targets.
//!
//! A target describes where a channel should be opened: a WebSocket endpoint
//! for a remote analysis process, or a worker module for an in-process one.

/// Target for a network-socket-backed channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketTarget {
    /// Backend host name.
    pub hostname: String,
    /// Backend port.
    pub port: u16,
    /// Endpoint path, with or without leading slash.
    pub path: String,
    /// Whether the hosting context itself is served securely.
    ///
    /// Drives the scheme: a secure host must not open an insecure channel.
    pub secure: bool,
}

impl SocketTarget {
    /// Create a new socket target.
    pub fn new(
        hostname: impl Into<String>,
        port: u16,
        path: impl Into<String>,
        secure: bool,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            path: path.into(),
            secure,
        }
    }

    /// Compute the WebSocket URL for this target.
    ///
    /// Secure hosting contexts get `wss://`, insecure ones `ws://`. The path
    /// is normalized to a single leading slash.
    pub fn url(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        let path = normalize_path(&self.path);
        format!("{}://{}:{}{}", scheme, self.hostname, self.port, path)
    }
}

impl Default for SocketTarget {
    fn default() -> Self {
        Self {
            hostname: "localhost".to_string(),
            port: 3000,
            path: "/sampleServer".to_string(),
            secure: false,
        }
    }
}

/// Target for a worker-backed channel.
///
/// The module path is resolved against the hosting base URL, the same way a
/// browser resolves a worker script relative to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerTarget {
    /// Module path, absolute or relative to the hosting base.
    pub module_path: String,
}

impl WorkerTarget {
    /// Create a new worker target.
    pub fn new(module_path: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
        }
    }

    /// Resolve the module path against a base URL.
    ///
    /// Absolute paths (containing a scheme) are returned as-is; relative
    /// paths are joined onto the base, stripping any `./` prefix.
    pub fn resolve(&self, base: &str) -> String {
        if self.module_path.contains("://") {
            return self.module_path.clone();
        }
        let relative = self.module_path.trim_start_matches("./");
        format!("{}/{}", base.trim_end_matches('/'), relative)
    }
}

/// Collapse repeated slashes and guarantee a single leading slash.
fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    out.push('/');
    let mut prev_slash = true;
    for c in path.chars() {
        if c == '/' {
            if !prev_slash {
                out.push(c);
            }
            prev_slash = true;
        } else {
            out.push(c);
            prev_slash = false;
        }
    }
    out
}
