//! Host-side one-time initialization.

use std::sync::OnceLock;

/// Initialization token owned by the hosting context.
///
/// Gates one-time host service setup (logging, language registration and the
/// like) so it runs exactly once across repeated editor mounts. Owning the
/// token per host context avoids the hidden coupling of a process-global
/// flag when multiple editors are mounted concurrently.
#[derive(Debug, Default)]
pub struct HostContext {
    init: OnceLock<()>,
}

impl HostContext {
    /// Create a fresh, uninitialized host context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` if this context has not been initialized yet.
    ///
    /// Returns `true` if `f` ran, `false` if initialization had already
    /// happened and the call was skipped.
    pub fn ensure_init<F: FnOnce()>(&self, f: F) -> bool {
        let mut ran = false;
        self.init.get_or_init(|| {
            f();
            ran = true;
        });
        ran
    }

    /// Whether one-time setup has run.
    pub fn is_initialized(&self) -> bool {
        self.init.get().is_some()
    }
}
