//! Client sessions.
//!
//! A session binds a channel's writer to a fixed client identity and
//! document selector, with a recovery policy deciding how operational
//! errors and backend closes are handled.

mod client;
mod policy;
mod state;

pub use client::{Session, SessionOptions};
pub use policy::{CloseAction, ErrorAction, RecoveryPolicy};
pub use state::SessionState;
