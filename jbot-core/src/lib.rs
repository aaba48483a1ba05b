//! # jbot-core
//!
//! Core types and traits for the command bot: the [`Transport`] seam, message and
//! presence types, jid helpers, the shared error type, and tracing initialization.
//! Transport-agnostic; used by command-engine and jbot-runtime.

pub mod error;
pub mod jid;
pub mod logger;
pub mod message;
pub mod presence;
pub mod transport;

pub use error::{BotError, Result};
pub use logger::init_tracing;
pub use message::{Message, MessageKind};
pub use presence::{Availability, Presence};
pub use transport::Transport;
