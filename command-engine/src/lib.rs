//! # command-engine
//!
//! The command core: a registry of regex-triggered commands, sender authorization,
//! first-match dispatch, and help synthesized from the registry. Transport-agnostic;
//! used by jbot-runtime and by anything embedding the engine directly.

pub mod auth;
pub mod command;
pub mod dispatch;
pub mod handler;
pub mod help;
pub mod registry;

pub use auth::AuthPolicy;
pub use command::{canonical_name, Command};
pub use dispatch::Dispatcher;
pub use handler::{handler_fn, CommandHandler};
pub use help::{register_builtin_help, HelpSynthesizer};
pub use registry::{CommandDescriptor, CommandRegistry, CommandSpec};
