//! # jbot-runtime
//!
//! The bot engine over a [`Transport`](jbot_core::Transport): configuration with
//! validation, the command registration phase, connect/disconnect with master
//! notices, presence mutation, and the serialized intake loop.

pub mod bot;
pub mod config;
mod intake;

pub use bot::Bot;
pub use config::BotConfig;
