//! Messaging transport abstraction.
//!
//! [`Transport`] is the seam between the engine and a concrete messaging session.
//! The engine pulls messages; the transport owns the connection.

use async_trait::async_trait;

use crate::error::Result;
use crate::message::Message;
use crate::presence::Presence;

/// Abstraction over a real-time messaging session. Implementations map to a concrete
/// backend (a chat server, a console, a scripted fixture).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Establishes the session with the given account identity and credential.
    async fn connect(&self, jid: &str, password: &str) -> Result<()>;
    /// Whether the session is currently up. A false return ends the intake loop.
    fn is_connected(&self) -> bool;
    /// Announces the full presence stanza.
    async fn set_presence(&self, presence: &Presence) -> Result<()>;
    /// Sends a message body to a single recipient.
    async fn send_message(&self, to: &str, body: &str) -> Result<()>;
    /// Returns the messages that arrived since the last call; empty when none did.
    async fn fetch_messages(&self) -> Result<Vec<Message>>;
    /// Tears the session down.
    async fn disconnect(&self) -> Result<()>;
}
