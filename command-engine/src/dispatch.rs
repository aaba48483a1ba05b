//! Message dispatch: gate, scan, first match, handler boundary.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, instrument, warn};

use crate::auth::AuthPolicy;
use crate::registry::CommandRegistry;

/// Routes one message to the first matching, authorized command spec and returns the
/// reply, if any. Cloneable; all clones share the registry.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<RwLock<CommandRegistry>>,
    policy: AuthPolicy,
}

impl Dispatcher {
    pub fn new(registry: Arc<RwLock<CommandRegistry>>, policy: AuthPolicy) -> Self {
        Self { registry, policy }
    }

    /// Dispatches one message body from `sender` (bare identity). Senders failing the
    /// bot-level gate are dropped without a reply. Specs are scanned in registration
    /// order, skipping ones the sender may not invoke; the first whose pattern matches
    /// the trimmed text wins. No match yields the guidance reply. Handler errors are
    /// logged here and produce no reply.
    #[instrument(skip(self, text))]
    pub async fn dispatch(&self, sender: &str, text: &str) -> Option<String> {
        let text = text.trim();
        if !self.policy.admits(sender) {
            debug!(sender = %sender, "sender not admitted, message dropped");
            return None;
        }

        let matched = {
            let registry = self.registry.read();
            registry
                .specs()
                .iter()
                .filter(|spec| self.policy.can_invoke(sender, spec.is_public()))
                .find(|spec| spec.matches(text))
                .map(|spec| (spec.name().to_string(), spec.handler()))
        };

        let (name, handler) = match matched {
            Some(found) => found,
            None => {
                debug!(sender = %sender, "no command matched");
                return Some(unknown_command_reply(text));
            }
        };

        let args = argument_payload(text);
        debug!(sender = %sender, command = %name, "command matched");
        match handler.handle(sender, args).await {
            Ok(reply) => reply,
            Err(error) => {
                warn!(sender = %sender, command = %name, error = %error, "command handler failed");
                None
            }
        }
    }
}

/// Everything after the first whitespace-delimited token, with leading whitespace
/// stripped; empty when the text is a bare command.
fn argument_payload(text: &str) -> &str {
    match text.find(char::is_whitespace) {
        Some(index) => text[index..].trim_start(),
        None => "",
    }
}

fn unknown_command_reply(text: &str) -> String {
    format!("I don't understand '{text}' Try saying 'help' to see what commands I understand.")
}
