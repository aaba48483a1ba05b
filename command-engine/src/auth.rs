//! Sender authorization: the master set, the bot-level gate, and the per-command rule.

use std::collections::HashSet;

/// Pure authorization decisions, fixed at construction. Masters may do anything; other
/// senders get through the bot-level gate only on a public bot, and then only to
/// public commands.
#[derive(Debug, Clone)]
pub struct AuthPolicy {
    masters: HashSet<String>,
    bot_is_public: bool,
}

impl AuthPolicy {
    pub fn new(masters: impl IntoIterator<Item = String>, bot_is_public: bool) -> Self {
        Self {
            masters: masters.into_iter().collect(),
            bot_is_public,
        }
    }

    pub fn is_master(&self, sender: &str) -> bool {
        self.masters.contains(sender)
    }

    /// The bot-level gate, checked once per incoming message. Senders failing it are
    /// dropped silently.
    pub fn admits(&self, sender: &str) -> bool {
        self.bot_is_public || self.is_master(sender)
    }

    /// The per-command rule: masters may invoke anything, everyone else only public
    /// commands.
    pub fn can_invoke(&self, sender: &str, command_is_public: bool) -> bool {
        command_is_public || self.is_master(sender)
    }

    /// Whether a command appears in the sender's help listing. Same rule as
    /// invocation.
    pub fn can_list(&self, sender: &str, command_is_public: bool) -> bool {
        command_is_public || self.is_master(sender)
    }
}
