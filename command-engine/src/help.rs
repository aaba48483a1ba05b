//! Help text synthesized from the live registry.

use std::sync::Arc;

use async_trait::async_trait;
use jbot_core::Result;
use parking_lot::RwLock;
use tracing::debug;

use crate::auth::AuthPolicy;
use crate::command::Command;
use crate::handler::CommandHandler;
use crate::registry::{CommandDescriptor, CommandRegistry};

/// Renders help from the registry: the full listing, or one command's entry.
#[derive(Clone)]
pub struct HelpSynthesizer {
    registry: Arc<RwLock<CommandRegistry>>,
    policy: AuthPolicy,
}

impl HelpSynthesizer {
    pub fn new(registry: Arc<RwLock<CommandRegistry>>, policy: AuthPolicy) -> Self {
        Self { registry, policy }
    }

    /// Help for the given sender: the full listing when `command_name` is empty or
    /// absent, otherwise the entry for that command.
    pub fn render(&self, sender: &str, command_name: Option<&str>) -> String {
        match command_name.map(str::trim) {
            Some(name) if !name.is_empty() => self.for_command(name),
            _ => self.listing(sender),
        }
    }

    /// Every visible, non-alias command in canonical-name order: each syntax on its
    /// own line, the description indented beneath.
    fn listing(&self, sender: &str) -> String {
        let registry = self.registry.read();
        let mut message = String::from("I understand the following commands:\n\n");
        for descriptor in registry.descriptors() {
            if descriptor.is_alias() {
                continue;
            }
            if !self.policy.can_list(sender, descriptor.is_public()) {
                continue;
            }
            append_entry(&mut message, descriptor);
        }
        message
    }

    /// One command's entry, looked up by canonical name; alias names resolve to their
    /// own entries. Renders without a visibility check: the listing stays filtered,
    /// but a sender asking about a name it already knows gets an answer.
    fn for_command(&self, name: &str) -> String {
        let registry = self.registry.read();
        match registry.lookup(name) {
            Some(descriptor) => {
                let mut message = String::new();
                append_entry(&mut message, descriptor);
                message
            }
            None => format!(
                "I don't understand '{name}' Try saying 'help' to see what commands I understand."
            ),
        }
    }
}

fn append_entry(message: &mut String, descriptor: &CommandDescriptor) {
    for syntax in descriptor.syntaxes() {
        message.push_str(syntax);
        message.push('\n');
    }
    message.push_str("  ");
    message.push_str(descriptor.description());
    message.push_str("\n\n");
}

struct HelpHandler {
    synthesizer: HelpSynthesizer,
}

#[async_trait]
impl CommandHandler for HelpHandler {
    async fn handle(&self, sender: &str, args: &str) -> Result<Option<String>> {
        let name = args.trim();
        let name = if name.is_empty() { None } else { Some(name) };
        debug!(sender = %sender, command = ?name, "rendering help");
        Ok(Some(self.synthesizer.render(sender, name)))
    }
}

/// Registers the built-in `help [<command>]` command (alias `? [<command>]`) so help
/// flows through ordinary dispatch. Registered public: the listing itself filters per
/// sender, and on a private bot the gate already keeps strangers out.
pub fn register_builtin_help(
    registry: &Arc<RwLock<CommandRegistry>>,
    policy: &AuthPolicy,
) -> Result<()> {
    let synthesizer = HelpSynthesizer::new(Arc::clone(registry), policy.clone());
    let command = Command::new(
        "help [<command>]",
        "Display help for all commands, or detailed help for a single command",
        r"^help(\s+?.+?)?$",
    )
    .public()
    .alias("? [<command>]", r"^\?(\s+?.+?)?$");
    registry
        .write()
        .register(command, Arc::new(HelpHandler { synthesizer }))
}
