//! The command registry: descriptors for display, specs for dispatch.

use std::collections::BTreeMap;
use std::sync::Arc;

use jbot_core::{BotError, Result};
use regex::Regex;
use tracing::{debug, warn};

use crate::command::{canonical_name, Command};
use crate::handler::CommandHandler;

/// One logical command as known to a user: canonical name, every display syntax
/// (primary first, aliases after), description, and visibility. Alias registration
/// also inserts an alias-flagged descriptor under the alias's own canonical name so
/// that single-command help can resolve it; the flag keeps it out of the listing.
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    name: String,
    syntaxes: Vec<String>,
    description: String,
    is_public: bool,
    is_alias: bool,
}

impl CommandDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn syntaxes(&self) -> &[String] {
        &self.syntaxes
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn is_alias(&self) -> bool {
        self.is_alias
    }
}

/// One pattern-to-handler binding used for dispatch: the owning command's canonical
/// name, the compiled trigger pattern, visibility, and the shared handler.
pub struct CommandSpec {
    name: String,
    is_public: bool,
    pattern: Regex,
    handler: Arc<dyn CommandHandler>,
}

impl CommandSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    /// Tests the full trimmed message text against the trigger pattern. Patterns carry
    /// their own anchors.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    pub fn handler(&self) -> Arc<dyn CommandHandler> {
        Arc::clone(&self.handler)
    }
}

/// Registry of commands: descriptors keyed by canonical name (ordered), specs in
/// registration order. A command with N aliases contributes N+1 specs sharing one
/// handler, and 1+N descriptors of which only the primary is listed in help.
#[derive(Default)]
pub struct CommandRegistry {
    descriptors: BTreeMap<String, CommandDescriptor>,
    specs: Vec<CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command. Every syntax must be non-blank and every pattern must
    /// compile; all inputs are checked before any mutation, so a failing call leaves
    /// the registry untouched. Re-registering a canonical name replaces its
    /// descriptor (the spec list is append-only, so dispatch still favors the
    /// earlier registration).
    pub fn register(&mut self, command: Command, handler: Arc<dyn CommandHandler>) -> Result<()> {
        validate_syntax(&command.syntax)?;
        for alias in &command.aliases {
            validate_syntax(&alias.syntax)?;
        }
        let pattern = compile_pattern(&command.pattern)?;
        let mut alias_patterns = Vec::with_capacity(command.aliases.len());
        for alias in &command.aliases {
            alias_patterns.push(compile_pattern(&alias.pattern)?);
        }

        let name = canonical_name(&command.syntax).to_string();
        let mut syntaxes = vec![command.syntax.clone()];
        syntaxes.extend(command.aliases.iter().map(|alias| alias.syntax.clone()));

        self.insert_descriptor(CommandDescriptor {
            name: name.clone(),
            syntaxes,
            description: command.description.clone(),
            is_public: command.is_public,
            is_alias: false,
        });
        self.specs.push(CommandSpec {
            name: name.clone(),
            is_public: command.is_public,
            pattern,
            handler: Arc::clone(&handler),
        });

        for (alias, alias_pattern) in command.aliases.iter().zip(alias_patterns) {
            self.insert_descriptor(CommandDescriptor {
                name: canonical_name(&alias.syntax).to_string(),
                syntaxes: vec![alias.syntax.clone()],
                description: command.description.clone(),
                is_public: command.is_public,
                is_alias: true,
            });
            self.specs.push(CommandSpec {
                name: name.clone(),
                is_public: command.is_public,
                pattern: alias_pattern,
                handler: Arc::clone(&handler),
            });
        }

        debug!(command = %name, aliases = command.aliases.len(), "registered command");
        Ok(())
    }

    fn insert_descriptor(&mut self, descriptor: CommandDescriptor) {
        let name = descriptor.name.clone();
        if self.descriptors.insert(name.clone(), descriptor).is_some() {
            warn!(command = %name, "descriptor replaced an earlier registration");
        }
    }

    /// Exact canonical-name lookup; alias entries resolve too.
    pub fn lookup(&self, name: &str) -> Option<&CommandDescriptor> {
        self.descriptors.get(name)
    }

    /// All descriptors in ascending canonical-name order.
    pub fn descriptors(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.descriptors.values()
    }

    /// The spec list in registration order, oldest first. Dispatch scans in this
    /// order and stops at the first match.
    pub fn specs(&self) -> &[CommandSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

fn validate_syntax(syntax: &str) -> Result<()> {
    if syntax.trim().is_empty() {
        return Err(BotError::Syntax("command syntax must not be blank".to_string()));
    }
    Ok(())
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|error| BotError::Pattern(error.to_string()))
}
