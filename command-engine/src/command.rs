//! Command registration values: the fluent [`Command`] builder and canonical-name
//! derivation.

/// The canonical name of a command syntax: its first whitespace-delimited token, or
/// the syntax itself when it has none.
pub fn canonical_name(syntax: &str) -> &str {
    syntax.split_whitespace().next().unwrap_or(syntax)
}

#[derive(Debug, Clone)]
pub(crate) struct Alias {
    pub(crate) syntax: String,
    pub(crate) pattern: String,
}

/// A command to register: display syntax, description, trigger pattern, visibility,
/// and any alias syntaxes. Commands start master-only; [`public`](Command::public)
/// opens them to any admitted sender. Aliases share the command's handler,
/// description, and visibility.
#[derive(Debug, Clone)]
pub struct Command {
    pub(crate) syntax: String,
    pub(crate) description: String,
    pub(crate) pattern: String,
    pub(crate) is_public: bool,
    pub(crate) aliases: Vec<Alias>,
}

impl Command {
    pub fn new(
        syntax: impl Into<String>,
        description: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        Self {
            syntax: syntax.into(),
            description: description.into(),
            pattern: pattern.into(),
            is_public: false,
            aliases: Vec::new(),
        }
    }

    /// Marks the command public.
    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }

    /// Appends an alias syntax and trigger pattern.
    pub fn alias(mut self, syntax: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.aliases.push(Alias {
            syntax: syntax.into(),
            pattern: pattern.into(),
        });
        self
    }

    /// The canonical name the command will be registered under.
    pub fn name(&self) -> &str {
        canonical_name(&self.syntax)
    }
}
