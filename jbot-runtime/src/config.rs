//! Bot configuration: construction values, validation, and env loading.
//! External inputs: JABBER_ID, JABBER_PASSWORD, JABBER_MASTERS (required),
//! BOT_NAME, BOT_PUBLIC, BOT_STATUS, BOT_PRIORITY (optional).

use std::time::Duration;

use anyhow::Context;
use jbot_core::{BotError, Presence};

/// Everything fixed at construction. Presence attributes are the only part the bot
/// may change after connecting.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub jabber_id: String,
    pub password: String,
    /// Identities allowed to invoke any command; must not be empty.
    pub masters: Vec<String>,
    /// Display name; defaults to the local part of `jabber_id`.
    pub name: Option<String>,
    pub is_public: bool,
    pub presence: Presence,
    /// How long the intake loop sleeps when no messages are pending.
    pub poll_interval: Duration,
    /// Optional per-dispatch deadline; expired dispatches are aborted and their reply
    /// dropped. A handler that blocks without yielding cannot be cancelled.
    pub dispatch_timeout: Option<Duration>,
}

impl BotConfig {
    pub fn new(
        jabber_id: impl Into<String>,
        password: impl Into<String>,
        masters: Vec<String>,
    ) -> Self {
        Self {
            jabber_id: jabber_id.into(),
            password: password.into(),
            masters,
            name: None,
            is_public: false,
            presence: Presence::default(),
            poll_interval: Duration::from_secs(1),
            dispatch_timeout: None,
        }
    }

    /// Loads from the environment. JABBER_MASTERS is comma-separated. Load .env
    /// (e.g. dotenvy::dotenv()) before calling this.
    pub fn from_env() -> anyhow::Result<Self> {
        let jabber_id = std::env::var("JABBER_ID").context("JABBER_ID not set")?;
        let password = std::env::var("JABBER_PASSWORD").context("JABBER_PASSWORD not set")?;
        let masters: Vec<String> = std::env::var("JABBER_MASTERS")
            .context("JABBER_MASTERS not set")?
            .split(',')
            .map(|master| master.trim().to_string())
            .filter(|master| !master.is_empty())
            .collect();

        let mut config = Self::new(jabber_id, password, masters);
        config.name = std::env::var("BOT_NAME").ok();
        config.is_public = matches!(
            std::env::var("BOT_PUBLIC").as_deref(),
            Ok("1") | Ok("true") | Ok("yes")
        );
        config.presence.status = std::env::var("BOT_STATUS").ok();
        if let Ok(priority) = std::env::var("BOT_PRIORITY") {
            config.presence.priority =
                Some(priority.parse().context("BOT_PRIORITY must be an integer")?);
        }
        Ok(config)
    }

    pub(crate) fn validate(&self) -> jbot_core::Result<()> {
        if self.jabber_id.trim().is_empty() {
            return Err(BotError::Config("jabber id must not be empty".to_string()));
        }
        if self.password.is_empty() {
            return Err(BotError::Config("password must not be empty".to_string()));
        }
        if self.masters.iter().all(|master| master.trim().is_empty()) {
            return Err(BotError::Config("at least one master is required".to_string()));
        }
        Ok(())
    }
}
