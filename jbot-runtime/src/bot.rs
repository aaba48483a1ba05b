//! The bot engine: wiring, the registration phase, connect/disconnect with master
//! notices, and presence mutation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use command_engine::{
    register_builtin_help, AuthPolicy, Command, CommandHandler, CommandRegistry, Dispatcher,
};
use jbot_core::{jid, Availability, BotError, Presence, Result, Transport};
use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};

use crate::config::BotConfig;
use crate::intake;

/// A command bot over a [`Transport`]. Commands are registered before
/// [`connect`](Bot::connect); the registry is read-only while the intake loop runs.
pub struct Bot {
    name: String,
    jabber_id: String,
    password: String,
    masters: Vec<String>,
    transport: Arc<dyn Transport>,
    registry: Arc<RwLock<CommandRegistry>>,
    dispatcher: Dispatcher,
    presence: Mutex<Presence>,
    poll_interval: Duration,
    dispatch_timeout: Option<Duration>,
    serving: AtomicBool,
}

impl Bot {
    /// Validates the configuration, derives the display name, builds the policy and
    /// registry, and registers the built-in help command.
    pub fn new(config: BotConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;

        let name = config
            .name
            .clone()
            .unwrap_or_else(|| jid::local_part(&config.jabber_id).to_string());
        // masters are compared against bare sender identities
        let masters: Vec<String> = config
            .masters
            .iter()
            .map(|master| jid::bare(master).to_string())
            .collect();

        let policy = AuthPolicy::new(masters.iter().cloned(), config.is_public);
        let registry = Arc::new(RwLock::new(CommandRegistry::new()));
        register_builtin_help(&registry, &policy)?;
        let dispatcher = Dispatcher::new(Arc::clone(&registry), policy);

        Ok(Self {
            name,
            jabber_id: config.jabber_id,
            password: config.password,
            masters,
            transport,
            registry,
            dispatcher,
            presence: Mutex::new(config.presence),
            poll_interval: config.poll_interval,
            dispatch_timeout: config.dispatch_timeout,
            serving: AtomicBool::new(false),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a caller command. Refused once serving has begun.
    pub fn register_command(&self, command: Command, handler: Arc<dyn CommandHandler>) -> Result<()> {
        if self.serving.load(Ordering::SeqCst) {
            return Err(BotError::Config(
                "commands must be registered before connect".to_string(),
            ));
        }
        self.registry.write().register(command, handler)
    }

    /// Connects the transport, announces presence, sends the duty notice to the
    /// masters, and runs the intake loop. Does not return until the loop ends: on
    /// transport death, on a fetch error, or after an interrupt (which performs a
    /// best-effort disconnect first).
    pub async fn connect(&self) -> Result<()> {
        self.transport.connect(&self.jabber_id, &self.password).await?;
        self.serving.store(true, Ordering::SeqCst);
        info!(name = %self.name, jid = %self.jabber_id, "connected");

        self.announce_presence().await?;
        self.deliver(&self.masters, &format!("{} reporting for duty.", self.name))
            .await;

        tokio::select! {
            result = intake::run(self) => result,
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, shutting down");
                if let Err(error) = self.disconnect().await {
                    warn!(error = %error, "disconnect after interrupt failed");
                }
                Ok(())
            }
        }
    }

    /// Sends the disconnect notice to the masters and tears the session down. A no-op
    /// when the transport is already gone.
    pub async fn disconnect(&self) -> Result<()> {
        if !self.transport.is_connected() {
            return Ok(());
        }
        self.deliver(&self.masters, "Disconnecting...").await;
        self.transport.disconnect().await
    }

    /// Direct dispatch entry for embedders and tests: the same path the intake loop
    /// takes, minus the per-message task boundary.
    pub async fn dispatch_message(&self, sender: &str, body: &str) -> Option<String> {
        self.dispatcher.dispatch(jid::bare(sender), body).await
    }

    /// The current presence attributes.
    pub fn presence(&self) -> Presence {
        self.presence.lock().clone()
    }

    pub async fn set_availability(&self, availability: Option<Availability>) -> Result<()> {
        self.presence.lock().availability = availability;
        self.announce_presence().await
    }

    pub async fn set_status(&self, status: Option<String>) -> Result<()> {
        self.presence.lock().status = status;
        self.announce_presence().await
    }

    pub async fn set_priority(&self, priority: Option<i8>) -> Result<()> {
        self.presence.lock().priority = priority;
        self.announce_presence().await
    }

    /// Replaces all presence attributes at once.
    pub async fn set_presence(&self, presence: Presence) -> Result<()> {
        *self.presence.lock() = presence;
        self.announce_presence().await
    }

    /// Re-sends the full stanza when connected; the attributes are retained either
    /// way and announced on the next connect.
    async fn announce_presence(&self) -> Result<()> {
        let stanza = self.presence.lock().clone();
        if self.transport.is_connected() {
            self.transport.set_presence(&stanza).await?;
        }
        Ok(())
    }

    /// Fire-and-forget delivery to each recipient independently; failures are logged,
    /// not propagated.
    pub(crate) async fn deliver(&self, recipients: &[String], text: &str) {
        for recipient in recipients {
            if let Err(error) = self.transport.send_message(recipient, text).await {
                warn!(recipient = %recipient, error = %error, "failed to deliver message");
            }
        }
    }

    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub(crate) fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub(crate) fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub(crate) fn dispatch_timeout(&self) -> Option<Duration> {
        self.dispatch_timeout
    }
}
