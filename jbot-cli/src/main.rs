//! jbot CLI: run the demo bot over a console transport. Config from env and .env;
//! the sample command set is `rand`/`r`, `puts <string>`, `puts! <string>`, and
//! `status <text>`.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use command_engine::{handler_fn, Command, CommandHandler};
use jbot_core::init_tracing;
use jbot_runtime::{Bot, BotConfig};
use rand::Rng;

mod console;

use console::ConsoleTransport;

#[derive(Parser)]
#[command(name = "jbot")]
#[command(about = "Command bot over a console transport", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demo bot (config from env; stdin lines arrive as the first master).
    Run {
        /// Make the bot public regardless of BOT_PUBLIC.
        #[arg(long)]
        public: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(std::env::var("LOG_FILE").ok().as_deref())?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { public } => run(public).await,
    }
}

async fn run(public: bool) -> Result<()> {
    let mut config = BotConfig::from_env()
        .context("Load bot config from env (JABBER_ID, JABBER_PASSWORD, JABBER_MASTERS)")?;
    if public {
        config.is_public = true;
    }

    let master = config
        .masters
        .first()
        .cloned()
        .context("JABBER_MASTERS must name at least one master")?;
    let transport = Arc::new(ConsoleTransport::new(master));
    let bot = Arc::new(Bot::new(config, transport)?);

    bot.register_command(
        Command::new("rand", "Produce a random number from 0 to 10", r"^rand$")
            .public()
            .alias("r", r"^r$"),
        handler_fn(|_, _| Some(rand::thread_rng().gen_range(0..=10).to_string())),
    )?;

    bot.register_command(
        Command::new("puts <string>", "Write something to stdout", r"^puts\s+.+$"),
        handler_fn(|sender, message| {
            println!("{sender} says '{message}'");
            Some(format!("'{message}' written to stdout"))
        }),
    )?;

    bot.register_command(
        Command::new(
            "puts! <string>",
            "Write something to stdout, without a response",
            r"^puts!\s+.+$",
        ),
        handler_fn(|sender, message| {
            println!("{sender} says '{message}'");
            None
        }),
    )?;

    bot.register_command(
        Command::new("status <text>", "Update the bot's status message", r"^status\s+.+$"),
        Arc::new(StatusHandler { bot: Arc::clone(&bot) }),
    )?;

    bot.connect().await?;
    Ok(())
}

/// Updates the bot's status text from chat; presence mutation driven by a handler.
struct StatusHandler {
    bot: Arc<Bot>,
}

#[async_trait]
impl CommandHandler for StatusHandler {
    async fn handle(&self, _sender: &str, args: &str) -> jbot_core::Result<Option<String>> {
        self.bot.set_status(Some(args.to_string())).await?;
        Ok(Some(format!("Status set to '{args}'")))
    }
}
