//! The intake loop: pull messages from the transport, dispatch one at a time,
//! deliver replies to the sender.

use std::sync::Arc;

use jbot_core::{jid, MessageKind, Result};
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use crate::bot::Bot;

/// Runs until the transport reports it is no longer connected; a fetch error ends the
/// loop and surfaces to the caller. Each chat message is dispatched inside its own
/// task which is awaited before the next message is touched: one dispatch at a time,
/// in arrival order, with the task boundary containing handler panics.
pub(crate) async fn run(bot: &Bot) -> Result<()> {
    loop {
        if !bot.transport().is_connected() {
            info!("transport no longer connected, intake loop ending");
            return Ok(());
        }

        let batch = bot.transport().fetch_messages().await?;
        if batch.is_empty() {
            tokio::time::sleep(bot.poll_interval()).await;
            continue;
        }

        for message in batch {
            if message.kind != MessageKind::Chat {
                debug!(kind = ?message.kind, from = %message.from, "ignoring non-chat message");
                continue;
            }

            let sender = jid::bare(&message.from).to_string();
            let body = message.body;
            let dispatcher = bot.dispatcher().clone();
            let transport = Arc::clone(bot.transport());

            let mut task = tokio::spawn(async move {
                if let Some(reply) = dispatcher.dispatch(&sender, &body).await {
                    if let Err(error) = transport.send_message(&sender, &reply).await {
                        warn!(recipient = %sender, error = %error, "failed to deliver reply");
                    }
                }
            });

            match bot.dispatch_timeout() {
                Some(limit) => match tokio::time::timeout(limit, &mut task).await {
                    Ok(joined) => log_join_outcome(joined),
                    Err(_) => {
                        task.abort();
                        warn!(limit = ?limit, "dispatch exceeded its deadline, reply dropped");
                    }
                },
                None => log_join_outcome(task.await),
            }
        }
    }
}

fn log_join_outcome(joined: std::result::Result<(), JoinError>) {
    if let Err(error) = joined {
        if error.is_panic() {
            warn!("command handler panicked, message dropped");
        }
    }
}
