//! Command handler trait and closure adapter.

use std::sync::Arc;

use async_trait::async_trait;
use jbot_core::Result;

/// A command callback. Receives the sender's bare identity and the message text minus
/// the leading command token. `Some(reply)` is delivered back to the sender, `None`
/// means no reply; errors are caught at the dispatch boundary and logged.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, sender: &str, args: &str) -> Result<Option<String>>;
}

struct FnHandler<F> {
    callback: F,
}

#[async_trait]
impl<F> CommandHandler for FnHandler<F>
where
    F: Fn(&str, &str) -> Option<String> + Send + Sync + 'static,
{
    async fn handle(&self, sender: &str, args: &str) -> Result<Option<String>> {
        Ok((self.callback)(sender, args))
    }
}

/// Lifts a plain closure into a [`CommandHandler`].
pub fn handler_fn<F>(callback: F) -> Arc<dyn CommandHandler>
where
    F: Fn(&str, &str) -> Option<String> + Send + Sync + 'static,
{
    Arc::new(FnHandler { callback })
}
