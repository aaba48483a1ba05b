//! A console transport: stdin lines arrive as chat messages from the configured
//! master, outgoing messages print to stdout. A demonstration harness, not a real
//! messaging backend.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use jbot_core::{BotError, Message, Presence, Result, Transport};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub struct ConsoleTransport {
    master: String,
    connected: AtomicBool,
    inbox: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
}

impl ConsoleTransport {
    /// `master` is the identity every stdin line is attributed to.
    pub fn new(master: String) -> Self {
        Self {
            master,
            connected: AtomicBool::new(false),
            inbox: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn connect(&self, jid: &str, _password: &str) -> Result<()> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.inbox.lock() = Some(rx);

        // blocking reader thread; ends when stdin closes or the receiver is dropped
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        self.connected.store(true, Ordering::SeqCst);
        info!(jid = %jid, "console transport up; type commands on stdin");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn set_presence(&self, presence: &Presence) -> Result<()> {
        info!(presence = ?presence, "presence updated");
        Ok(())
    }

    async fn send_message(&self, to: &str, body: &str) -> Result<()> {
        println!("[to {to}] {body}");
        Ok(())
    }

    async fn fetch_messages(&self) -> Result<Vec<Message>> {
        let mut inbox = self.inbox.lock();
        let receiver = inbox
            .as_mut()
            .ok_or_else(|| BotError::Transport("console transport not connected".to_string()))?;

        let mut messages = Vec::new();
        while let Ok(line) = receiver.try_recv() {
            if line.trim().is_empty() {
                continue;
            }
            debug!(line = %line, "stdin line received");
            messages.push(Message::chat(self.master.clone(), line));
        }
        Ok(messages)
    }

    async fn disconnect(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        *self.inbox.lock() = None;
        Ok(())
    }
}
