//! Presence attributes: availability state, status text, priority.

use serde::{Deserialize, Serialize};

/// Availability state. [`Online`](Availability::Online) is the plain available state
/// and carries no `show` token on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    Online,
    Chat,
    Away,
    DoNotDisturb,
    ExtendedAway,
}

impl Availability {
    /// The XMPP `show` token for this state, or `None` for plain online.
    pub fn as_show(&self) -> Option<&'static str> {
        match self {
            Availability::Online => None,
            Availability::Chat => Some("chat"),
            Availability::Away => Some("away"),
            Availability::DoNotDisturb => Some("dnd"),
            Availability::ExtendedAway => Some("xa"),
        }
    }
}

/// A full presence stanza: every field optional. The bot re-sends the whole stanza
/// whenever any one attribute changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    pub availability: Option<Availability>,
    pub status: Option<String>,
    pub priority: Option<i8>,
}
