//! Jabber identifier helpers.

/// Strips the `/resource` suffix, if any, leaving the bare account identity.
/// Senders may write from any device resource; authorization compares bare identities.
pub fn bare(jid: &str) -> &str {
    match jid.find('/') {
        Some(index) => &jid[..index],
        None => jid,
    }
}

/// The part before `@`, used as the default display name.
pub fn local_part(jid: &str) -> &str {
    match jid.find('@') {
        Some(index) => &jid[..index],
        None => jid,
    }
}
