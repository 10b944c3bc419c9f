//! Source resolution
//!
//! Turns an intake message into the chat and message id to scan from. Two
//! forms are understood: a permalink in the message text, or a message
//! forwarded from a channel. Anything else is not an index request.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::indexer::error::{IntakeError, IntakeResult};
use crate::indexer::types::ScanSource;
use crate::platform::api::{ChatIdentifier, ChatKind, Message};

static PERMALINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(https://)?(t\.me/|telegram\.me/|telegram\.dog/)(c/)?(\d+|[a-zA-Z_0-9]+)/(\d+)$")
        .expect("permalink pattern is valid")
});

/// Resolve an intake message into a scan source
///
/// Returns `Ok(None)` when the message is neither a permalink nor a channel
/// forward. Text containing a permalink that is not at the start of the
/// message, or whose ids do not fit, is an [`IntakeError::InvalidLink`].
pub fn resolve(message: &Message) -> IntakeResult<Option<ScanSource>> {
    if let Some(text) = message.text.as_deref() {
        if let Some(source) = parse_link(text)? {
            return Ok(Some(source));
        }
    }
    Ok(forwarded_source(message))
}

/// Parse a permalink; one trailing newline after the id is allowed
pub fn parse_link(text: &str) -> IntakeResult<Option<ScanSource>> {
    let text = text.strip_suffix('\n').unwrap_or(text);
    let Some(captures) = PERMALINK.captures(text) else {
        return Ok(None);
    };
    if captures.get(0).map(|m| m.start()) != Some(0) {
        return Err(IntakeError::InvalidLink);
    }

    let token = &captures[4];
    let last_message_id = captures[5]
        .parse()
        .map_err(|_| IntakeError::InvalidLink)?;
    let chat = if token.bytes().all(|b| b.is_ascii_digit()) {
        ChatIdentifier::private_channel(token).ok_or(IntakeError::InvalidLink)?
    } else {
        ChatIdentifier::Username(token.to_string())
    };

    Ok(Some(ScanSource {
        chat,
        last_message_id,
    }))
}

/// Source of a message forwarded from a channel; other forwards are ignored
pub fn forwarded_source(message: &Message) -> Option<ScanSource> {
    let origin = message.forward_origin.as_ref()?;
    if origin.chat_kind != ChatKind::Channel {
        return None;
    }
    let chat = match &origin.username {
        Some(name) => ChatIdentifier::Username(name.clone()),
        None => ChatIdentifier::Numeric(origin.chat_id),
    };
    Some(ScanSource {
        chat,
        last_message_id: origin.message_id,
    })
}
