//! Platform message model
//!
//! Only the fields the indexing pipeline reads are modelled. Everything
//! derives serde so channel fixtures can be loaded from JSON.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform message identifier
pub type MessageId = i64;

/// Marker prepended to the numeric token of a private-channel permalink
pub const PRIVATE_CHANNEL_PREFIX: &str = "-100";

/// A channel or chat addressed either by public username or numeric id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatIdentifier {
    Numeric(i64),
    Username(String),
}

impl Default for ChatIdentifier {
    fn default() -> Self {
        ChatIdentifier::Numeric(0)
    }
}

impl ChatIdentifier {
    /// Build the numeric id of a private channel from its permalink token
    ///
    /// `1234567` becomes `-1001234567`. Returns `None` if the token is not
    /// all digits or the result overflows.
    pub fn private_channel(token: &str) -> Option<Self> {
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        format!("{PRIVATE_CHANNEL_PREFIX}{token}")
            .parse::<i64>()
            .ok()
            .map(ChatIdentifier::Numeric)
    }
}

impl fmt::Display for ChatIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatIdentifier::Numeric(id) => write!(f, "{id}"),
            ChatIdentifier::Username(name) => write!(f, "{name}"),
        }
    }
}

/// Error returned when a chat identifier string is empty or malformed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid chat identifier: '{0}'")]
pub struct InvalidChatIdentifier(pub String);

impl FromStr for ChatIdentifier {
    type Err = InvalidChatIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = s.parse::<i64>() {
            return Ok(ChatIdentifier::Numeric(id));
        }
        let valid_username =
            !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid_username {
            Ok(ChatIdentifier::Username(s.to_string()))
        } else {
            Err(InvalidChatIdentifier(s.to_string()))
        }
    }
}

impl From<i64> for ChatIdentifier {
    fn from(id: i64) -> Self {
        ChatIdentifier::Numeric(id)
    }
}

impl From<&str> for ChatIdentifier {
    fn from(name: &str) -> Self {
        ChatIdentifier::Username(name.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    #[default]
    Private,
    Bot,
    Group,
    Supergroup,
    Channel,
}

/// Resolved chat metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatInfo {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub kind: ChatKind,
}

impl ChatInfo {
    /// Identifier preferred for addressing this chat: username if present
    pub fn identifier(&self) -> ChatIdentifier {
        match &self.username {
            Some(name) => ChatIdentifier::Username(name.clone()),
            None => ChatIdentifier::Numeric(self.id),
        }
    }

    pub fn is_addressed_by(&self, identifier: &ChatIdentifier) -> bool {
        match identifier {
            ChatIdentifier::Numeric(id) => *id == self.id,
            ChatIdentifier::Username(name) => self
                .username
                .as_deref()
                .is_some_and(|own| own.eq_ignore_ascii_case(name)),
        }
    }
}

/// File metadata shared by the media kinds that can be catalogued
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FileInfo {
    pub file_id: String,
    pub file_unique_id: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// The two media kinds eligible for cataloguing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Video,
    Document,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Document => write!(f, "document"),
        }
    }
}

/// Media payload of a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Media {
    Video(FileInfo),
    Document(FileInfo),
    /// Photos, audio, stickers, polls and everything else
    Unsupported { kind: String },
}

impl Media {
    /// The recognised kind and its file metadata, if any
    pub fn file(&self) -> Option<(MediaKind, &FileInfo)> {
        match self {
            Media::Video(info) => Some((MediaKind::Video, info)),
            Media::Document(info) => Some((MediaKind::Document, info)),
            Media::Unsupported { .. } => None,
        }
    }
}

/// Where a forwarded message originally came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardOrigin {
    pub chat_kind: ChatKind,
    pub chat_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    pub message_id: MessageId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback_data: callback_data.into(),
        }
    }
}

/// Rows of inline buttons attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    /// One button per row
    pub fn single_column(buttons: Vec<InlineButton>) -> Self {
        Self {
            rows: buttons.into_iter().map(|button| vec![button]).collect(),
        }
    }

    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.rows.iter().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyMarkup {
    /// Ask the client to open a reply to this message
    ForceReply,
    Inline(InlineKeyboard),
}

/// Address of a single message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub chat: ChatIdentifier,
    pub id: MessageId,
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.chat, self.id)
    }
}

/// A platform message
///
/// `empty` marks a reference to a message that no longer exists (deleted or
/// never accessible); the platform still returns a stub for it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    #[serde(default)]
    pub chat: ChatIdentifier,
    #[serde(default)]
    pub chat_kind: ChatKind,
    #[serde(default)]
    pub from_user: Option<i64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub media: Option<Media>,
    #[serde(default)]
    pub forward_origin: Option<ForwardOrigin>,
    #[serde(default)]
    pub reply_to: Option<Box<Message>>,
    #[serde(default)]
    pub reply_markup: Option<ReplyMarkup>,
    #[serde(default)]
    pub empty: bool,
}

impl Message {
    /// Stub for a message that does not exist
    pub fn empty(chat: ChatIdentifier, id: MessageId) -> Self {
        Self {
            id,
            chat,
            empty: true,
            ..Default::default()
        }
    }

    pub fn reference(&self) -> MessageRef {
        MessageRef {
            chat: self.chat.clone(),
            id: self.id,
        }
    }

    pub fn is_private(&self) -> bool {
        self.chat_kind == ChatKind::Private
    }

    pub fn awaits_forced_reply(&self) -> bool {
        matches!(self.reply_markup, Some(ReplyMarkup::ForceReply))
    }
}

/// An inline button press
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from_user: i64,
    /// The message carrying the pressed button
    pub message: Message,
    pub data: String,
}

/// Incoming platform event routed by the index service
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Message(Message),
    Callback(CallbackQuery),
}
