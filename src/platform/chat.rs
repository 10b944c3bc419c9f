//! Chat platform client seam

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::platform::error::ChatResult;
use crate::platform::types::{
    ChatIdentifier, ChatInfo, InlineKeyboard, Message, MessageId, MessageRef, ReplyMarkup,
};

/// Lazy sequence of channel messages, consumed once
pub type MessageStream<'a> = BoxStream<'a, ChatResult<Message>>;

/// Operations the indexing pipeline needs from the chat platform
///
/// Implementations handle authentication and transport. Every method is a
/// suspension point; none of them retry on flood waits, callers decide.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Resolve a chat, failing with `ChannelInvalid`/`UsernameInvalid` when
    /// the bot cannot see it
    async fn resolve_chat(&self, chat: &ChatIdentifier) -> ChatResult<ChatInfo>;

    /// Fetch one message; a missing message comes back with `empty` set
    async fn fetch_message(&self, chat: &ChatIdentifier, id: MessageId) -> ChatResult<Message>;

    /// Messages of `chat` up to and including `last_message_id`, oldest
    /// first, with the first `skip` entries dropped
    fn iter_messages<'a>(
        &'a self,
        chat: &'a ChatIdentifier,
        last_message_id: MessageId,
        skip: u32,
    ) -> MessageStream<'a>;

    async fn send_message(
        &self,
        chat: &ChatIdentifier,
        text: &str,
        reply_to: Option<MessageId>,
        markup: Option<ReplyMarkup>,
    ) -> ChatResult<Message>;

    async fn edit_message(
        &self,
        target: &MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> ChatResult<()>;

    async fn delete_message(&self, target: &MessageRef) -> ChatResult<()>;
}
