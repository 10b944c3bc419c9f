//! In-memory chat platform
//!
//! Holds channel fixtures and private conversations, records everything the
//! bot sends, edits and deletes, and can be scripted to fail specific
//! operations (flood waits, access errors, broken iteration).

use async_trait::async_trait;
use futures::stream;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use crate::core::sync::handle_mutex_poison;
use crate::platform::chat::{ChatClient, MessageStream};
use crate::platform::error::{ChatError, ChatResult};
use crate::platform::types::{
    ChatIdentifier, ChatInfo, ChatKind, InlineKeyboard, Message, MessageId, MessageRef,
    ReplyMarkup,
};

/// A channel and its message history, as loaded from a JSON fixture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelFixture {
    pub chat: ChatInfo,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Operations that can be scripted to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatOperation {
    Resolve,
    Fetch,
    Send,
    Edit,
    Delete,
}

/// One observable action the bot performed
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEntry {
    Sent {
        target: MessageRef,
        text: String,
        markup: Option<ReplyMarkup>,
    },
    Edited {
        target: MessageRef,
        text: String,
        keyboard: Option<InlineKeyboard>,
    },
    Deleted {
        target: MessageRef,
    },
}

impl TranscriptEntry {
    pub fn text(&self) -> Option<&str> {
        match self {
            TranscriptEntry::Sent { text, .. } | TranscriptEntry::Edited { text, .. } => {
                Some(text)
            }
            TranscriptEntry::Deleted { .. } => None,
        }
    }
}

struct Channel {
    info: ChatInfo,
    messages: BTreeMap<MessageId, Message>,
}

#[derive(Default)]
struct ChatState {
    channels: Vec<Channel>,
    conversations: HashMap<ChatIdentifier, BTreeMap<MessageId, Message>>,
    transcript: Vec<TranscriptEntry>,
    faults: HashMap<ChatOperation, VecDeque<ChatError>>,
    iteration_fault: Option<(usize, ChatError)>,
    next_message_id: MessageId,
}

impl ChatState {
    fn channel(&self, chat: &ChatIdentifier) -> Option<&Channel> {
        self.channels.iter().find(|c| c.info.is_addressed_by(chat))
    }

    fn take_fault(&mut self, operation: ChatOperation) -> ChatResult<()> {
        match self.faults.get_mut(&operation).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn allocate_id(&mut self) -> MessageId {
        self.next_message_id += 1;
        self.next_message_id
    }
}

/// In-memory [`ChatClient`]
pub struct MemoryChat {
    state: Mutex<ChatState>,
}

impl Default for MemoryChat {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryChat {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ChatState {
                next_message_id: 10_000,
                ..Default::default()
            }),
        }
    }

    fn lock(&self) -> ChatResult<MutexGuard<'_, ChatState>> {
        handle_mutex_poison(self.state.lock(), ChatError::api)
    }

    /// Register a channel and its history
    pub fn add_channel(&self, fixture: ChannelFixture) -> ChatResult<()> {
        let chat = ChatIdentifier::Numeric(fixture.chat.id);
        let messages = fixture
            .messages
            .into_iter()
            .map(|mut message| {
                message.chat = chat.clone();
                message.chat_kind = fixture.chat.kind;
                (message.id, message)
            })
            .collect();
        self.lock()?.channels.push(Channel {
            info: fixture.chat,
            messages,
        });
        Ok(())
    }

    /// Deliver an incoming message into its conversation, assigning an id if unset
    pub fn receive(&self, mut message: Message) -> ChatResult<Message> {
        let mut state = self.lock()?;
        if message.id == 0 {
            message.id = state.allocate_id();
        }
        state
            .conversations
            .entry(message.chat.clone())
            .or_default()
            .insert(message.id, message.clone());
        Ok(message)
    }

    /// Make the next call of `operation` fail with `error`
    pub fn fail_next(&self, operation: ChatOperation, error: ChatError) -> ChatResult<()> {
        self.lock()?
            .faults
            .entry(operation)
            .or_default()
            .push_back(error);
        Ok(())
    }

    /// Make the next iteration yield `error` after `after` messages
    pub fn fail_iteration_after(&self, after: usize, error: ChatError) -> ChatResult<()> {
        self.lock()?.iteration_fault = Some((after, error));
        Ok(())
    }

    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.lock()
            .map(|state| state.transcript.clone())
            .unwrap_or_default()
    }

    /// Texts of all sent and edited messages, in order
    pub fn texts(&self) -> Vec<String> {
        self.transcript()
            .iter()
            .filter_map(|entry| entry.text().map(str::to_string))
            .collect()
    }

    /// Current content of a conversation message, if it still exists
    pub fn conversation_message(&self, target: &MessageRef) -> Option<Message> {
        let state = self.lock().ok()?;
        state.conversations.get(&target.chat)?.get(&target.id).cloned()
    }
}

#[async_trait]
impl ChatClient for MemoryChat {
    async fn resolve_chat(&self, chat: &ChatIdentifier) -> ChatResult<ChatInfo> {
        let mut state = self.lock()?;
        state.take_fault(ChatOperation::Resolve)?;
        if let Some(channel) = state.channel(chat) {
            return Ok(channel.info.clone());
        }
        match chat {
            ChatIdentifier::Username(_) => Err(ChatError::UsernameInvalid),
            ChatIdentifier::Numeric(_) => Err(ChatError::ChannelInvalid),
        }
    }

    async fn fetch_message(&self, chat: &ChatIdentifier, id: MessageId) -> ChatResult<Message> {
        let mut state = self.lock()?;
        state.take_fault(ChatOperation::Fetch)?;
        let found = match state.channel(chat) {
            Some(channel) => channel.messages.get(&id).cloned(),
            None => state
                .conversations
                .get(chat)
                .and_then(|messages| messages.get(&id).cloned()),
        };
        Ok(found.unwrap_or_else(|| Message::empty(chat.clone(), id)))
    }

    fn iter_messages<'a>(
        &'a self,
        chat: &'a ChatIdentifier,
        last_message_id: MessageId,
        skip: u32,
    ) -> MessageStream<'a> {
        let snapshot = self.lock().map(|mut state| {
            let fault = state.iteration_fault.take();
            let messages: Vec<Message> = state
                .channel(chat)
                .map(|channel| {
                    channel
                        .messages
                        .range(..=last_message_id)
                        .skip(skip as usize)
                        .map(|(_, message)| message.clone())
                        .collect()
                })
                .unwrap_or_default();
            (messages, fault)
        });

        let items: Vec<ChatResult<Message>> = match snapshot {
            Ok((messages, None)) => messages.into_iter().map(Ok).collect(),
            Ok((messages, Some((after, error)))) => messages
                .into_iter()
                .take(after)
                .map(Ok)
                .chain(std::iter::once(Err(error)))
                .collect(),
            Err(error) => vec![Err(error)],
        };
        Box::pin(stream::iter(items))
    }

    async fn send_message(
        &self,
        chat: &ChatIdentifier,
        text: &str,
        reply_to: Option<MessageId>,
        markup: Option<ReplyMarkup>,
    ) -> ChatResult<Message> {
        let mut state = self.lock()?;
        state.take_fault(ChatOperation::Send)?;
        let id = state.allocate_id();
        let replied = reply_to.and_then(|reply_id| {
            state
                .conversations
                .get(chat)
                .and_then(|messages| messages.get(&reply_id))
                .cloned()
                .map(Box::new)
        });
        let message = Message {
            id,
            chat: chat.clone(),
            chat_kind: ChatKind::Private,
            text: Some(text.to_string()),
            reply_to: replied,
            reply_markup: markup.clone(),
            ..Default::default()
        };
        state
            .conversations
            .entry(chat.clone())
            .or_default()
            .insert(id, message.clone());
        state.transcript.push(TranscriptEntry::Sent {
            target: message.reference(),
            text: text.to_string(),
            markup,
        });
        Ok(message)
    }

    async fn edit_message(
        &self,
        target: &MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> ChatResult<()> {
        let mut state = self.lock()?;
        state.take_fault(ChatOperation::Edit)?;
        if let Some(message) = state
            .conversations
            .get_mut(&target.chat)
            .and_then(|messages| messages.get_mut(&target.id))
        {
            message.text = Some(text.to_string());
            message.reply_markup = keyboard.clone().map(ReplyMarkup::Inline);
        }
        state.transcript.push(TranscriptEntry::Edited {
            target: target.clone(),
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn delete_message(&self, target: &MessageRef) -> ChatResult<()> {
        let mut state = self.lock()?;
        state.take_fault(ChatOperation::Delete)?;
        if let Some(messages) = state.conversations.get_mut(&target.chat) {
            messages.remove(&target.id);
        }
        state.transcript.push(TranscriptEntry::Deleted {
            target: target.clone(),
        });
        Ok(())
    }
}
