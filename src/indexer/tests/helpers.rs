//! Shared fixtures for indexer unit tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::indexer::config::IndexConfig;
use crate::indexer::controller::JobController;
use crate::indexer::handshake::IntakeHandshake;
use crate::indexer::runner::JobRunner;
use crate::indexer::service::IndexService;
use crate::indexer::types::ScanRequest;
use crate::platform::api::{
    CatalogStore, ChannelFixture, ChatIdentifier, ChatInfo, ChatKind, FileInfo, Media,
    MediaRecord, MemoryCatalog, MemoryChat, Message, MessageId, MessageRef, ReplyMarkup,
    SaveOutcome, TranscriptEntry,
};

pub const CHANNEL_ID: i64 = -1001234567;
pub const CHANNEL_NAME: &str = "examplechan";
pub const OPERATOR: i64 = 777;
pub const STRANGER: i64 = 555;

pub fn video(id: MessageId, file_name: &str) -> Message {
    Message {
        id,
        caption: Some(format!("caption {id}")),
        media: Some(Media::Video(FileInfo {
            file_id: format!("file-{id}"),
            file_unique_id: format!("unique-{id}"),
            file_name: Some(file_name.to_string()),
            file_size: 1_000_000,
            mime_type: Some("video/mp4".to_string()),
        })),
        ..Default::default()
    }
}

/// Eligible videos for every id in the range
pub fn videos(ids: std::ops::RangeInclusive<MessageId>) -> Vec<Message> {
    ids.map(|id| video(id, &format!("episode-{id}.mp4"))).collect()
}

pub fn channel(messages: Vec<Message>) -> ChannelFixture {
    ChannelFixture {
        chat: ChatInfo {
            id: CHANNEL_ID,
            username: Some(CHANNEL_NAME.to_string()),
            title: Some("Example Channel".to_string()),
            kind: ChatKind::Channel,
        },
        messages,
    }
}

pub fn request(last_message_id: MessageId, skip: u32) -> ScanRequest {
    ScanRequest {
        chat: ChatIdentifier::Username(CHANNEL_NAME.to_string()),
        last_message_id,
        skip,
    }
}

/// Catalog that requests cancellation from inside its `after`-th save
pub struct CancellingCatalog {
    pub inner: MemoryCatalog,
    controller: Arc<JobController>,
    after: usize,
    saves: AtomicUsize,
}

impl CancellingCatalog {
    pub fn new(controller: Arc<JobController>, after: usize) -> Self {
        Self {
            inner: MemoryCatalog::new(),
            controller,
            after,
            saves: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CatalogStore for CancellingCatalog {
    async fn save(&self, record: MediaRecord) -> SaveOutcome {
        let outcome = self.inner.save(record).await;
        if self.saves.fetch_add(1, Ordering::SeqCst) + 1 == self.after {
            self.controller.request_cancel();
        }
        outcome
    }
}

/// In-memory platform plus the shared pipeline state
/// Catalog whose saves take `delay`, keeping a job in flight under paused time
pub struct SlowCatalog {
    pub inner: MemoryCatalog,
    delay: Duration,
}

impl SlowCatalog {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryCatalog::new(),
            delay,
        }
    }
}

#[async_trait]
impl CatalogStore for SlowCatalog {
    async fn save(&self, record: MediaRecord) -> SaveOutcome {
        tokio::time::sleep(self.delay).await;
        self.inner.save(record).await
    }
}

pub struct Harness {
    pub chat: Arc<MemoryChat>,
    pub catalog: Arc<MemoryCatalog>,
    pub controller: Arc<JobController>,
    pub config: Arc<IndexConfig>,
}

impl Harness {
    pub fn new(messages: Vec<Message>) -> Self {
        Self::with_config(
            messages,
            IndexConfig {
                admins: [OPERATOR].into_iter().collect(),
                ..Default::default()
            },
        )
    }

    pub fn with_config(messages: Vec<Message>, config: IndexConfig) -> Self {
        let chat = Arc::new(MemoryChat::new());
        chat.add_channel(channel(messages)).unwrap();
        Self {
            chat,
            catalog: Arc::new(MemoryCatalog::new()),
            controller: Arc::new(JobController::new()),
            config: Arc::new(config),
        }
    }

    pub fn runner(&self) -> JobRunner {
        JobRunner::new(
            self.chat.clone(),
            self.catalog.clone(),
            self.controller.clone(),
            self.config.clone(),
        )
    }

    pub fn handshake(&self) -> IntakeHandshake {
        IntakeHandshake::new(self.chat.clone(), self.config.clone())
    }

    pub fn service(&self) -> IndexService {
        IndexService::new(
            self.chat.clone(),
            self.catalog.clone(),
            self.config.clone(),
            self.controller.clone(),
        )
    }

    pub fn service_with_catalog(&self, catalog: Arc<dyn CatalogStore>) -> IndexService {
        IndexService::new(
            self.chat.clone(),
            catalog,
            self.config.clone(),
            self.controller.clone(),
        )
    }

    /// Text of the most recent edit of `surface`
    pub fn last_edit_of(&self, surface: &MessageRef) -> Option<String> {
        self.chat
            .transcript()
            .into_iter()
            .rev()
            .find_map(|entry| match entry {
                TranscriptEntry::Edited { target, text, .. } if &target == surface => Some(text),
                _ => None,
            })
    }

    /// A bot message in the operator's chat to report progress on
    pub fn surface(&self) -> MessageRef {
        self.chat
            .receive(Message {
                chat: ChatIdentifier::Numeric(OPERATOR),
                text: Some("Starting Indexing...".to_string()),
                ..Default::default()
            })
            .unwrap()
            .reference()
    }

    /// An incoming private message from `user`
    pub fn incoming(&self, user: i64, text: &str) -> Message {
        self.chat
            .receive(Message {
                chat: ChatIdentifier::Numeric(user),
                from_user: Some(user),
                text: Some(text.to_string()),
                ..Default::default()
            })
            .unwrap()
    }

    /// A reply from `user` to the prompt at `prompt`
    pub fn reply_to_prompt(&self, user: i64, prompt: &MessageRef, text: &str) -> Message {
        let parent = self.chat.conversation_message(prompt).unwrap();
        assert_eq!(parent.reply_markup, Some(ReplyMarkup::ForceReply));
        self.chat
            .receive(Message {
                chat: ChatIdentifier::Numeric(user),
                from_user: Some(user),
                text: Some(text.to_string()),
                reply_to: Some(Box::new(parent)),
                ..Default::default()
            })
            .unwrap()
    }

    pub fn edits(&self) -> Vec<String> {
        self.chat
            .transcript()
            .into_iter()
            .filter_map(|entry| match entry {
                TranscriptEntry::Edited { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn sent(&self) -> Vec<String> {
        self.chat
            .transcript()
            .into_iter()
            .filter_map(|entry| match entry {
                TranscriptEntry::Sent { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }
}
