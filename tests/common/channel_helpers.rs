//! Conversation driver for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mediaindex::indexer::api::{
    IndexCallback, IndexConfig, IndexService, IntakeOutcome, JobController, JobOutcome,
    SkipOutcome, UpdateOutcome,
};
use mediaindex::platform::api::{
    CallbackQuery, CatalogStore, ChannelFixture, ChatIdentifier, ChatInfo, ChatKind, FileInfo,
    Media, MediaRecord, MemoryCatalog, MemoryChat, Message, MessageRef, SaveOutcome,
    TranscriptEntry, Update,
};

pub const OPERATOR: i64 = 777;
pub const CHANNEL_ID: i64 = -1001234567;

pub fn demo_fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/examplechan.json")
}

pub fn demo_fixture() -> ChannelFixture {
    let contents = std::fs::read_to_string(demo_fixture_path()).unwrap();
    serde_json::from_str(&contents).unwrap()
}

/// `examplechan` holding one video per id in `ids`
pub fn video_channel(ids: std::ops::RangeInclusive<i64>) -> ChannelFixture {
    ChannelFixture {
        chat: ChatInfo {
            id: CHANNEL_ID,
            username: Some("examplechan".to_string()),
            title: Some("Example".to_string()),
            kind: ChatKind::Channel,
        },
        messages: ids
            .map(|id| Message {
                id,
                media: Some(Media::Video(FileInfo {
                    file_id: format!("vid-{id}"),
                    file_unique_id: format!("u-vid-{id}"),
                    file_name: Some(format!("part-{id}.mp4")),
                    ..Default::default()
                })),
                ..Default::default()
            })
            .collect(),
    }
}

/// Requests cancellation once `after` saves have gone through
pub struct CancelAfter {
    inner: Arc<MemoryCatalog>,
    controller: Arc<JobController>,
    after: usize,
    saves: AtomicUsize,
}

#[async_trait]
impl CatalogStore for CancelAfter {
    async fn save(&self, record: MediaRecord) -> SaveOutcome {
        let outcome = self.inner.save(record).await;
        if self.saves.fetch_add(1, Ordering::SeqCst) + 1 == self.after {
            self.controller.request_cancel();
        }
        outcome
    }
}

pub struct Bot {
    pub chat: Arc<MemoryChat>,
    pub catalog: Arc<MemoryCatalog>,
    pub controller: Arc<JobController>,
    pub service: IndexService,
}

impl Bot {
    pub fn new(fixture: ChannelFixture) -> Self {
        Self::build(fixture, None)
    }

    pub fn cancelling_after(fixture: ChannelFixture, after: usize) -> Self {
        Self::build(fixture, Some(after))
    }

    fn build(fixture: ChannelFixture, cancel_after: Option<usize>) -> Self {
        let chat = Arc::new(MemoryChat::new());
        chat.add_channel(fixture).unwrap();
        let catalog = Arc::new(MemoryCatalog::new());
        let controller = Arc::new(JobController::new());
        let store: Arc<dyn CatalogStore> = match cancel_after {
            Some(after) => Arc::new(CancelAfter {
                inner: catalog.clone(),
                controller: controller.clone(),
                after,
                saves: AtomicUsize::new(0),
            }),
            None => catalog.clone(),
        };
        let config = IndexConfig {
            admins: [OPERATOR].into_iter().collect(),
            ..Default::default()
        };
        let service = IndexService::new(chat.clone(), store, Arc::new(config), controller.clone());
        Self {
            chat,
            catalog,
            controller,
            service,
        }
    }

    /// Deliver a private message from `user`
    pub async fn send(&self, user: i64, message: Message) -> UpdateOutcome {
        let message = self
            .chat
            .receive(Message {
                chat: ChatIdentifier::Numeric(user),
                from_user: Some(user),
                ..message
            })
            .unwrap();
        self.service.dispatch(Update::Message(message)).await.unwrap()
    }

    pub async fn say(&self, user: i64, text: &str) -> UpdateOutcome {
        self.send(
            user,
            Message {
                text: Some(text.to_string()),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn answer(&self, user: i64, prompt: &MessageRef, text: &str) -> UpdateOutcome {
        let parent = self.chat.conversation_message(prompt).unwrap();
        self.send(
            user,
            Message {
                text: Some(text.to_string()),
                reply_to: Some(Box::new(parent)),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn press(&self, user: i64, surface: &MessageRef, data: &str) -> UpdateOutcome {
        let message = self.chat.conversation_message(surface).unwrap();
        self.service
            .dispatch(Update::Callback(CallbackQuery {
                id: format!("cb-{}", surface.id),
                from_user: user,
                message,
                data: data.to_string(),
            }))
            .await
            .unwrap()
    }

    /// Whole conversation as the operator: request, skip reply, confirm
    pub async fn index(&self, link: &str, skip: &str) -> JobOutcome {
        let UpdateOutcome::Intake(IntakeOutcome::Prompted(prompt)) = self.say(OPERATOR, link).await
        else {
            panic!("no skip prompt for {link}");
        };
        self.confirm(&prompt, skip).await
    }

    pub async fn confirm(&self, prompt: &MessageRef, skip: &str) -> JobOutcome {
        let UpdateOutcome::Skip(SkipOutcome::Confirmation { request, message }) =
            self.answer(OPERATOR, prompt, skip).await
        else {
            panic!("no confirmation after skip reply '{skip}'");
        };
        let data = IndexCallback::yes(request).to_string();
        match self.press(OPERATOR, &message, &data).await {
            UpdateOutcome::Job(outcome) => outcome,
            other => panic!("expected a job, got {other:?}"),
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.chat.texts()
    }

    pub fn last_edit(&self) -> Option<String> {
        self.chat
            .transcript()
            .into_iter()
            .rev()
            .find_map(|entry| match entry {
                TranscriptEntry::Edited { text, .. } => Some(text),
                _ => None,
            })
    }
}
