//! Platform API
//!
//! Public surface of the platform seams. Other modules import from here rather
//! than from the individual submodules.

pub use crate::platform::catalog::{CatalogStore, MediaRecord, SaveOutcome};
pub use crate::platform::chat::{ChatClient, MessageStream};
pub use crate::platform::error::{ChatError, ChatResult};
pub use crate::platform::memory::{
    ChannelFixture, ChatOperation, MemoryCatalog, MemoryChat, TranscriptEntry,
};
pub use crate::platform::types::{
    CallbackQuery, ChatIdentifier, ChatInfo, ChatKind, FileInfo, ForwardOrigin, InlineButton,
    InlineKeyboard, Media, MediaKind, Message, MessageId, MessageRef, ReplyMarkup, Update,
};
