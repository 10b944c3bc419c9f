//! In-memory platform implementations
//!
//! Used by the integration tests and by `mediaindex replay`, which drives a
//! whole indexing session against a channel fixture loaded from JSON.

mod catalog;
mod chat;

pub use catalog::MemoryCatalog;
pub use chat::{ChannelFixture, ChatOperation, MemoryChat, TranscriptEntry};
