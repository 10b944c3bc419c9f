//! Indexing pipeline data types

use serde::Serialize;
use std::fmt;

use crate::indexer::config::IndexConfig;
use crate::platform::api::{ChatIdentifier, MediaRecord, Message, MessageId, SaveOutcome};

/// Channel and message id a scan starts from, as resolved from a link or forward
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSource {
    pub chat: ChatIdentifier,
    pub last_message_id: MessageId,
}

/// One index job: the range to scan and the entries to skip
///
/// Immutable once confirmed; round-trips through the callback payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRequest {
    pub chat: ChatIdentifier,
    pub last_message_id: MessageId,
    pub skip: u32,
}

impl ScanRequest {
    pub fn new(source: ScanSource, skip: u32) -> Self {
        Self {
            chat: source.chat,
            last_message_id: source.last_message_id,
            skip,
        }
    }
}

impl fmt::Display for ScanRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} up to #{} (skip {})",
            self.chat, self.last_message_id, self.skip
        )
    }
}

/// Per-job tallies, reset at job start and only ever incremented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanCounters {
    /// Messages taken from the iteration, excluding the skipped offset
    pub processed: u64,
    pub saved: u64,
    pub duplicate: u64,
    pub deleted: u64,
    pub no_media: u64,
    pub unsupported: u64,
    pub errors: u64,
}

impl ScanCounters {
    /// Count a catalog save result for an eligible message
    pub fn record_save(&mut self, outcome: &SaveOutcome) {
        match outcome {
            SaveOutcome::Saved => self.saved += 1,
            SaveOutcome::Duplicate => self.duplicate += 1,
            SaveOutcome::Failed { .. } => self.errors += 1,
        }
    }

    /// Count a message that never reaches the catalog
    pub fn record_skipped(&mut self, disposition: &MessageDisposition) {
        match disposition {
            MessageDisposition::Deleted => self.deleted += 1,
            MessageDisposition::NoMedia => self.no_media += 1,
            MessageDisposition::UnsupportedType | MessageDisposition::UnsupportedExtension => {
                self.unsupported += 1
            }
            MessageDisposition::Eligible(_) => {}
        }
    }

    /// Messages that carried nothing indexable
    pub fn non_media(&self) -> u64 {
        self.no_media + self.unsupported
    }
}

/// Classification of one scanned message
#[derive(Debug, Clone, PartialEq)]
pub enum MessageDisposition {
    Deleted,
    NoMedia,
    UnsupportedType,
    UnsupportedExtension,
    /// Ready for the catalog, caption attached
    Eligible(MediaRecord),
}

impl MessageDisposition {
    pub fn label(&self) -> &'static str {
        match self {
            MessageDisposition::Deleted => "deleted",
            MessageDisposition::NoMedia => "no media",
            MessageDisposition::UnsupportedType => "unsupported type",
            MessageDisposition::UnsupportedExtension => "unsupported extension",
            MessageDisposition::Eligible(_) => "eligible",
        }
    }
}

/// Classify a message against the configured extension allow-list
pub fn classify(message: &Message, config: &IndexConfig) -> MessageDisposition {
    if message.empty {
        return MessageDisposition::Deleted;
    }
    let Some(media) = &message.media else {
        return MessageDisposition::NoMedia;
    };
    let Some((kind, file)) = media.file() else {
        return MessageDisposition::UnsupportedType;
    };
    match file.file_name.as_deref() {
        Some(name) if config.allows_file_name(name) => MessageDisposition::Eligible(
            MediaRecord::from_file(kind, file, message.caption.clone()),
        ),
        _ => MessageDisposition::UnsupportedExtension,
    }
}
