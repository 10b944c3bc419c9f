//! Catalog store seam

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::platform::types::{FileInfo, MediaKind};

/// Media metadata handed to the catalog for one eligible message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub kind: MediaKind,
    pub file_id: String,
    pub file_unique_id: String,
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: Option<String>,
    pub caption: Option<String>,
}

impl MediaRecord {
    /// Build a record from a message's file metadata and caption
    pub fn from_file(kind: MediaKind, file: &FileInfo, caption: Option<String>) -> Self {
        Self {
            kind,
            file_id: file.file_id.clone(),
            file_unique_id: file.file_unique_id.clone(),
            file_name: file.file_name.clone().unwrap_or_default(),
            file_size: file.file_size,
            mime_type: file.mime_type.clone(),
            caption,
        }
    }
}

/// Result of a catalog save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Duplicate,
    Failed { reason: String },
}

/// Deduplicating persistence for media metadata
///
/// Duplicate detection is the store's responsibility; a record already
/// present yields `Duplicate` and is not stored twice.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn save(&self, record: MediaRecord) -> SaveOutcome;
}
