//! Runtime settings consumed by the indexing pipeline

use std::collections::BTreeSet;

/// Extensions indexed when none are configured
pub const DEFAULT_EXTENSIONS: &[&str] = &["mkv", "mp4", "avi", "webm", "mov", "m4v", "ts"];

/// Progress surface is refreshed every this many processed messages
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 30;

/// Operator list, extension allow-list and reporting settings
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    /// Users allowed to confirm and cancel index jobs
    pub admins: BTreeSet<i64>,
    /// Lowercase extensions without the leading dot
    pub index_extensions: Vec<String>,
    /// Chat receiving a one-line summary after every job
    pub log_channel: Option<i64>,
    pub progress_interval: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            admins: BTreeSet::new(),
            index_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            log_channel: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl IndexConfig {
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admins.contains(&user_id)
    }

    /// Case-insensitive `.<ext>` suffix match against the allow-list
    pub fn allows_file_name(&self, file_name: &str) -> bool {
        let lowered = file_name.to_lowercase();
        self.index_extensions
            .iter()
            .any(|ext| lowered.ends_with(&format!(".{ext}")))
    }
}
