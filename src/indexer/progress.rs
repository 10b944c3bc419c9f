//! Operator-facing status text

use chrono::Utc;
use std::time::Duration;

use crate::core::time::readable_duration;
use crate::indexer::types::{ScanCounters, ScanRequest};

pub const SKIP_PROMPT: &str =
    "Send the skip message number.\n\nIf you don\u{2019}t want to skip any files, send 0.";

pub const INVALID_SKIP_WARNING: &str = "Invalid number provided; using 0 as a skip number.";

pub const STARTING: &str = "Starting Indexing...";

pub const CANCELLING: &str = "Trying to cancel Indexing...";

pub fn confirmation(request: &ScanRequest) -> String {
    format!(
        "Do you want to index this channel/group?\n\nChat ID/Username: {}\nLast Message ID: {}",
        request.chat, request.last_message_id
    )
}

/// Periodic progress; `current` includes the skipped offset
pub fn progress(current: u64, counters: &ScanCounters) -> String {
    format!(
        "Processed messages: {current}, Saved: {}, Duplicates: {}, Deleted: {}, Non-media: {}, Errors: {}",
        counters.saved,
        counters.duplicate,
        counters.deleted,
        counters.non_media(),
        counters.errors
    )
}

pub fn cancelled(elapsed: Duration) -> String {
    format!(
        "Indexing canceled. Completed in {}.",
        readable_duration(elapsed)
    )
}

pub fn completed(counters: &ScanCounters, elapsed: Duration) -> String {
    format!(
        "Successfully saved {} files to the database. Completed in {}.",
        counters.saved,
        readable_duration(elapsed)
    )
}

pub fn failed(error: &dyn std::error::Error) -> String {
    format!("Indexing canceled due to error - {error}")
}

/// One-line job summary for the log channel
pub fn log_summary(request: &ScanRequest, state: &str, counters: &ScanCounters) -> String {
    format!(
        "#IndexLog {} {state}: chat {} up to #{} (skip {}); processed {}, saved {}, duplicates {}, deleted {}, non-media {}, errors {}",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        request.chat,
        request.last_message_id,
        request.skip,
        counters.processed,
        counters.saved,
        counters.duplicate,
        counters.deleted,
        counters.non_media(),
        counters.errors
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::api::ChatError;

    #[test]
    fn test_progress_folds_non_media() {
        let counters = ScanCounters {
            processed: 30,
            saved: 20,
            duplicate: 3,
            deleted: 1,
            no_media: 2,
            unsupported: 4,
            errors: 0,
        };
        assert_eq!(
            progress(35, &counters),
            "Processed messages: 35, Saved: 20, Duplicates: 3, Deleted: 1, Non-media: 6, Errors: 0"
        );
    }

    #[test]
    fn test_terminal_texts() {
        let counters = ScanCounters {
            saved: 10,
            ..Default::default()
        };
        assert_eq!(
            completed(&counters, Duration::from_secs(65)),
            "Successfully saved 10 files to the database. Completed in 1m 5s."
        );
        assert_eq!(
            cancelled(Duration::ZERO),
            "Indexing canceled. Completed in 0s."
        );
        assert_eq!(
            failed(&ChatError::FloodWait { seconds: 9 }),
            "Indexing canceled due to error - flood wait: retry after 9 seconds"
        );
    }

    #[test]
    fn test_confirmation_names_chat_and_anchor() {
        let request = ScanRequest {
            chat: "examplechan".into(),
            last_message_id: 150,
            skip: 0,
        };
        let text = confirmation(&request);
        assert!(text.contains("Chat ID/Username: examplechan"));
        assert!(text.ends_with("Last Message ID: 150"));
        assert!(log_summary(&request, "completed", &ScanCounters::default())
            .starts_with("#IndexLog "));
    }
}
