//! Platform Error Types

use std::time::Duration;

/// Failures reported by the chat platform
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChatError {
    #[error("channel is invalid or the bot has no access to it")]
    ChannelInvalid,

    #[error("username is invalid or not occupied")]
    UsernameInvalid,

    #[error("flood wait: retry after {seconds} seconds")]
    FloodWait { seconds: u64 },

    #[error("{message}")]
    Api { message: String },
}

impl ChatError {
    pub fn api(message: impl Into<String>) -> Self {
        ChatError::Api {
            message: message.into(),
        }
    }

    /// Cooldown mandated by the platform, if this is a flood wait
    pub fn flood_wait(&self) -> Option<Duration> {
        match self {
            ChatError::FloodWait { seconds } => Some(Duration::from_secs(*seconds)),
            _ => None,
        }
    }
}

/// Result type for chat platform operations
pub type ChatResult<T> = Result<T, ChatError>;
