//! Indexer Error Types
//!
//! Intake errors display as the reply sent to the requester. Job errors end
//! the running scan and are reported on the progress surface.

use crate::core::error_handling::ContextualError;
use crate::platform::api::ChatError;

const INVALID_LINK: &str = "Invalid link";
const CHANNEL_UNAVAILABLE: &str =
    "This may be a private channel/group. Make me an admin over there to index the files.";
const INVALID_USERNAME: &str = "Invalid Link specified.";
const RATE_LIMITED: &str = "Please wait due to server limitations.";
const FETCH_FAILED: &str = "Ensure that I am an admin in the channel if it is private.";
const MESSAGE_MISSING: &str = "This may be a group, and I am not an admin of the group.";

/// Failures while resolving and verifying an index request
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeError {
    /// Link-shaped text that does not parse into a chat and message id
    #[error("{}", INVALID_LINK)]
    InvalidLink,

    #[error("{}", CHANNEL_UNAVAILABLE)]
    ChannelUnavailable,

    #[error("{}", INVALID_USERNAME)]
    InvalidUsername,

    #[error("Errors - {message}")]
    UnexpectedResolution { message: String },

    /// Raised after the mandated cooldown has already been waited out
    #[error("{}", RATE_LIMITED)]
    RateLimited { seconds: u64 },

    #[error("{}", FETCH_FAILED)]
    FetchFailed { message: String },

    #[error("{}", MESSAGE_MISSING)]
    MessageMissing,
}

impl IntakeError {
    /// Map a chat resolution failure
    pub fn from_resolution(error: ChatError) -> Self {
        match error {
            ChatError::ChannelInvalid => IntakeError::ChannelUnavailable,
            ChatError::UsernameInvalid => IntakeError::InvalidUsername,
            other => IntakeError::UnexpectedResolution {
                message: other.to_string(),
            },
        }
    }
}

impl ContextualError for IntakeError {
    fn is_user_actionable(&self) -> bool {
        !matches!(self, IntakeError::UnexpectedResolution { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            IntakeError::InvalidLink => Some(INVALID_LINK),
            IntakeError::ChannelUnavailable => Some(CHANNEL_UNAVAILABLE),
            IntakeError::InvalidUsername => Some(INVALID_USERNAME),
            IntakeError::UnexpectedResolution { .. } => None,
            IntakeError::RateLimited { .. } => Some(RATE_LIMITED),
            IntakeError::FetchFailed { .. } => Some(FETCH_FAILED),
            IntakeError::MessageMissing => Some(MESSAGE_MISSING),
        }
    }
}

/// A failure that ends the running index job
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JobError {
    #[error("{0}")]
    Platform(#[from] ChatError),
}

impl ContextualError for JobError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

/// Malformed inline button payload
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CallbackParseError {
    #[error("callback data '{data}' must have 5 '#'-separated fields")]
    WrongArity { data: String },

    #[error("callback data '{data}' is not an index payload")]
    NotIndexPayload { data: String },

    #[error("unknown index action '{action}'")]
    UnknownAction { action: String },

    #[error("invalid chat identifier '{value}' in callback data")]
    InvalidChat { value: String },

    #[error("invalid {field} '{value}' in callback data")]
    InvalidNumber { field: &'static str, value: String },
}

impl ContextualError for CallbackParseError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

/// Error surfaced by the update dispatcher
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndexError {
    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error(transparent)]
    Job(#[from] JobError),

    #[error(transparent)]
    Callback(#[from] CallbackParseError),

    #[error("chat platform error: {0}")]
    Platform(#[from] ChatError),
}

impl ContextualError for IndexError {
    fn is_user_actionable(&self) -> bool {
        match self {
            IndexError::Intake(e) => e.is_user_actionable(),
            _ => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            IndexError::Intake(e) => e.user_message(),
            _ => None,
        }
    }
}

pub type IntakeResult<T> = Result<T, IntakeError>;

pub type JobResult<T> = Result<T, JobError>;

/// Result type for update handling
pub type IndexResult<T> = Result<T, IndexError>;
