//! Inline button payloads
//!
//! Index buttons carry the whole scan request so a confirmation can be acted
//! on without any server-side session: `index#<yes|cancel>#<chat>#<last_id>#<skip>`.

use std::fmt;
use std::str::FromStr;

use crate::indexer::error::CallbackParseError;
use crate::indexer::types::ScanRequest;
use crate::platform::api::{ChatIdentifier, InlineButton, InlineKeyboard};

pub const INDEX_PREFIX: &str = "index";

/// Payload of the button that dismisses a confirmation prompt
pub const CLOSE_DATA: &str = "close_data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Yes,
    Cancel,
}

impl CallbackAction {
    fn as_str(&self) -> &'static str {
        match self {
            CallbackAction::Yes => "yes",
            CallbackAction::Cancel => "cancel",
        }
    }
}

/// An `index#...` button payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexCallback {
    pub action: CallbackAction,
    pub request: ScanRequest,
}

impl IndexCallback {
    pub fn yes(request: ScanRequest) -> Self {
        Self {
            action: CallbackAction::Yes,
            request,
        }
    }

    pub fn cancel(request: ScanRequest) -> Self {
        Self {
            action: CallbackAction::Cancel,
            request,
        }
    }
}

impl fmt::Display for IndexCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{INDEX_PREFIX}#{}#{}#{}#{}",
            self.action.as_str(),
            self.request.chat,
            self.request.last_message_id,
            self.request.skip
        )
    }
}

impl FromStr for IndexCallback {
    type Err = CallbackParseError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = data.split('#').collect();
        let &[prefix, action, chat, last_id, skip] = fields.as_slice() else {
            return Err(CallbackParseError::WrongArity {
                data: data.to_string(),
            });
        };
        if prefix != INDEX_PREFIX {
            return Err(CallbackParseError::NotIndexPayload {
                data: data.to_string(),
            });
        }

        let action = match action {
            "yes" => CallbackAction::Yes,
            "cancel" => CallbackAction::Cancel,
            other => {
                return Err(CallbackParseError::UnknownAction {
                    action: other.to_string(),
                })
            }
        };
        let chat = ChatIdentifier::from_str(chat).map_err(|_| CallbackParseError::InvalidChat {
            value: chat.to_string(),
        })?;
        let last_message_id =
            last_id
                .parse()
                .map_err(|_| CallbackParseError::InvalidNumber {
                    field: "last message id",
                    value: last_id.to_string(),
                })?;
        let skip = skip
            .parse()
            .map_err(|_| CallbackParseError::InvalidNumber {
                field: "skip count",
                value: skip.to_string(),
            })?;

        Ok(Self {
            action,
            request: ScanRequest {
                chat,
                last_message_id,
                skip,
            },
        })
    }
}

/// A button press the index service reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCallback {
    Index(IndexCallback),
    Close,
}

/// Route callback data; `Ok(None)` for payloads owned by other handlers
pub fn parse_callback(data: &str) -> Result<Option<ControlCallback>, CallbackParseError> {
    if data == CLOSE_DATA {
        Ok(Some(ControlCallback::Close))
    } else if data.starts_with(INDEX_PREFIX) {
        data.parse().map(|cb| Some(ControlCallback::Index(cb)))
    } else {
        Ok(None)
    }
}

/// `Yes`/`Close` buttons under the confirmation prompt
pub fn confirmation_keyboard(request: &ScanRequest) -> InlineKeyboard {
    InlineKeyboard::single_column(vec![
        InlineButton::new("Yes", IndexCallback::yes(request.clone()).to_string()),
        InlineButton::new("Close", CLOSE_DATA),
    ])
}

/// Single `CANCEL` button on the progress surface
pub fn cancel_keyboard(request: &ScanRequest) -> InlineKeyboard {
    InlineKeyboard::single_column(vec![InlineButton::new(
        "CANCEL",
        IndexCallback::cancel(request.clone()).to_string(),
    )])
}
