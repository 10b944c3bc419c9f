//! Intake handshake
//!
//! Two conversational steps precede a job. An index request (permalink or
//! channel forward) is verified against the platform and answered with a
//! forced-reply prompt for the skip count. The reply to that prompt is turned
//! back into a full scan request and, for operators, a yes/close
//! confirmation carrying the request in its button payload.

use std::sync::Arc;

use crate::core::error_handling::log_error_with_context;
use crate::indexer::callback::confirmation_keyboard;
use crate::indexer::config::IndexConfig;
use crate::indexer::error::{IndexResult, IntakeError, IntakeResult};
use crate::indexer::progress;
use crate::indexer::resolver;
use crate::indexer::types::{ScanRequest, ScanSource};
use crate::platform::api::{ChatClient, ChatInfo, Message, MessageRef, ReplyMarkup};

/// Result of an index request message
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeOutcome {
    /// Not an index request
    Ignored,
    /// The requester was told why the request cannot proceed
    Rejected(IntakeError),
    /// Skip-count prompt sent
    Prompted(MessageRef),
}

/// Result of a reply to the skip-count prompt
#[derive(Debug, Clone, PartialEq)]
pub enum SkipOutcome {
    Ignored,
    Rejected(IntakeError),
    /// Replier is not an operator; prompt cleaned up, nothing sent
    Unauthorized(ScanRequest),
    Confirmation {
        request: ScanRequest,
        message: MessageRef,
    },
}

#[derive(Clone)]
pub struct IntakeHandshake {
    client: Arc<dyn ChatClient>,
    config: Arc<IndexConfig>,
}

impl IntakeHandshake {
    pub fn new(client: Arc<dyn ChatClient>, config: Arc<IndexConfig>) -> Self {
        Self { client, config }
    }

    /// Check the bot can see the channel and the anchor message
    ///
    /// A flood wait on the fetch is slept out before reporting
    /// [`IntakeError::RateLimited`]; the request is not retried.
    pub async fn verify(&self, source: &ScanSource) -> IntakeResult<ChatInfo> {
        let info = self
            .client
            .resolve_chat(&source.chat)
            .await
            .map_err(IntakeError::from_resolution)?;

        let anchor = match self
            .client
            .fetch_message(&source.chat, source.last_message_id)
            .await
        {
            Ok(message) => message,
            Err(error) => {
                return Err(match error.flood_wait() {
                    Some(cooldown) => {
                        log::warn!("FloodWait triggered for {} seconds", cooldown.as_secs());
                        tokio::time::sleep(cooldown).await;
                        IntakeError::RateLimited {
                            seconds: cooldown.as_secs(),
                        }
                    }
                    None => IntakeError::FetchFailed {
                        message: error.to_string(),
                    },
                });
            }
        };

        if anchor.empty {
            return Err(IntakeError::MessageMissing);
        }
        Ok(info)
    }

    /// Handle a permalink or forwarded message
    pub async fn handle_request(&self, message: &Message) -> IndexResult<IntakeOutcome> {
        let source = match resolver::resolve(message) {
            Ok(Some(source)) => source,
            Ok(None) => {
                log::trace!("Message {} is not an index request", message.id);
                return Ok(IntakeOutcome::Ignored);
            }
            Err(error) => return self.reject(message, error).await,
        };
        log::info!(
            "Received indexing request from user {:?} for {} up to #{}",
            message.from_user,
            source.chat,
            source.last_message_id
        );

        if let Err(error) = self.verify(&source).await {
            return self.reject(message, error).await;
        }

        let prompt = self
            .client
            .send_message(
                &message.chat,
                progress::SKIP_PROMPT,
                Some(message.id),
                Some(ReplyMarkup::ForceReply),
            )
            .await?;
        Ok(IntakeOutcome::Prompted(prompt.reference()))
    }

    async fn reject(&self, message: &Message, error: IntakeError) -> IndexResult<IntakeOutcome> {
        log_error_with_context(&error, "Index intake");
        self.client
            .send_message(&message.chat, &error.to_string(), Some(message.id), None)
            .await?;
        Ok(IntakeOutcome::Rejected(error))
    }

    /// Handle a reply to the skip-count prompt
    pub async fn handle_skip_reply(&self, reply: &Message) -> IndexResult<SkipOutcome> {
        let Some(prompt_ref) = reply
            .reply_to
            .as_deref()
            .filter(|parent| parent.awaits_forced_reply())
            .map(Message::reference)
        else {
            return Ok(SkipOutcome::Ignored);
        };

        let skip = match parse_skip(reply.text.as_deref()) {
            Some(skip) => skip,
            None => {
                log::warn!("Invalid skip count {:?}; using 0", reply.text);
                self.client
                    .send_message(&reply.chat, progress::INVALID_SKIP_WARNING, Some(reply.id), None)
                    .await?;
                0
            }
        };

        let prompt = self.client.fetch_message(&reply.chat, prompt_ref.id).await?;
        let Some(original) = prompt.reply_to.as_deref() else {
            log::debug!("Skip prompt {prompt_ref} no longer references a request");
            return Ok(SkipOutcome::Ignored);
        };
        let source = match resolver::resolve(original) {
            Ok(Some(source)) => source,
            Ok(None) => return Ok(SkipOutcome::Ignored),
            Err(error) => {
                self.client
                    .send_message(&original.chat, &error.to_string(), Some(original.id), None)
                    .await?;
                return Ok(SkipOutcome::Rejected(error));
            }
        };

        self.client.delete_message(&reply.reference()).await?;
        self.client.delete_message(&prompt.reference()).await?;

        let request = ScanRequest::new(source, skip);
        let operator = reply.from_user.unwrap_or_default();
        if !self.config.is_admin(operator) {
            log::warn!("Ignoring index confirmation for non-operator {operator}");
            return Ok(SkipOutcome::Unauthorized(request));
        }

        let confirmation = self
            .client
            .send_message(
                &reply.chat,
                &progress::confirmation(&request),
                None,
                Some(ReplyMarkup::Inline(confirmation_keyboard(&request))),
            )
            .await?;
        Ok(SkipOutcome::Confirmation {
            request,
            message: confirmation.reference(),
        })
    }
}

/// Parse a skip count; negative or non-numeric input yields `None`
pub fn parse_skip(text: Option<&str>) -> Option<u32> {
    text.and_then(|t| t.trim().parse::<u32>().ok())
}
