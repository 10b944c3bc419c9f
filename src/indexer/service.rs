//! Update dispatch
//!
//! [`IndexService`] is the entry point for platform updates. It routes
//! button presses and private messages to the handshake, the runner and the
//! controller, and keeps handler failures from reaching the host loop.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinSet;

use crate::core::error_handling::log_error_with_context;
use crate::indexer::callback::{parse_callback, CallbackAction, ControlCallback, IndexCallback};
use crate::indexer::config::IndexConfig;
use crate::indexer::controller::JobController;
use crate::indexer::error::IndexResult;
use crate::indexer::handshake::{IntakeHandshake, IntakeOutcome, SkipOutcome};
use crate::indexer::progress;
use crate::indexer::runner::{JobOutcome, JobRunner};
use crate::indexer::types::ScanRequest;
use crate::platform::api::{
    CallbackQuery, CatalogStore, ChatClient, ChatIdentifier, Message, MessageRef, Update,
};

/// Time a running job gets to observe cancellation during shutdown
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// What handling an update did
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Ignored,
    /// Index button pressed by someone outside the operator list
    Unauthorized,
    Intake(IntakeOutcome),
    Skip(SkipOutcome),
    Job(JobOutcome),
    /// `active` is false when there was no job to cancel
    CancelRequested { active: bool },
    Closed,
}

#[derive(Clone)]
pub struct IndexService {
    client: Arc<dyn ChatClient>,
    config: Arc<IndexConfig>,
    controller: Arc<JobController>,
    handshake: IntakeHandshake,
    runner: JobRunner,
}

impl IndexService {
    pub fn new(
        client: Arc<dyn ChatClient>,
        catalog: Arc<dyn CatalogStore>,
        config: Arc<IndexConfig>,
        controller: Arc<JobController>,
    ) -> Self {
        Self {
            handshake: IntakeHandshake::new(client.clone(), config.clone()),
            runner: JobRunner::new(
                client.clone(),
                catalog,
                controller.clone(),
                config.clone(),
            ),
            client,
            config,
            controller,
        }
    }

    pub fn controller(&self) -> &Arc<JobController> {
        &self.controller
    }

    /// Handle one update, logging rather than returning any failure
    pub async fn handle(&self, update: Update) -> Option<UpdateOutcome> {
        match self.dispatch(update).await {
            Ok(outcome) => Some(outcome),
            Err(error) => {
                log_error_with_context(&error, "Index update");
                None
            }
        }
    }

    pub async fn dispatch(&self, update: Update) -> IndexResult<UpdateOutcome> {
        match update {
            Update::Callback(query) => self.on_callback(query).await,
            Update::Message(message) => self.on_message(message).await,
        }
    }

    async fn on_message(&self, message: Message) -> IndexResult<UpdateOutcome> {
        if !message.is_private() {
            return Ok(UpdateOutcome::Ignored);
        }
        let answers_prompt = message
            .reply_to
            .as_deref()
            .is_some_and(Message::awaits_forced_reply);
        if answers_prompt {
            let outcome = self.handshake.handle_skip_reply(&message).await?;
            Ok(UpdateOutcome::Skip(outcome))
        } else {
            let outcome = self.handshake.handle_request(&message).await?;
            Ok(UpdateOutcome::Intake(outcome))
        }
    }

    async fn on_callback(&self, query: CallbackQuery) -> IndexResult<UpdateOutcome> {
        let Some(control) = parse_callback(&query.data)? else {
            log::trace!("Callback '{}' is not handled here", query.data);
            return Ok(UpdateOutcome::Ignored);
        };
        let surface = query.message.reference();

        match control {
            ControlCallback::Close => {
                self.client.delete_message(&surface).await?;
                Ok(UpdateOutcome::Closed)
            }
            ControlCallback::Index(callback) => {
                if !self.config.is_admin(query.from_user) {
                    log::warn!(
                        "User {} pressed an index button but is not an operator",
                        query.from_user
                    );
                    return Ok(UpdateOutcome::Unauthorized);
                }
                self.on_index_callback(callback, &surface).await
            }
        }
    }

    async fn on_index_callback(
        &self,
        callback: IndexCallback,
        surface: &MessageRef,
    ) -> IndexResult<UpdateOutcome> {
        log::info!(
            "Indexing requested with action {:?}: {}",
            callback.action,
            callback.request
        );
        match callback.action {
            CallbackAction::Yes => {
                self.client
                    .edit_message(surface, progress::STARTING, None)
                    .await?;
                let outcome = self.runner.run(&callback.request, surface).await;
                self.notify_log_channel(&callback.request, &outcome).await;
                Ok(UpdateOutcome::Job(outcome))
            }
            CallbackAction::Cancel => {
                let active = self.controller.request_cancel();
                self.client
                    .edit_message(surface, progress::CANCELLING, None)
                    .await?;
                log::info!("Indexing cancellation requested");
                Ok(UpdateOutcome::CancelRequested { active })
            }
        }
    }

    async fn notify_log_channel(&self, request: &ScanRequest, outcome: &JobOutcome) {
        let Some(channel) = self.config.log_channel else {
            return;
        };
        let text = progress::log_summary(request, outcome.state(), outcome.counters());
        if let Err(error) = self
            .client
            .send_message(&ChatIdentifier::Numeric(channel), &text, None, None)
            .await
        {
            log::warn!("Could not post index summary to log channel {channel}: {error}");
        }
    }

    /// Handle updates until the channel closes or shutdown is signalled
    ///
    /// Each update runs in its own task so a cancel button can be handled
    /// while a job is running. On shutdown the controller is closed, so the
    /// active job and any queued behind it end as cancelled within a grace
    /// period; remaining handlers are then aborted.
    pub async fn serve(
        &self,
        mut updates: mpsc::Receiver<Update>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        let mut handlers = JoinSet::new();
        loop {
            tokio::select! {
                update = updates.recv() => match update {
                    Some(update) => {
                        let service = self.clone();
                        handlers.spawn(async move {
                            service.handle(update).await;
                        });
                    }
                    None => {
                        while handlers.join_next().await.is_some() {}
                        return;
                    }
                },
                _ = shutdown.recv() => break,
            }
        }

        log::info!("Stopping index service");
        self.controller.close();
        if tokio::time::timeout(SHUTDOWN_GRACE, self.controller.wait_idle())
            .await
            .is_err()
        {
            log::warn!("Index job did not stop within {}s", SHUTDOWN_GRACE.as_secs());
        }
        handlers.shutdown().await;
    }
}
