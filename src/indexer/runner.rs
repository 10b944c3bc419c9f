//! Indexing job runner
//!
//! Walks the requested range one message at a time inside the controller's
//! exclusive section. Each message is classified and, when eligible, handed
//! to the catalog before the next one is pulled. The cancellation flag is
//! sampled at the top of every iteration, so the message in flight always
//! finishes first.

use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::indexer::callback::cancel_keyboard;
use crate::indexer::config::IndexConfig;
use crate::indexer::controller::JobController;
use crate::indexer::error::{JobError, JobResult};
use crate::indexer::progress;
use crate::indexer::types::{classify, MessageDisposition, ScanCounters, ScanRequest};
use crate::platform::api::{CatalogStore, ChatClient, MessageRef, SaveOutcome};

/// How a job ended, with its final tallies
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Completed {
        counters: ScanCounters,
        elapsed: Duration,
    },
    Cancelled {
        counters: ScanCounters,
        elapsed: Duration,
    },
    /// Counters are as of the failure; the surface only shows the last periodic edit
    Failed {
        counters: ScanCounters,
        error: JobError,
    },
}

impl JobOutcome {
    pub fn counters(&self) -> &ScanCounters {
        match self {
            JobOutcome::Completed { counters, .. }
            | JobOutcome::Cancelled { counters, .. }
            | JobOutcome::Failed { counters, .. } => counters,
        }
    }

    pub fn state(&self) -> &'static str {
        match self {
            JobOutcome::Completed { .. } => "completed",
            JobOutcome::Cancelled { .. } => "cancelled",
            JobOutcome::Failed { .. } => "failed",
        }
    }
}

enum ScanEnd {
    Exhausted,
    Cancelled,
}

/// Runs confirmed scan requests, one at a time process-wide
#[derive(Clone)]
pub struct JobRunner {
    client: Arc<dyn ChatClient>,
    catalog: Arc<dyn CatalogStore>,
    controller: Arc<JobController>,
    config: Arc<IndexConfig>,
}

impl JobRunner {
    pub fn new(
        client: Arc<dyn ChatClient>,
        catalog: Arc<dyn CatalogStore>,
        controller: Arc<JobController>,
        config: Arc<IndexConfig>,
    ) -> Self {
        Self {
            client,
            catalog,
            controller,
            config,
        }
    }

    /// Run one job, reporting progress and the terminal state on `surface`
    ///
    /// Waits for any running job to finish first. Never leaves the exclusive
    /// section held: failures are reported as a reply to the surface and
    /// returned as [`JobOutcome::Failed`].
    pub async fn run(&self, request: &ScanRequest, surface: &MessageRef) -> JobOutcome {
        let _guard = self.controller.begin().await;
        let started = Instant::now();
        let mut counters = ScanCounters::default();

        let result = if self.controller.is_closed() {
            log::info!("Index job dropped during shutdown: {request}");
            self.client
                .edit_message(surface, &progress::cancelled(started.elapsed()), None)
                .await
                .map(|_| ScanEnd::Cancelled)
                .map_err(JobError::from)
        } else {
            log::info!("Index job started: {request}");
            self.scan(request, surface, &mut counters, started).await
        };

        match result {
            Ok(ScanEnd::Exhausted) => {
                log::info!(
                    "Index job completed: {request}; saved {}, duplicates {}, errors {}",
                    counters.saved,
                    counters.duplicate,
                    counters.errors
                );
                JobOutcome::Completed {
                    counters,
                    elapsed: started.elapsed(),
                }
            }
            Ok(ScanEnd::Cancelled) => {
                log::info!(
                    "Index job cancelled after {} messages: {request}",
                    counters.processed
                );
                JobOutcome::Cancelled {
                    counters,
                    elapsed: started.elapsed(),
                }
            }
            Err(error) => {
                log::error!("Error during indexing of {request}: {error}");
                let text = progress::failed(&error);
                if let Err(reply_error) = self
                    .client
                    .send_message(&surface.chat, &text, Some(surface.id), None)
                    .await
                {
                    log::warn!("Could not report index failure on {surface}: {reply_error}");
                }
                JobOutcome::Failed { counters, error }
            }
        }
    }

    async fn scan(
        &self,
        request: &ScanRequest,
        surface: &MessageRef,
        counters: &mut ScanCounters,
        started: Instant,
    ) -> JobResult<ScanEnd> {
        let interval = self.config.progress_interval.max(1);
        let cancel_button = cancel_keyboard(request);
        let mut messages =
            self.client
                .iter_messages(&request.chat, request.last_message_id, request.skip);

        while let Some(item) = messages.next().await {
            let message = item?;

            if self.controller.take_cancel() {
                self.client
                    .edit_message(surface, &progress::cancelled(started.elapsed()), None)
                    .await?;
                return Ok(ScanEnd::Cancelled);
            }

            if counters.processed % interval == 0 {
                let current = u64::from(request.skip) + counters.processed;
                self.client
                    .edit_message(
                        surface,
                        &progress::progress(current, counters),
                        Some(cancel_button.clone()),
                    )
                    .await?;
            }

            counters.processed += 1;
            let disposition = classify(&message, &self.config);
            log::trace!(
                "{}#{}: {}",
                request.chat,
                message.id,
                disposition.label()
            );

            match disposition {
                MessageDisposition::Eligible(record) => {
                    let outcome = self.catalog.save(record).await;
                    if let SaveOutcome::Failed { reason } = &outcome {
                        log::warn!("Catalog save failed for message {}: {reason}", message.id);
                    }
                    counters.record_save(&outcome);
                }
                other => counters.record_skipped(&other),
            }
        }

        self.client
            .edit_message(surface, &progress::completed(counters, started.elapsed()), None)
            .await?;
        Ok(ScanEnd::Exhausted)
    }
}
