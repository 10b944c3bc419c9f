//! Offline replay of an index conversation
//!
//! Loads a channel fixture into the in-memory platform and plays the
//! operator's side of the conversation: the index request, the skip reply and
//! the confirmation press. Every message the bot sends, edits or deletes is
//! kept in the transcript for printing.

use async_trait::async_trait;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::app::cli::args::ReplayArgs;
use crate::core::error_handling::ContextualError;
use crate::core::time::readable_duration;
use crate::indexer::api::{
    IndexCallback, IndexConfig, IndexError, IndexService, IntakeError, IntakeOutcome,
    JobController, JobOutcome, SkipOutcome, UpdateOutcome,
};
use crate::platform::api::{
    CallbackQuery, CatalogStore, ChannelFixture, ChatError, ChatIdentifier, MediaRecord,
    MemoryCatalog, MemoryChat, Message, MessageRef, SaveOutcome, TranscriptEntry, Update,
};

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("Cannot read fixture {}: {source}", path.display())]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse fixture {}: {source}", path.display())]
    FixtureParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No operator: pass --operator or configure at least one admin")]
    NoOperator,

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("Unexpected response at step '{step}': {outcome}")]
    UnexpectedStep { step: &'static str, outcome: String },
}

impl ContextualError for ReplayError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, ReplayError::NoOperator)
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ReplayError::NoOperator => {
                Some("No operator: pass --operator or configure at least one admin")
            }
            _ => None,
        }
    }
}

pub type ReplayResult<T> = Result<T, ReplayError>;

/// Where the conversation stopped
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayEnd {
    /// The request text was not an index request
    Ignored,
    Rejected(IntakeError),
    /// The skip reply came from a non-operator
    Unauthorized,
    Finished(JobOutcome),
}

impl ReplayEnd {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ReplayEnd::Finished(JobOutcome::Completed { .. } | JobOutcome::Cancelled { .. })
        )
    }
}

#[derive(Debug)]
pub struct ReplayReport {
    pub end: ReplayEnd,
    pub transcript: Vec<TranscriptEntry>,
    pub catalog: Vec<MediaRecord>,
}

/// Catalog that requests cancellation once a number of saves has happened
struct CancelAfter {
    inner: Arc<MemoryCatalog>,
    controller: Arc<JobController>,
    after: usize,
    saves: AtomicUsize,
}

#[async_trait]
impl CatalogStore for CancelAfter {
    async fn save(&self, record: MediaRecord) -> SaveOutcome {
        let outcome = self.inner.save(record).await;
        if self.saves.fetch_add(1, Ordering::SeqCst) + 1 == self.after {
            log::info!("Requesting cancellation after {} saves", self.after);
            self.controller.request_cancel();
        }
        outcome
    }
}

pub async fn load_fixture(path: &std::path::Path) -> ReplayResult<ChannelFixture> {
    let contents =
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ReplayError::FixtureRead {
                path: path.to_path_buf(),
                source,
            })?;
    serde_json::from_str(&contents).map_err(|source| ReplayError::FixtureParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Pick the acting user; with no admins configured the operator becomes the only one
fn operator_for(args: &ReplayArgs, config: &mut IndexConfig) -> ReplayResult<i64> {
    let operator = match args.operator {
        Some(user) => user,
        None => *config.admins.iter().next().ok_or(ReplayError::NoOperator)?,
    };
    if config.admins.is_empty() {
        config.admins.insert(operator);
    }
    Ok(operator)
}

fn unexpected(step: &'static str, outcome: &UpdateOutcome) -> ReplayError {
    ReplayError::UnexpectedStep {
        step,
        outcome: format!("{outcome:?}"),
    }
}

/// Play the whole conversation against `fixture`
///
/// A shutdown signal while the job runs is turned into a cancel request, so
/// the job ends at its next message boundary.
pub async fn replay(
    args: &ReplayArgs,
    fixture: ChannelFixture,
    mut config: IndexConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> ReplayResult<ReplayReport> {
    let operator = operator_for(args, &mut config)?;
    let chat = Arc::new(MemoryChat::new());
    chat.add_channel(fixture)?;

    let catalog = Arc::new(MemoryCatalog::new());
    let controller = Arc::new(JobController::new());
    let store: Arc<dyn CatalogStore> = match args.cancel_after {
        Some(after) => Arc::new(CancelAfter {
            inner: catalog.clone(),
            controller: controller.clone(),
            after,
            saves: AtomicUsize::new(0),
        }),
        None => catalog.clone(),
    };
    let service = IndexService::new(chat.clone(), store, Arc::new(config), controller.clone());

    let finish = |end: ReplayEnd| ReplayReport {
        end,
        transcript: chat.transcript(),
        catalog: catalog.records(),
    };

    let request = chat.receive(Message {
        chat: ChatIdentifier::Numeric(operator),
        from_user: Some(operator),
        text: Some(args.link.clone()),
        ..Default::default()
    })?;
    log::info!("Operator {operator} requests indexing of '{}'", args.link);
    let prompt = match service.dispatch(Update::Message(request)).await? {
        UpdateOutcome::Intake(IntakeOutcome::Prompted(prompt)) => prompt,
        UpdateOutcome::Intake(IntakeOutcome::Ignored) => return Ok(finish(ReplayEnd::Ignored)),
        UpdateOutcome::Intake(IntakeOutcome::Rejected(error)) => {
            return Ok(finish(ReplayEnd::Rejected(error)))
        }
        other => return Err(unexpected("request", &other)),
    };

    let parent = chat
        .conversation_message(&prompt)
        .ok_or_else(|| ReplayError::UnexpectedStep {
            step: "skip prompt",
            outcome: format!("prompt {prompt} is gone"),
        })?;
    let reply = chat.receive(Message {
        chat: ChatIdentifier::Numeric(operator),
        from_user: Some(operator),
        text: Some(args.skip.clone()),
        reply_to: Some(Box::new(parent)),
        ..Default::default()
    })?;
    let (request, confirmation) = match service.dispatch(Update::Message(reply)).await? {
        UpdateOutcome::Skip(SkipOutcome::Confirmation { request, message }) => (request, message),
        UpdateOutcome::Skip(SkipOutcome::Unauthorized(_)) => {
            return Ok(finish(ReplayEnd::Unauthorized))
        }
        UpdateOutcome::Skip(SkipOutcome::Rejected(error)) => {
            return Ok(finish(ReplayEnd::Rejected(error)))
        }
        other => return Err(unexpected("skip reply", &other)),
    };

    let press = Update::Callback(CallbackQuery {
        id: format!("replay-{}", confirmation.id),
        from_user: operator,
        message: chat
            .conversation_message(&confirmation)
            .unwrap_or_else(|| surface_stub(&confirmation)),
        data: IndexCallback::yes(request).to_string(),
    });

    let job = service.dispatch(press);
    tokio::pin!(job);
    let mut cancelling = false;
    let outcome = loop {
        tokio::select! {
            outcome = &mut job => break outcome?,
            _ = shutdown.recv(), if !cancelling => {
                log::warn!("Shutdown requested, cancelling the running job");
                controller.request_cancel();
                cancelling = true;
            }
        }
    };

    match outcome {
        UpdateOutcome::Job(outcome) => Ok(finish(ReplayEnd::Finished(outcome))),
        other => Err(unexpected("confirmation", &other)),
    }
}

fn surface_stub(target: &MessageRef) -> Message {
    Message {
        id: target.id,
        chat: target.chat.clone(),
        ..Default::default()
    }
}

/// Print the transcript and final tallies to stdout
pub fn print_report(report: &ReplayReport) {
    for entry in &report.transcript {
        match entry {
            TranscriptEntry::Sent { target, text, .. } => {
                println!("{} {} {}", "send".green(), target.to_string().dimmed(), text)
            }
            TranscriptEntry::Edited { target, text, .. } => {
                println!("{} {} {}", "edit".yellow(), target.to_string().dimmed(), text)
            }
            TranscriptEntry::Deleted { target } => {
                println!("{} {}", "drop".red(), target.to_string().dimmed())
            }
        }
    }
    println!();

    match &report.end {
        ReplayEnd::Ignored => println!("{}", "Request was not an index request".yellow()),
        ReplayEnd::Rejected(error) => println!("{} {error}", "Rejected:".red().bold()),
        ReplayEnd::Unauthorized => println!("{}", "Skip reply came from a non-operator".red()),
        ReplayEnd::Finished(outcome) => {
            let counters = outcome.counters();
            let state = match outcome {
                JobOutcome::Completed { elapsed, .. } => {
                    format!("completed in {}", readable_duration(*elapsed)).green()
                }
                JobOutcome::Cancelled { elapsed, .. } => {
                    format!("cancelled after {}", readable_duration(*elapsed)).yellow()
                }
                JobOutcome::Failed { error, .. } => format!("failed: {error}").red(),
            };
            println!("{} {state}", "Job".bold());
            println!(
                "  processed {}  saved {}  duplicates {}  deleted {}  no media {}  unsupported {}  errors {}",
                counters.processed,
                counters.saved,
                counters.duplicate,
                counters.deleted,
                counters.no_media,
                counters.unsupported,
                counters.errors
            );
            println!("  catalog holds {} records", report.catalog.len());
        }
    }
}
