//! Indexer API
//!
//! Public surface of the indexing pipeline, consolidated so callers do not
//! reach into individual submodules.

pub use crate::indexer::callback::{
    parse_callback, CallbackAction, ControlCallback, IndexCallback, CLOSE_DATA,
};
pub use crate::indexer::config::{IndexConfig, DEFAULT_EXTENSIONS, DEFAULT_PROGRESS_INTERVAL};
pub use crate::indexer::controller::{JobController, JobGuard};
pub use crate::indexer::error::{
    CallbackParseError, IndexError, IndexResult, IntakeError, IntakeResult, JobError, JobResult,
};
pub use crate::indexer::handshake::{IntakeHandshake, IntakeOutcome, SkipOutcome};
pub use crate::indexer::resolver::resolve;
pub use crate::indexer::runner::{JobOutcome, JobRunner};
pub use crate::indexer::service::{IndexService, UpdateOutcome};
pub use crate::indexer::types::{
    classify, MessageDisposition, ScanCounters, ScanRequest, ScanSource,
};
