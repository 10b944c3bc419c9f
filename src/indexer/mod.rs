//! Media Indexing Pipeline
//!
//! Scans a range of channel messages and records eligible media in the
//! catalog. The pipeline is made of four parts:
//!
//! - **resolver**: permalink or forwarded message to `(chat, last message id)`
//! - **handshake**: channel verification, skip-count prompt, operator confirmation
//! - **controller**: the single-job exclusive section and cancellation flag
//! - **runner**: the scan loop with classification, saving and progress reports
//!
//! [`service::IndexService`] routes platform updates through them.

pub mod api;
pub mod callback;
pub mod config;
pub mod controller;
pub mod error;
pub mod handshake;
pub mod progress;
pub mod resolver;
pub mod runner;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;
