//! Channel media indexing
//!
//! An operator sends the bot a permalink (or forwards a post) from a
//! channel, answers a prompt with how many of the oldest messages to skip,
//! and confirms. The bot then walks the channel history up to the linked
//! message and hands every video or allow-listed document to a
//! deduplicating catalog, reporting progress on the confirmation message.
//!
//! - [`indexer`]: request resolution, the intake conversation, the job
//!   runner and its cancellation controller
//! - [`platform`]: the chat and catalog seams, plus in-memory implementations
//! - [`app`]: command line, configuration and the offline replay driver
//! - [`core`]: logging, error reporting, shutdown and validation helpers

pub mod app;
pub mod core;
pub mod indexer;
pub mod platform;
