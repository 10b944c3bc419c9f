//! Platform Collaborators
//!
//! The chat platform and the catalog store are external to the indexing
//! pipeline. This module defines the seams the pipeline talks through:
//!
//! - **ChatClient**: chat resolution, message fetch/iteration, send, edit, delete
//! - **CatalogStore**: deduplicating persistence of media metadata
//! - **Message model**: the subset of platform message data the pipeline reads
//!
//! In-memory implementations live in [`memory`] and back both the test suite
//! and the offline `replay` command.

pub mod api;
pub mod catalog;
pub mod chat;
pub mod error;
pub mod memory;
pub mod types;
