//! Test modules for the indexing pipeline
//!
//! Each suite drives the pipeline against the in-memory chat and catalog.

mod helpers;
