//! Common test utilities and helpers
//!
//! Channel fixtures and a driver that plays the operator's side of an index
//! conversation through the public service API.

pub mod channel_helpers;
