//! Application module

pub mod cli;
pub mod replay;
pub mod startup;
