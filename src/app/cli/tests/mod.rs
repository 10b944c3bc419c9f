//! Tests for argument parsing and configuration loading

mod args_tests;
mod config_tests;
