//! Command line interface module
//!
//! This module provides argument parsing and the runner that logs in and dispatches
//! each subcommand to the client.

pub mod args;
pub mod runner;

pub use args::Args;
pub use runner::Runner;
