//! annocurate CLI library
//!
//! This library provides the command-line interface for curating brat
//! standoff annotation files.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod priority_source;
pub mod progress;

pub use error::{CliError, CliResult};
