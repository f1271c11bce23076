//! Command line interface module
//!
//! Argument parsing, declaration loading with environment defaults, and the
//! runner that resolves declarations and prints the credential table.

pub mod args;
pub mod config;
pub mod runner;

pub use args::Args;
pub use config::BlockDefaults;
pub use runner::Runner;
