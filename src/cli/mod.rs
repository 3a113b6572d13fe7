//! Command line interface for apk_release_publisher.
//!
//! Argument parsing, command execution and coloured user feedback.

mod args;
pub mod commands;
mod output;

pub use args::{
    Args, BackendKind, Command, GitHubArgs, PublishTarget, RuntimeConfig, StorageArgs, TokenAction,
};
pub use commands::execute_command;
pub use output::OutputManager;

use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute_command(args).await
}
