//! Command execution functions.
//!
//! Each command reports its own progress; this module validates arguments,
//! maps failures to exit codes and prints recovery suggestions.

mod docs;
mod helpers;
mod launch;
mod list;
mod publish;
mod token;
mod verify;

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::{CliError, Result};

use docs::execute_docs;
use launch::execute_launch;
use list::execute_list;
use publish::execute_publish;
use token::execute_token;
use verify::execute_verify;

/// Execute the main command based on parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    if let Err(validation_error) = args.validate() {
        // never quiet
        let output = super::OutputManager::new(false, false);
        output.error(&CliError::InvalidArguments { reason: validation_error }.to_string());
        return Ok(1);
    }

    let config = RuntimeConfig::from(&args);
    log::debug!("Running '{}'", args.command.name());

    let result = match &args.command {
        Command::Publish { target, no_refresh } => execute_publish(target, *no_refresh, &config).await,
        Command::List {
            backend,
            storage,
            github,
            out,
        } => execute_list(*backend, storage, github, out.as_deref(), &config).await,
        Command::Launch {
            uri,
            timeout_ms,
            download_url,
            page_out,
        } => execute_launch(uri, *timeout_ms, download_url, page_out.as_deref(), &config).await,
        Command::Docs {
            source,
            base_dir,
            source_url,
            out,
        } => execute_docs(source, base_dir, source_url.as_deref(), out.as_deref(), &config).await,
        Command::Token { action } => execute_token(*action, &config).await,
        Command::Verify { storage } => execute_verify(storage, &config).await,
    };

    match result {
        Ok(exit_code) => Ok(exit_code),
        Err(e) => {
            config.error_println(&format!(
                "Command '{}' failed: {}",
                args.command.name(),
                e.user_message()
            ));

            if config.is_verbose() {
                let suggestions = e.recovery_suggestions();
                if !suggestions.is_empty() {
                    config.println("\n💡 Recovery suggestions:");
                    for suggestion in suggestions {
                        config.println(&format!("  • {suggestion}"));
                    }
                }
            }

            Ok(1)
        }
    }
}
