//! APK Release Publisher - publish APK builds and render download listings.

use apk_release_publisher::cli;
use apk_release_publisher::cli::OutputManager;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            // never quiet for fatal errors
            let output = OutputManager::new(false, false);
            output.error(&format!("Fatal error: {}", e.user_message()));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                let _ = output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    let _ = output.indent(&suggestion);
                }
            }

            process::exit(1);
        }
    }
}
