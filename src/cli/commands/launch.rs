//! Launch command: open the installed app, fall back to the download page.

use super::helpers::emit_html;
use crate::cli::RuntimeConfig;
use crate::config::LauncherConfig;
use crate::error::Result;
use crate::launcher::{LaunchState, Launcher, SystemHandoff, TerminalPage};
use crate::render::Renderer;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;

/// Execute launch command
///
/// Exits 0 when the app presumably opened and 2 when the fallback was shown.
pub(super) async fn execute_launch(
    uri: &str,
    timeout_ms: u64,
    download_url: &str,
    page_out: Option<&Path>,
    config: &RuntimeConfig,
) -> Result<i32> {
    let launcher_config = LauncherConfig {
        deep_link: uri.to_string(),
        timeout: Duration::from_millis(timeout_ms),
        download_url: download_url.to_string(),
        ..LauncherConfig::default()
    };

    let (signals, mut received) = mpsc::channel(4);
    let handoff = SystemHandoff::new(signals);
    let page = TerminalPage::new(config.output().clone());

    config.progress_println(&format!("Opening {uri}..."));
    let mut launcher = Launcher::new(launcher_config);
    let state = launcher.run(&handoff, &page, &mut received).await;

    if let Some(path) = page_out {
        let renderer = Renderer::new()?;
        let html = renderer.open_page(state == LaunchState::Fallback, download_url)?;
        emit_html(config, Some(path), &html).await?;
    }

    match state {
        LaunchState::Fallback => Ok(2),
        _ => {
            config.success_println("App opened");
            Ok(0)
        }
    }
}
