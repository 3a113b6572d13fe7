//! Operating-system handoff for the terminal.
//!
//! A terminal has no embedded frame, so only direct navigation hands the URI
//! to the OS. The OS reporting that a registered handler accepted the URI is
//! the closest thing to the browser's focus-loss signal.

use super::{Handoff, LaunchPage, LaunchSignal};
use crate::cli::OutputManager;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Opens URIs through the platform's default handler
#[derive(Debug, Clone)]
pub struct SystemHandoff {
    signals: mpsc::Sender<LaunchSignal>,
}

impl SystemHandoff {
    /// Report successful dispatches on `signals`
    pub fn new(signals: mpsc::Sender<LaunchSignal>) -> Self {
        Self { signals }
    }
}

#[async_trait]
impl Handoff for SystemHandoff {
    async fn embed(&self, uri: &str) {
        log::debug!("No embedded frame in a terminal; skipping for {uri}");
    }

    async fn navigate(&self, uri: &str) {
        let target = uri.to_string();
        let opened = tokio::task::spawn_blocking(move || open::that(&target)).await;

        match opened {
            Ok(Ok(())) => {
                log::debug!("Handler accepted {uri}");
                let _ = self.signals.send(LaunchSignal::Blur).await;
            }
            Ok(Err(e)) => log::warn!("No handler opened {uri}: {e}"),
            Err(e) => log::warn!("Open task for {uri} failed: {e}"),
        }
    }

    async fn remove_embed(&self) {}
}

/// Terminal stand-in for the open page; always "visible"
#[derive(Debug, Clone)]
pub struct TerminalPage {
    output: OutputManager,
}

impl TerminalPage {
    /// Print through `output`
    pub fn new(output: OutputManager) -> Self {
        Self { output }
    }
}

#[async_trait]
impl LaunchPage for TerminalPage {
    fn is_visible(&self) -> bool {
        true
    }

    async fn show_fallback(&self, download_url: &str) {
        let _ = self.output.warn("The app did not open. Is it installed?");
        let _ = self.output.indent(&format!("Download it here: {download_url}"));
    }
}
