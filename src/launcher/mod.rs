//! Deep-link launcher.
//!
//! Hands a custom-scheme URI to the installed app and decides, after a fixed
//! timeout, whether to show the download fallback. Success is inferred from
//! the page losing visibility or focus, which is a best-effort heuristic:
//! a missed signal only shows a redundant fallback.
//!
//! ```text
//! Attempting ──(signal before timeout, or page hidden)──▶ Success
//!     └──────(timeout, no signal, page still visible)───▶ Fallback
//! ```

mod system;

pub use system::{SystemHandoff, TerminalPage};

use crate::config::LauncherConfig;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

/// Launcher state; resolves once and never changes afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    /// Handoff in progress
    Attempting,
    /// The page lost visibility or focus: the app presumably opened
    Success,
    /// Timeout elapsed with the page still visible and focused
    Fallback,
}

/// Evidence that the app took over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchSignal {
    /// The page became hidden
    Hidden,
    /// The window lost focus
    Blur,
}

/// Mechanisms that hand the URI to the platform
#[async_trait]
pub trait Handoff: Send + Sync {
    /// Start the embedded (invisible frame) attempt
    async fn embed(&self, uri: &str);

    /// Direct navigation attempt
    async fn navigate(&self, uri: &str);

    /// Tear down the embedded attempt
    async fn remove_embed(&self);
}

/// The page hosting the launcher
#[async_trait]
pub trait LaunchPage: Send + Sync {
    /// Whether the page is still visible
    fn is_visible(&self) -> bool;

    /// Hide the launching UI and show the download fallback
    async fn show_fallback(&self, download_url: &str);
}

/// One-shot deep-link launcher
#[derive(Debug)]
pub struct Launcher {
    config: LauncherConfig,
    state: LaunchState,
}

impl Launcher {
    /// Launcher in the `Attempting` state
    pub fn new(config: LauncherConfig) -> Self {
        Self {
            config,
            state: LaunchState::Attempting,
        }
    }

    /// Current state
    pub fn state(&self) -> LaunchState {
        self.state
    }

    /// Configuration in use
    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Run the handoff and resolve the state
    ///
    /// Calling this again after resolution returns the resolved state
    /// without repeating any side effect.
    pub async fn run<H, P>(
        &mut self,
        handoff: &H,
        page: &P,
        signals: &mut mpsc::Receiver<LaunchSignal>,
    ) -> LaunchState
    where
        H: Handoff + ?Sized,
        P: LaunchPage + ?Sized,
    {
        if self.state != LaunchState::Attempting {
            return self.state;
        }

        let uri = self.config.deep_link.as_str();
        let start = Instant::now();
        let navigate_at = start + self.config.navigation_delay;
        let deadline = start + self.config.timeout;

        log::info!("Opening {uri}");
        handoff.embed(uri).await;

        // A slow handoff must not hold up the deadline.
        let navigation = async {
            sleep_until(navigate_at).await;
            handoff.navigate(uri).await;
        };
        tokio::pin!(navigation);

        let mut navigated = false;
        let mut channel_open = true;
        let mut signalled = None;

        loop {
            tokio::select! {
                _ = sleep_until(deadline) => break,
                _ = &mut navigation, if !navigated => navigated = true,
                received = signals.recv(), if channel_open && signalled.is_none() => match received {
                    Some(signal) => {
                        log::debug!("Launch signal {signal:?} after {:?}", start.elapsed());
                        signalled = Some(signal);
                    }
                    None => channel_open = false,
                },
            }
        }

        handoff.remove_embed().await;

        self.state = if signalled.is_none() && page.is_visible() {
            log::info!("App did not open within {:?}", self.config.timeout);
            page.show_fallback(&self.config.download_url).await;
            LaunchState::Fallback
        } else {
            LaunchState::Success
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(&'static str, Duration)>>,
        start: Mutex<Option<Instant>>,
    }

    impl Recorder {
        fn record(&self, name: &'static str) {
            let start = *self.start.lock().unwrap().get_or_insert_with(Instant::now);
            self.calls.lock().unwrap().push((name, start.elapsed()));
        }

        fn names(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().iter().map(|(n, _)| *n).collect()
        }
    }

    #[async_trait]
    impl Handoff for Recorder {
        async fn embed(&self, _uri: &str) {
            self.record("embed");
        }
        async fn navigate(&self, _uri: &str) {
            self.record("navigate");
        }
        async fn remove_embed(&self) {
            self.record("remove_embed");
        }
    }

    /// Handoff whose navigation never returns before the deadline
    #[derive(Default)]
    struct StalledHandoff {
        inner: Recorder,
    }

    #[async_trait]
    impl Handoff for StalledHandoff {
        async fn embed(&self, uri: &str) {
            self.inner.embed(uri).await;
        }
        async fn navigate(&self, uri: &str) {
            self.inner.navigate(uri).await;
            tokio::time::sleep(Duration::from_secs(10)).await;
        }
        async fn remove_embed(&self) {
            self.inner.remove_embed().await;
        }
    }

    struct Page {
        visible: AtomicBool,
        fallbacks: AtomicUsize,
    }

    impl Page {
        fn visible() -> Self {
            Self {
                visible: AtomicBool::new(true),
                fallbacks: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LaunchPage for Page {
        fn is_visible(&self) -> bool {
            self.visible.load(Ordering::SeqCst)
        }
        async fn show_fallback(&self, _download_url: &str) {
            self.fallbacks.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn no_signal_shows_fallback_once() {
        let handoff = Recorder::default();
        let page = Page::visible();
        let (_tx, mut rx) = mpsc::channel(4);
        let mut launcher = Launcher::new(LauncherConfig::default());

        assert_eq!(launcher.run(&handoff, &page, &mut rx).await, LaunchState::Fallback);
        assert_eq!(page.fallbacks.load(Ordering::SeqCst), 1);
        assert_eq!(handoff.names(), vec!["embed", "navigate", "remove_embed"]);

        let calls = handoff.calls.lock().unwrap().clone();
        assert!(calls[1].1 >= Duration::from_millis(100) && calls[1].1 < Duration::from_millis(2500));
        assert!(calls[2].1 >= Duration::from_millis(2500));

        // one-shot: a second run changes nothing
        assert_eq!(launcher.run(&handoff, &page, &mut rx).await, LaunchState::Fallback);
        assert_eq!(page.fallbacks.load(Ordering::SeqCst), 1);
        assert_eq!(handoff.names().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn blur_before_timeout_never_shows_fallback() {
        let handoff = Recorder::default();
        let page = Page::visible();
        let (tx, mut rx) = mpsc::channel(4);
        let mut launcher = Launcher::new(LauncherConfig::default());

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(800)).await;
            let _ = tx.send(LaunchSignal::Blur).await;
        });

        assert_eq!(launcher.run(&handoff, &page, &mut rx).await, LaunchState::Success);
        assert_eq!(page.fallbacks.load(Ordering::SeqCst), 0);
        assert_eq!(handoff.names().last(), Some(&"remove_embed"));
    }

    #[tokio::test(start_paused = true)]
    async fn hidden_page_without_signal_is_success() {
        let handoff = Recorder::default();
        let page = Page::visible();
        page.visible.store(false, Ordering::SeqCst);
        let (tx, mut rx) = mpsc::channel(1);
        drop(tx);

        let mut launcher = Launcher::new(LauncherConfig::default());
        assert_eq!(launcher.run(&handoff, &page, &mut rx).await, LaunchState::Success);
        assert_eq!(page.fallbacks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_channel_still_waits_for_timeout() {
        let handoff = Recorder::default();
        let page = Page::visible();
        let (tx, mut rx) = mpsc::channel::<LaunchSignal>(1);
        drop(tx);

        let started = Instant::now();
        let mut launcher = Launcher::new(LauncherConfig::default());
        assert_eq!(launcher.run(&handoff, &page, &mut rx).await, LaunchState::Fallback);
        assert!(started.elapsed() >= Duration::from_millis(2500));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_navigation_does_not_delay_the_fallback() {
        let handoff = StalledHandoff::default();
        let page = Page::visible();
        let (_tx, mut rx) = mpsc::channel(4);

        let started = Instant::now();
        let mut launcher = Launcher::new(LauncherConfig::default());
        assert_eq!(launcher.run(&handoff, &page, &mut rx).await, LaunchState::Fallback);

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(2500) && elapsed < Duration::from_secs(3), "{elapsed:?}");
        assert_eq!(page.fallbacks.load(Ordering::SeqCst), 1);
        assert_eq!(handoff.inner.names(), vec!["embed", "navigate", "remove_embed"]);
    }
}
