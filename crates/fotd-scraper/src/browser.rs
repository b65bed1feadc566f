//! Shared headless browser.
//!
//! Launching Chromium is the most expensive step of a run, so one instance
//! is kept alive across sources and across runs. [`BrowserPool::acquire`] is
//! the only way to obtain a page; adapters never see the browser handle.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::{NavigationError, ScraperError};

/// Launch flags for constrained, container-style hosts.
const LAUNCH_ARGS: [&str; 5] = [
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--no-zygote",
    "--no-first-run",
];

/// Quiet period after the load event before a page counts as settled.
const NETWORK_QUIET_WINDOW: Duration = Duration::from_millis(500);

/// One open page (tab) of the shared browser.
///
/// Every session must be released on every exit path; an unreleased page
/// lives as long as the browser process.
#[async_trait]
pub trait PageSession: Send + Sync {
    /// One navigation attempt: load `url` and wait for network activity to go quiet.
    ///
    /// Timeouts and retries belong to [`crate::Navigator`].
    async fn load(&self, url: &str) -> Result<(), NavigationError>;

    /// Serialize the current DOM to markup.
    async fn html(&self) -> Result<String, ScraperError>;

    /// Run `script` inside the page and return its value.
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value, ScraperError>;

    /// Close the page. Close errors are logged, never returned.
    async fn release(self: Box<Self>);
}

/// Source of page sessions.
#[async_trait]
pub trait Browse: Send + Sync {
    /// Open a fresh page, launching or relaunching the browser when needed.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::BrowserUnavailable`] when no browser can be
    /// launched, or [`ScraperError::PageUnavailable`] when the browser is up
    /// but the new page cannot be opened.
    async fn acquire(&self) -> Result<Box<dyn PageSession>, ScraperError>;
}

/// Observable lifecycle of the shared browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserState {
    Absent,
    Live,
    Dead,
}

struct LiveBrowser {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl LiveBrowser {
    async fn is_healthy(&self) -> bool {
        !self.handler.is_finished() && self.browser.version().await.is_ok()
    }

    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!(error = %e, "failed to close browser cleanly");
        }
        if let Err(e) = self.browser.wait().await {
            tracing::debug!(error = %e, "failed to reap browser process");
        }
        self.handler.abort();
    }
}

/// Lazily launched, health-checked Chromium instance.
pub struct BrowserPool {
    executable: Option<PathBuf>,
    slot: Mutex<Option<LiveBrowser>>,
}

impl BrowserPool {
    /// `executable` overrides Chromium auto-detection.
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self {
            executable,
            slot: Mutex::new(None),
        }
    }

    pub async fn state(&self) -> BrowserState {
        match self.slot.lock().await.as_ref() {
            None => BrowserState::Absent,
            Some(live) if live.is_healthy().await => BrowserState::Live,
            Some(_) => BrowserState::Dead,
        }
    }

    /// Close the browser if one is running. Safe to call repeatedly.
    pub async fn shutdown(&self) {
        let Some(live) = self.slot.lock().await.take() else {
            return;
        };
        tracing::info!("shutting down shared browser");
        live.close().await;
    }

    async fn launch(&self) -> Result<LiveBrowser, ScraperError> {
        let mut builder = BrowserConfig::builder().no_sandbox().args(LAUNCH_ARGS);
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(ScraperError::BrowserUnavailable)?;

        let (browser, handler) = Browser::launch(config)
            .await
            .map_err(|e| ScraperError::BrowserUnavailable(e.to_string()))?;

        let handler = tokio::spawn(drain_events(handler));

        tracing::info!("launched shared browser");
        Ok(LiveBrowser { browser, handler })
    }
}

/// Drive the CDP connection until the browser goes away.
///
/// Event errors include unrecognised protocol messages from a healthy
/// browser, so only the end of the stream marks the connection dead.
async fn drain_events<S, E>(mut events: S)
where
    S: futures::Stream<Item = Result<(), E>> + Unpin,
    E: std::fmt::Display,
{
    while let Some(event) = events.next().await {
        if let Err(e) = event {
            tracing::debug!(error = %e, "ignoring browser event error");
        }
    }
    tracing::debug!("browser connection closed");
}

#[async_trait]
impl Browse for BrowserPool {
    async fn acquire(&self) -> Result<Box<dyn PageSession>, ScraperError> {
        let mut slot = self.slot.lock().await;

        let live = match slot.take() {
            Some(live) if live.is_healthy().await => live,
            Some(dead) => {
                tracing::warn!("shared browser disconnected; relaunching");
                dead.close().await;
                self.launch().await?
            }
            None => self.launch().await?,
        };

        let page = live.browser.new_page("about:blank").await;
        *slot = Some(live);

        let page = page.map_err(|e| ScraperError::PageUnavailable(e.to_string()))?;
        Ok(Box::new(ChromePage { page }))
    }
}

struct ChromePage {
    page: Page,
}

#[async_trait]
impl PageSession for ChromePage {
    async fn load(&self, url: &str) -> Result<(), NavigationError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| NavigationError::Page {
                url: url.to_owned(),
                message: e.to_string(),
            })?;
        tokio::time::sleep(NETWORK_QUIET_WINDOW).await;
        Ok(())
    }

    async fn html(&self) -> Result<String, ScraperError> {
        self.page
            .content()
            .await
            .map_err(|e| ScraperError::Query(e.to_string()))
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value, ScraperError> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| ScraperError::Query(e.to_string()))?
            .into_value::<serde_json::Value>()
            .map_err(|e| ScraperError::Query(e.to_string()))
    }

    async fn release(self: Box<Self>) {
        if let Err(e) = self.page.close().await {
            tracing::warn!(error = %e, "failed to close page");
        }
    }
}
