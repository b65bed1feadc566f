//! In-memory browser fakes for adapter and orchestrator tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use fotd_core::Clock;
use tokio::time::Instant;

use crate::browser::{Browse, PageSession};
use crate::error::{NavigationError, ScraperError};
use crate::navigator::Navigator;
use crate::sources::ScrapeContext;

#[derive(Clone)]
pub(crate) struct ScriptedResponse {
    html: String,
    live: serde_json::Value,
    failures: u32,
    delay: Duration,
    unreachable: bool,
}

impl ScriptedResponse {
    pub(crate) fn html(html: &str) -> Self {
        Self {
            html: html.to_owned(),
            live: serde_json::Value::Null,
            failures: 0,
            delay: Duration::ZERO,
            unreachable: false,
        }
    }

    pub(crate) fn live(value: serde_json::Value) -> Self {
        Self {
            live: value,
            ..Self::html("<html><body></body></html>")
        }
    }

    pub(crate) fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::html("")
        }
    }

    pub(crate) fn failing_first(mut self, failures: u32) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Default)]
struct Shared {
    pages: HashMap<String, ScriptedResponse>,
    attempts: Mutex<HashMap<String, u32>>,
    evaluated_at: Mutex<Vec<Instant>>,
    acquire_calls: AtomicUsize,
    acquired: AtomicUsize,
    released: AtomicUsize,
    unavailable: bool,
    unavailable_on: Option<usize>,
}

/// Serves canned documents keyed by URL and counts page lifecycle calls.
#[derive(Clone, Default)]
pub(crate) struct ScriptedBrowser {
    shared: Arc<Shared>,
}

impl ScriptedBrowser {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn shared_mut(&mut self) -> &mut Shared {
        Arc::get_mut(&mut self.shared).expect("configure the browser before sharing it")
    }

    pub(crate) fn page(mut self, url: &str, response: ScriptedResponse) -> Self {
        self.shared_mut().pages.insert(url.to_owned(), response);
        self
    }

    pub(crate) fn unavailable(mut self) -> Self {
        self.shared_mut().unavailable = true;
        self
    }

    /// Fail only the `call`-th acquire (1-based), as a transient outage.
    pub(crate) fn unavailable_on_acquire(mut self, call: usize) -> Self {
        self.shared_mut().unavailable_on = Some(call);
        self
    }

    /// When each live query ran, in call order.
    pub(crate) fn evaluated_at(&self) -> Vec<Instant> {
        self.shared.evaluated_at.lock().unwrap().clone()
    }

    pub(crate) fn load_attempts(&self, url: &str) -> u32 {
        self.shared
            .attempts
            .lock()
            .unwrap()
            .get(url)
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn acquired(&self) -> usize {
        self.shared.acquired.load(Ordering::SeqCst)
    }

    pub(crate) fn released(&self) -> usize {
        self.shared.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Browse for ScriptedBrowser {
    async fn acquire(&self) -> Result<Box<dyn PageSession>, ScraperError> {
        let call = self.shared.acquire_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.shared.unavailable || self.shared.unavailable_on == Some(call) {
            return Err(ScraperError::BrowserUnavailable(
                "scripted browser is down".to_owned(),
            ));
        }
        self.shared.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedPage {
            shared: Arc::clone(&self.shared),
            current: Mutex::new(None),
        }))
    }
}

struct ScriptedPage {
    shared: Arc<Shared>,
    current: Mutex<Option<ScriptedResponse>>,
}

#[async_trait]
impl PageSession for ScriptedPage {
    async fn load(&self, url: &str) -> Result<(), NavigationError> {
        let attempt = {
            let mut attempts = self.shared.attempts.lock().unwrap();
            let n = attempts.entry(url.to_owned()).or_insert(0);
            *n += 1;
            *n
        };
        let fail = |message: &str| NavigationError::Page {
            url: url.to_owned(),
            message: message.to_owned(),
        };

        let Some(response) = self.shared.pages.get(url).cloned() else {
            return Err(fail("no scripted page"));
        };
        if !response.delay.is_zero() {
            tokio::time::sleep(response.delay).await;
        }
        if response.unreachable {
            return Err(fail("connection refused"));
        }
        if attempt <= response.failures {
            return Err(fail("transient failure"));
        }
        *self.current.lock().unwrap() = Some(response);
        Ok(())
    }

    async fn html(&self) -> Result<String, ScraperError> {
        self.current
            .lock()
            .unwrap()
            .as_ref()
            .map(|r| r.html.clone())
            .ok_or_else(|| ScraperError::Query("nothing loaded".to_owned()))
    }

    async fn evaluate(&self, _script: &str) -> Result<serde_json::Value, ScraperError> {
        self.shared.evaluated_at.lock().unwrap().push(Instant::now());
        self.current
            .lock()
            .unwrap()
            .as_ref()
            .map(|r| r.live.clone())
            .ok_or_else(|| ScraperError::Query("nothing loaded".to_owned()))
    }

    async fn release(self: Box<Self>) {
        self.shared.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Monday 2026-01-05, noon in Chicago.
pub(crate) fn test_clock() -> Clock {
    Clock::fixed(
        chrono_tz::America::Chicago,
        Utc.with_ymd_and_hms(2026, 1, 5, 18, 0, 0).unwrap(),
    )
}

/// Context with zero delays and a single-shot navigator.
pub(crate) fn test_context(browser: &ScriptedBrowser) -> ScrapeContext {
    ScrapeContext::new(
        Arc::new(browser.clone()),
        Navigator::new(1, Duration::ZERO, Duration::from_secs(5)),
        test_clock(),
        Duration::ZERO,
        Duration::ZERO,
    )
}
