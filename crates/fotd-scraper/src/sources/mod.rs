//! Per-source extraction adapters.
//!
//! Each adapter turns one restaurant's website into [`Location`] records.
//! Adapters absorb navigation failures and unexpected markup into
//! placeholder records; only errors for which [`Source::escalates`] returns
//! `true` reach the orchestrator.
//!
//! | adapter | navigation / markup failure | browser unavailable |
//! |---------|-----------------------------|---------------------|
//! | [`HeadingCalendar`] | placeholder per store | escalate |
//! | [`ImageBlockHeuristic`] | placeholder | escalate |
//! | [`StoreCalendars`] | placeholder per store | placeholder per store; escalate if all hit it |
//! | [`FixedMenu`] | never fails | never fails |
//! | [`SeasonalStand`] | placeholder, status unknown | escalate |

mod dates;
mod fixed_menu;
mod heading_calendar;
mod image_heuristic;
mod registry;
mod seasonal;
mod store_calendars;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fotd_core::{
    AppConfig, CalendarDate, Clock, DayLabel, Flavor, FlavorDay, Location, LocationStatus,
};

use crate::browser::{Browse, PageSession};
use crate::error::ScraperError;
use crate::navigator::Navigator;

pub use fixed_menu::FixedMenu;
pub use heading_calendar::HeadingCalendar;
pub use image_heuristic::ImageBlockHeuristic;
pub use registry::{default_sources, StoreInfo};
pub use seasonal::SeasonalStand;
pub use store_calendars::StoreCalendars;

/// Flavor name carried by placeholder records.
pub const PLACEHOLDER_FLAVOR: &str = "Check website";

/// One registered source.
#[async_trait]
pub trait Source: Send + Sync {
    /// Stable source name; also the prefix of every location id it emits.
    fn name(&self) -> &str;

    /// Whether `err` must reach the orchestrator instead of being absorbed.
    fn escalates(&self, err: &ScraperError) -> bool {
        matches!(err, ScraperError::BrowserUnavailable(_))
    }

    /// Extract this source's locations, in the source's own registry order.
    ///
    /// # Errors
    ///
    /// Only errors for which [`Source::escalates`] is `true`.
    async fn extract(&self, ctx: &ScrapeContext) -> Result<Vec<Location>, ScraperError>;
}

/// Everything an adapter needs for one run.
pub struct ScrapeContext {
    browser: Arc<dyn Browse>,
    navigator: Navigator,
    clock: Clock,
    settle_delay: Duration,
    location_delay: Duration,
}

impl ScrapeContext {
    pub fn new(
        browser: Arc<dyn Browse>,
        navigator: Navigator,
        clock: Clock,
        settle_delay: Duration,
        location_delay: Duration,
    ) -> Self {
        Self {
            browser,
            navigator,
            clock,
            settle_delay,
            location_delay,
        }
    }

    pub fn from_app_config(browser: Arc<dyn Browse>, config: &AppConfig) -> Self {
        Self::new(
            browser,
            Navigator::from_app_config(config),
            Clock::system(config.timezone),
            Duration::from_millis(config.settle_delay_ms),
            Duration::from_millis(config.location_delay_ms),
        )
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Open a page and navigate it to `url`.
    ///
    /// On navigation failure the page is released before the error is returned.
    pub(crate) async fn open(&self, url: &str) -> Result<Box<dyn PageSession>, ScraperError> {
        let page = self.browser.acquire().await?;
        match self.navigator.navigate(page.as_ref(), url).await {
            Ok(()) => Ok(page),
            Err(err) => {
                page.release().await;
                Err(err.into())
            }
        }
    }

    /// Wait for client-side rendering before a live query.
    pub(crate) async fn settle(&self) {
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
    }

    /// Pause between consecutive stores of one source.
    pub(crate) async fn pause_between_locations(&self) {
        if !self.location_delay.is_zero() {
            tokio::time::sleep(self.location_delay).await;
        }
    }
}

/// Apply the absorb/escalate decision to an adapter result.
pub(crate) fn absorb_failure<S: Source + ?Sized>(
    source: &S,
    result: Result<Vec<Location>, ScraperError>,
    placeholder: impl FnOnce() -> Vec<Location>,
) -> Result<Vec<Location>, ScraperError> {
    match result {
        Ok(locations) => Ok(locations),
        Err(err) if source.escalates(&err) => Err(err),
        Err(err) => {
            tracing::warn!(
                source = source.name(),
                error = %err,
                "extraction failed; substituting placeholder"
            );
            Ok(placeholder())
        }
    }
}

/// A single today-labelled day pointing the reader at the source.
pub(crate) fn placeholder_day(clock: &Clock, website: &str) -> FlavorDay {
    FlavorDay {
        date: CalendarDate::Resolved(clock.today()),
        day_label: DayLabel::Today,
        flavors: vec![Flavor::new(
            PLACEHOLDER_FLAVOR,
            format!("Visit {website} for today's flavor"),
        )],
    }
}

/// Location record for `store` with the given status and calendar.
pub(crate) fn location_for(
    source: &str,
    store: &StoreInfo,
    status: LocationStatus,
    calendar: Vec<FlavorDay>,
) -> Location {
    Location {
        id: store.location_id(source),
        name: store.brand.to_owned(),
        location: store.display_name.to_owned(),
        address: store.address.to_owned(),
        phone: store.phone.to_owned(),
        status,
        hours: store.hours.to_owned(),
        website: store.website.to_owned(),
        flavor_calendar: calendar,
    }
}
