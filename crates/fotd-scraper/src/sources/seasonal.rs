//! A seasonal stand: closed all winter, otherwise one featured flavor.

use async_trait::async_trait;
use chrono::NaiveDate;
use fotd_core::{CalendarDate, Clock, DayLabel, Flavor, FlavorDay, Location, LocationStatus};

use super::{absorb_failure, location_for, placeholder_day, ScrapeContext, Source, StoreInfo};
use crate::error::ScraperError;
use crate::query;

const HEADINGS: &str = "h1, h2, h3, h4, h5, h6";
const FEATURED_MARKERS: [&str; 2] = ["featured flavor", "flavor of the day"];
const CLOSED_LABEL: &str = "Closed for winter";
const CLOSED_FLAVOR: &str = "Closed for the season";
const IN_STORE_FLAVOR: &str = "Check in-store";
const IN_STORE_DESCRIPTION: &str = "Ask at the counter for today's featured flavor";

/// What the landing page says about today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum StandReport {
    ClosedForWinter,
    Featured(Flavor),
}

pub struct SeasonalStand {
    name: String,
    url: String,
    store: StoreInfo,
    reopening: String,
}

impl SeasonalStand {
    pub fn new(name: &str, url: &str, store: StoreInfo, reopening: &str) -> Self {
        Self {
            name: name.to_owned(),
            url: url.to_owned(),
            store,
            reopening: reopening.to_owned(),
        }
    }

    fn location(&self, status: LocationStatus, day: FlavorDay) -> Location {
        location_for(&self.name, &self.store, status, vec![day])
    }

    fn placeholder(&self, clock: &Clock) -> Vec<Location> {
        vec![self.location(LocationStatus::Unknown, placeholder_day(clock, &self.url))]
    }

    fn closed(&self) -> Location {
        self.location(
            LocationStatus::Closed,
            FlavorDay {
                date: CalendarDate::label(CLOSED_LABEL),
                day_label: DayLabel::Closed,
                flavors: vec![Flavor::new(CLOSED_FLAVOR, self.reopening.clone())],
            },
        )
    }

    fn featured(&self, flavor: Flavor, today: NaiveDate) -> Location {
        self.location(
            LocationStatus::Open,
            FlavorDay {
                date: CalendarDate::Resolved(today),
                day_label: DayLabel::Today,
                flavors: vec![flavor],
            },
        )
    }

    async fn scrape(&self, ctx: &ScrapeContext) -> Result<Vec<Location>, ScraperError> {
        let page = ctx.open(&self.url).await?;
        let markup = query::snapshot_markup(page.as_ref()).await;
        page.release().await;

        let location = match read_landing_page(&markup?) {
            StandReport::ClosedForWinter => {
                tracing::info!(source = %self.name, "stand closed for winter");
                self.closed()
            }
            StandReport::Featured(flavor) => self.featured(flavor, ctx.clock().today()),
        };
        Ok(vec![location])
    }
}

#[async_trait]
impl Source for SeasonalStand {
    fn name(&self) -> &str {
        &self.name
    }

    async fn extract(&self, ctx: &ScrapeContext) -> Result<Vec<Location>, ScraperError> {
        let result = self.scrape(ctx).await;
        absorb_failure(self, result, || self.placeholder(ctx.clock()))
    }
}

/// Closed when the body mentions both "closed" and "winter"; otherwise the
/// element after a featured-flavor heading names the flavor and the next
/// paragraph describes it.
pub(super) fn read_landing_page(markup: &str) -> StandReport {
    let doc = query::parse(markup);
    let body = query::body_text(&doc).to_lowercase();
    if body.contains("closed") && body.contains("winter") {
        return StandReport::ClosedForWinter;
    }

    let featured = doc.select(&query::selector(HEADINGS)).find(|heading| {
        let text = query::text_of(*heading).to_lowercase();
        FEATURED_MARKERS.iter().any(|marker| text.contains(marker))
    });

    let flavor = featured.and_then(|heading| {
        let mut following = query::next_elements(heading);
        let name = query::text_of(following.next()?);
        let description = following
            .find(|el| el.value().name() == "p")
            .map(query::text_of);
        Flavor::from_scraped(&name, description.as_deref())
    });

    StandReport::Featured(
        flavor.unwrap_or_else(|| Flavor::new(IN_STORE_FLAVOR, IN_STORE_DESCRIPTION)),
    )
}
