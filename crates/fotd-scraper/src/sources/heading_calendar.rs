//! Server-rendered forecast: day headings followed by flavor headings and
//! description paragraphs.
//!
//! ```html
//! <h2>Today's Flavors – Monday 1/5</h2>
//! <h3>Butter Pecan</h3>
//! <p>Vanilla custard loaded with buttered pecans.</p>
//! <h2>Tuesday 1/6</h2>
//! ...
//! ```
//!
//! Every store of the chain serves the same forecast, so one parsed calendar
//! is copied into each store's record.

use async_trait::async_trait;
use chrono::NaiveDate;
use fotd_core::{Clock, Flavor, FlavorDay, Location, LocationStatus};

use super::dates::classify_day_heading;
use super::{absorb_failure, location_for, placeholder_day, ScrapeContext, Source, StoreInfo};
use crate::error::ScraperError;
use crate::query;

const DAY_HEADING: &str = "h2";
const FLAVOR_HEADINGS: [&str; 2] = ["h3", "h4"];
const DESCRIPTION: &str = "p";

pub struct HeadingCalendar {
    name: String,
    url: String,
    stores: Vec<StoreInfo>,
}

impl HeadingCalendar {
    pub fn new(name: &str, url: &str, stores: Vec<StoreInfo>) -> Self {
        Self {
            name: name.to_owned(),
            url: url.to_owned(),
            stores,
        }
    }

    fn locations(&self, status: LocationStatus, calendar: &[FlavorDay]) -> Vec<Location> {
        self.stores
            .iter()
            .map(|store| location_for(&self.name, store, status, calendar.to_vec()))
            .collect()
    }

    fn placeholders(&self, clock: &Clock) -> Vec<Location> {
        let day = placeholder_day(clock, &self.url);
        self.locations(LocationStatus::Open, &[day])
    }

    async fn scrape(&self, ctx: &ScrapeContext) -> Result<Vec<Location>, ScraperError> {
        let page = ctx.open(&self.url).await?;
        let markup = query::snapshot_markup(page.as_ref()).await;
        page.release().await;

        let calendar = parse_calendar(&markup?, ctx.clock().today());
        if calendar.is_empty() {
            return Err(ScraperError::extraction(&self.name, "no day headings found"));
        }
        tracing::debug!(source = %self.name, days = calendar.len(), "parsed forecast");
        Ok(self.locations(LocationStatus::Open, &calendar))
    }
}

#[async_trait]
impl Source for HeadingCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    async fn extract(&self, ctx: &ScrapeContext) -> Result<Vec<Location>, ScraperError> {
        let result = self.scrape(ctx).await;
        absorb_failure(self, result, || self.placeholders(ctx.clock()))
    }
}

/// Parse every recognised day heading and the flavors listed under it.
///
/// Collection for a day stops at the next heading of the day-heading level,
/// whether or not that heading is itself a recognised day.
pub(super) fn parse_calendar(markup: &str, today: NaiveDate) -> Vec<FlavorDay> {
    let doc = query::parse(markup);
    let headings = query::selector(DAY_HEADING);

    let mut days = Vec::new();
    for heading in doc.select(&headings) {
        let Some((date, day_label)) = classify_day_heading(&query::text_of(heading), today) else {
            continue;
        };

        let mut flavors = Vec::new();
        let mut pending: Option<String> = None;
        for sibling in query::next_elements(heading) {
            let tag = sibling.value().name();
            if tag == DAY_HEADING {
                break;
            }
            if FLAVOR_HEADINGS.contains(&tag) {
                if let Some(name) = pending.take() {
                    flavors.extend(Flavor::from_scraped(&name, None));
                }
                pending = Some(query::text_of(sibling));
            } else if tag == DESCRIPTION {
                if let Some(name) = pending.take() {
                    let description = query::text_of(sibling);
                    flavors.extend(Flavor::from_scraped(&name, Some(&description)));
                }
            }
        }
        if let Some(name) = pending.take() {
            flavors.extend(Flavor::from_scraped(&name, None));
        }

        days.push(FlavorDay {
            date,
            day_label,
            flavors,
        });
    }
    days
}
