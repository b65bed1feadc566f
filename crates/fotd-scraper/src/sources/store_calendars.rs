//! One page per store; each page lists upcoming days as headings with a
//! link to that day's flavor detail page.
//!
//! A failing store gets a placeholder record and the remaining stores are
//! still visited. A browser outage escalates only when it hit every store.

use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use fotd_core::{Flavor, FlavorDay, Location, LocationStatus};
use regex::Regex;
use serde::Deserialize;

use super::dates::classify_day_label;
use super::{location_for, placeholder_day, ScrapeContext, Source, StoreInfo};
use crate::error::ScraperError;
use crate::query;

/// Each heading with the links that follow it up to the next heading.
const DAY_LINKS_SCRIPT: &str = r"(() => {
  const days = [];
  let current = null;
  const walker = document.createTreeWalker(document.body, NodeFilter.SHOW_ELEMENT);
  for (let node = walker.nextNode(); node; node = walker.nextNode()) {
    if (/^H[1-6]$/.test(node.tagName)) {
      current = { heading: (node.innerText || node.textContent || '').trim(), links: [] };
      days.push(current);
    } else if (current && node.tagName === 'A') {
      current.links.push({
        href: node.getAttribute('href') || '',
        text: (node.innerText || node.textContent || '').trim(),
      });
    }
  }
  return days;
})()";

static FLAVOR_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/flavor-of-the-day/").expect("valid regex"));

#[derive(Debug, Clone, Deserialize)]
pub(super) struct DayLinks {
    heading: String,
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct Link {
    href: String,
    text: String,
}

pub struct StoreCalendars {
    name: String,
    url_base: String,
    stores: Vec<StoreInfo>,
}

impl StoreCalendars {
    pub fn new(name: &str, url_base: &str, stores: Vec<StoreInfo>) -> Self {
        Self {
            name: name.to_owned(),
            url_base: url_base.trim_end_matches('/').to_owned(),
            stores,
        }
    }

    fn store_url(&self, store: &StoreInfo) -> String {
        format!("{}/{}", self.url_base, store.slug)
    }

    async fn scrape_store(
        &self,
        ctx: &ScrapeContext,
        url: &str,
    ) -> Result<Vec<FlavorDay>, ScraperError> {
        let page = ctx.open(url).await?;
        ctx.settle().await;
        let days = query::live::<Vec<DayLinks>>(page.as_ref(), DAY_LINKS_SCRIPT).await;
        page.release().await;
        Ok(calendar_from_days(&days?, ctx.clock().today()))
    }

    /// Always yields a record for `store`; the error comes back alongside a
    /// placeholder record when it is one that escalates.
    async fn extract_store(
        &self,
        ctx: &ScrapeContext,
        store: &StoreInfo,
    ) -> (Location, Option<ScraperError>) {
        let url = self.store_url(store);
        let mut escalated = None;
        let calendar = match self.scrape_store(ctx, &url).await {
            Ok(calendar) if !calendar.is_empty() => calendar,
            Ok(_) => {
                tracing::info!(
                    source = %self.name,
                    store = store.slug,
                    "no flavor links found; using placeholder"
                );
                vec![placeholder_day(ctx.clock(), &url)]
            }
            Err(err) => {
                tracing::warn!(
                    source = %self.name,
                    store = store.slug,
                    error = %err,
                    "store extraction failed; substituting placeholder"
                );
                if self.escalates(&err) {
                    escalated = Some(err);
                }
                vec![placeholder_day(ctx.clock(), &url)]
            }
        };
        let location = location_for(&self.name, store, LocationStatus::Open, calendar);
        (location, escalated)
    }
}

#[async_trait]
impl Source for StoreCalendars {
    fn name(&self) -> &str {
        &self.name
    }

    async fn extract(&self, ctx: &ScrapeContext) -> Result<Vec<Location>, ScraperError> {
        let mut locations = Vec::with_capacity(self.stores.len());
        let mut outage = None;
        let mut reached = 0usize;
        for (index, store) in self.stores.iter().enumerate() {
            if index > 0 {
                ctx.pause_between_locations().await;
            }
            let (location, escalated) = self.extract_store(ctx, store).await;
            match escalated {
                Some(err) => {
                    outage.get_or_insert(err);
                }
                None => reached += 1,
            }
            locations.push(location);
        }

        match outage {
            Some(err) if reached == 0 => Err(err),
            _ => Ok(locations),
        }
    }
}

/// Days whose heading classifies and which link to a flavor page; the first
/// such link's text names the flavor.
pub(super) fn calendar_from_days(days: &[DayLinks], today: NaiveDate) -> Vec<FlavorDay> {
    days.iter()
        .filter_map(|day| {
            let (date, day_label) = classify_day_label(&day.heading, today)?;
            let link = day.links.iter().find(|l| FLAVOR_LINK.is_match(&l.href))?;
            let flavor = Flavor::from_scraped(&link.text, None)?;
            Some(FlavorDay {
                date,
                day_label,
                flavors: vec![flavor],
            })
        })
        .collect()
}
