//! Client-rendered page with no stable markup: the flavor is free text in
//! the same block as a photo, near a heading that mentions the day.
//!
//! The in-page query only locates candidate blocks; the name and
//! description patterns run here so they can be tested without a browser.

use std::collections::HashSet;
use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use fotd_core::{CalendarDate, Clock, DayLabel, Flavor, FlavorDay, Location, LocationStatus};
use regex::Regex;
use serde::Deserialize;

use super::{absorb_failure, location_for, placeholder_day, ScrapeContext, Source, StoreInfo};
use crate::error::ScraperError;
use crate::query;

/// For each heading mentioning today or a weekday abbreviation, climb to
/// the nearest ancestor that contains an image and return its text.
const CANDIDATE_BLOCKS_SCRIPT: &str = r"(() => {
  const dayPattern = /Today|Mon|Tue|Wed|Thu|Fri|Sat|Sun/;
  const blocks = [];
  for (const heading of document.querySelectorAll('h1, h2, h3, h4, h5, h6')) {
    const title = (heading.innerText || heading.textContent || '').trim();
    if (!dayPattern.test(title)) continue;
    let node = heading;
    while (node && !node.querySelector('img')) node = node.parentElement;
    if (!node) continue;
    blocks.push({ heading: title, text: node.innerText || node.textContent || '' });
  }
  return blocks;
})()";

/// A capitalised phrase on its own line, or cut short by a flavor keyword.
static FLAVOR_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*([A-Z][\w'’&-]*(?:[ \t]+(?:[A-Z][\w'’&-]*|&|and|n|of|with))*?)[ \t]*(?:\r?$|\b(?:Custard|Flavor|Sundae|Shake)\b)",
    )
    .expect("valid regex")
});

static PRODUCT_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:custard|ice cream|vanilla|chocolate|swirl|swirled|pieces|chunks|loaded|blended|mixed)\b",
    )
    .expect("valid regex")
});

static WEEKDAY_ABBREVIATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(Mon|Tue|Wed|Thu|Fri|Sat|Sun)").expect("valid regex"));

#[derive(Debug, Clone, Deserialize)]
pub(super) struct CandidateBlock {
    heading: String,
    text: String,
}

pub struct ImageBlockHeuristic {
    name: String,
    url: String,
    store: StoreInfo,
}

impl ImageBlockHeuristic {
    pub fn new(name: &str, url: &str, store: StoreInfo) -> Self {
        Self {
            name: name.to_owned(),
            url: url.to_owned(),
            store,
        }
    }

    fn location(&self, calendar: Vec<FlavorDay>) -> Location {
        location_for(&self.name, &self.store, LocationStatus::Open, calendar)
    }

    fn placeholder(&self, clock: &Clock) -> Vec<Location> {
        vec![self.location(vec![placeholder_day(clock, &self.url)])]
    }

    async fn scrape(&self, ctx: &ScrapeContext) -> Result<Vec<Location>, ScraperError> {
        let page = ctx.open(&self.url).await?;
        ctx.settle().await;
        let blocks =
            query::live::<Vec<CandidateBlock>>(page.as_ref(), CANDIDATE_BLOCKS_SCRIPT).await;
        page.release().await;

        let mut calendar = calendar_from_blocks(&blocks?, ctx.clock().today());
        if calendar.is_empty() {
            tracing::info!(source = %self.name, "no flavor blocks recognised; using placeholder");
            calendar.push(placeholder_day(ctx.clock(), &self.url));
        }
        Ok(vec![self.location(calendar)])
    }
}

#[async_trait]
impl Source for ImageBlockHeuristic {
    fn name(&self) -> &str {
        &self.name
    }

    async fn extract(&self, ctx: &ScrapeContext) -> Result<Vec<Location>, ScraperError> {
        let result = self.scrape(ctx).await;
        absorb_failure(self, result, || self.placeholder(ctx.clock()))
    }
}

/// Day for a block heading: "Today" resolves to `today`, otherwise the
/// weekday abbreviation labels the day and the heading is kept as its date.
fn day_of(heading: &str, today: NaiveDate) -> Option<(CalendarDate, DayLabel)> {
    if heading.contains("Today") {
        return Some((CalendarDate::Resolved(today), DayLabel::Today));
    }
    let caps = WEEKDAY_ABBREVIATION.captures(heading)?;
    let weekday = caps[1].parse().ok()?;
    Some((
        CalendarDate::label(heading),
        DayLabel::Weekday(weekday),
    ))
}

/// Flavor named in a block's text, with the first product-describing line.
pub(super) fn flavor_from_block(block: &CandidateBlock) -> Option<Flavor> {
    // The heading text is part of the block; drop it so it is not taken for the name.
    let body = block.text.replacen(block.heading.as_str(), "", 1);

    let name = FLAVOR_NAME
        .captures_iter(&body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .find(|candidate| !candidate.is_empty())?;

    let description = body
        .lines()
        .map(str::trim)
        .find(|line| *line != name && PRODUCT_KEYWORD.is_match(line));

    Flavor::from_scraped(name, description)
}

/// Group recognised flavors by day, in first-seen order, without duplicates.
pub(super) fn calendar_from_blocks(blocks: &[CandidateBlock], today: NaiveDate) -> Vec<FlavorDay> {
    let mut days: Vec<FlavorDay> = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for block in blocks {
        let Some((date, day_label)) = day_of(&block.heading, today) else {
            continue;
        };
        let Some(flavor) = flavor_from_block(block) else {
            continue;
        };
        if !seen.insert((date.to_string(), flavor.name.clone())) {
            continue;
        }
        match days.iter_mut().find(|d| d.date == date) {
            Some(day) => day.flavors.push(flavor),
            None => days.push(FlavorDay {
                date,
                day_label,
                flavors: vec![flavor],
            }),
        }
    }
    days
}
