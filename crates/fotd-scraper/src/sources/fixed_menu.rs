//! A store whose menu never changes; nothing is fetched.

use async_trait::async_trait;
use fotd_core::{CalendarDate, DayLabel, Flavor, FlavorDay, Location, LocationStatus};

use super::{location_for, ScrapeContext, Source, StoreInfo};
use crate::error::ScraperError;

const EVERY_DAY: &str = "Every day";

pub struct FixedMenu {
    name: String,
    store: StoreInfo,
    menu: Vec<(&'static str, &'static str)>,
}

impl FixedMenu {
    pub fn new(name: &str, store: StoreInfo, menu: Vec<(&'static str, &'static str)>) -> Self {
        Self {
            name: name.to_owned(),
            store,
            menu,
        }
    }
}

#[async_trait]
impl Source for FixedMenu {
    fn name(&self) -> &str {
        &self.name
    }

    async fn extract(&self, _ctx: &ScrapeContext) -> Result<Vec<Location>, ScraperError> {
        let flavors = self
            .menu
            .iter()
            .map(|(name, description)| Flavor::new(*name, *description))
            .collect();
        let day = FlavorDay {
            date: CalendarDate::label(EVERY_DAY),
            day_label: DayLabel::Always,
            flavors,
        };
        Ok(vec![location_for(
            &self.name,
            &self.store,
            LocationStatus::Open,
            vec![day],
        )])
    }
}
