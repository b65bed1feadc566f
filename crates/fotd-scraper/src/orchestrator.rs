//! Runs every registered source and folds the results into one snapshot.

use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;

use fotd_core::{Clock, Location, Snapshot, SourceError};
use futures::FutureExt;
use tokio::sync::Mutex;

use crate::error::ScraperError;
use crate::sources::{ScrapeContext, Source};

/// Sequential runner over a fixed, ordered source registry.
///
/// At most one run is active at a time. Sources run one after another since
/// they share a single browser.
pub struct Orchestrator {
    sources: Vec<Box<dyn Source>>,
    ctx: ScrapeContext,
    run_lock: Mutex<()>,
}

impl Orchestrator {
    pub fn new(sources: Vec<Box<dyn Source>>, ctx: ScrapeContext) -> Self {
        Self {
            sources,
            ctx,
            run_lock: Mutex::new(()),
        }
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn clock(&self) -> &Clock {
        self.ctx.clock()
    }

    /// Run every source, waiting for any run already in progress to finish first.
    pub async fn run_all(&self) -> Snapshot {
        let _guard = self.run_lock.lock().await;
        self.run_sources().await
    }

    /// Like [`Orchestrator::run_all`], but returns `None` instead of waiting
    /// when another run holds the lock.
    pub async fn try_run_all(&self) -> Option<Snapshot> {
        let Ok(_guard) = self.run_lock.try_lock() else {
            tracing::info!("orchestrator: run already in progress; skipping");
            return None;
        };
        Some(self.run_sources().await)
    }

    async fn run_sources(&self) -> Snapshot {
        tracing::info!(sources = self.sources.len(), "orchestrator: run started");

        let mut locations: Vec<Location> = Vec::new();
        let mut errors: Vec<SourceError> = Vec::new();
        let mut seen_ids: HashSet<String> = HashSet::new();

        for source in &self.sources {
            let name = source.name();
            match self.extract_isolated(source.as_ref()).await {
                Ok(found) => {
                    tracing::info!(source = name, locations = found.len(), "source complete");
                    for location in found {
                        if seen_ids.insert(location.id.clone()) {
                            locations.push(location);
                        } else {
                            tracing::warn!(
                                source = name,
                                id = %location.id,
                                "dropping duplicate location id"
                            );
                        }
                    }
                }
                Err(err) => {
                    tracing::error!(source = name, error = %err, "source failed");
                    errors.push(SourceError {
                        source: name.to_owned(),
                        message: err.to_string(),
                        timestamp: self.ctx.clock().now(),
                    });
                }
            }
        }

        let now = self.ctx.clock().now();
        let snapshot = Snapshot::new(now, self.ctx.clock().display(now), locations, errors);
        tracing::info!(
            locations = snapshot.total_locations,
            errors = snapshot.errors.len(),
            "orchestrator: run finished"
        );
        snapshot
    }

    /// One source's extraction with panics converted into errors.
    async fn extract_isolated(&self, source: &dyn Source) -> Result<Vec<Location>, ScraperError> {
        AssertUnwindSafe(source.extract(&self.ctx))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(ScraperError::Panicked(panic_message(payload.as_ref()))))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_owned())
}
