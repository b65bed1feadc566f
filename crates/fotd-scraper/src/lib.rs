//! Multi-source flavor-of-the-day extraction.
//!
//! A shared headless browser ([`BrowserPool`]) feeds page sessions to the
//! per-source adapters in [`sources`]; [`Orchestrator`] runs every adapter in
//! registry order and folds the results into one [`fotd_core::Snapshot`].

pub mod browser;
pub mod error;
pub mod navigator;
pub mod orchestrator;
pub mod query;
pub mod sources;

#[cfg(test)]
mod testing;

pub use browser::{Browse, BrowserPool, BrowserState, PageSession};
pub use error::{NavigationError, ScraperError};
pub use navigator::Navigator;
pub use orchestrator::Orchestrator;
pub use sources::{default_sources, ScrapeContext, Source};
