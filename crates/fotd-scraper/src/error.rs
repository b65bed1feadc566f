use std::time::Duration;

use thiserror::Error;

/// Failure to load a remote document into a page session.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("navigation to {url} timed out after {}ms", .timeout.as_millis())]
    Timeout { url: String, timeout: Duration },

    #[error("navigation to {url} failed: {message}")]
    Page { url: String, message: String },

    #[error("gave up on {url} after {attempts} attempts: {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        last: Box<NavigationError>,
    },
}

#[derive(Debug, Error)]
pub enum ScraperError {
    /// The shared browser could not be launched or reached.
    #[error("browser unavailable: {0}")]
    BrowserUnavailable(String),

    /// The browser is up but a new page could not be opened.
    #[error("could not open a page: {0}")]
    PageUnavailable(String),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// The document loaded but did not have the expected shape.
    #[error("unexpected document shape from {source_name}: {reason}")]
    Extraction { source_name: String, reason: String },

    /// Serializing the page or running an in-page query failed.
    #[error("page query failed: {0}")]
    Query(String),

    /// Produced only by the orchestrator when an adapter panics.
    #[error("adapter panicked: {0}")]
    Panicked(String),
}

impl ScraperError {
    pub(crate) fn extraction(source_name: &str, reason: impl Into<String>) -> Self {
        Self::Extraction {
            source_name: source_name.to_owned(),
            reason: reason.into(),
        }
    }
}
