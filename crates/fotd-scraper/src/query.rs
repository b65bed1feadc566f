//! Document queries over a loaded page.
//!
//! Two access patterns:
//! - offline: serialize the page with [`snapshot_markup`] and run CSS
//!   selectors over a parsed [`Html`] tree;
//! - live: run a script inside the page with [`live`] and deserialize the
//!   plain values it returns.
//!
//! Parsed trees are not `Send`, so offline parsing happens in synchronous
//! functions that take markup and return owned values.

use scraper::{ElementRef, Html, Selector};
use serde::de::DeserializeOwned;

use crate::browser::PageSession;
use crate::error::ScraperError;

/// Serialize the page's current DOM for offline querying.
///
/// # Errors
///
/// Propagates [`ScraperError::Query`] from the page session.
pub async fn snapshot_markup(page: &dyn PageSession) -> Result<String, ScraperError> {
    page.html().await
}

/// Evaluate `script` in the page and deserialize its result.
///
/// # Errors
///
/// Returns [`ScraperError::Query`] if the script fails or its value does not
/// match `T`.
pub async fn live<T: DeserializeOwned>(
    page: &dyn PageSession,
    script: &str,
) -> Result<T, ScraperError> {
    let value = page.evaluate(script).await?;
    serde_json::from_value(value)
        .map_err(|e| ScraperError::Query(format!("unexpected live query result: {e}")))
}

pub fn parse(markup: &str) -> Html {
    Html::parse_document(markup)
}

/// Compile a selector known at compile time.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

/// Text content of `element` with whitespace runs collapsed.
pub fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapsed text of the whole `<body>`, or of the document if it has none.
pub fn body_text(doc: &Html) -> String {
    let body = selector("body");
    doc.select(&body)
        .next()
        .map_or_else(|| text_of(doc.root_element()), text_of)
}

/// Following element siblings of `element`, in document order.
pub fn next_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.next_siblings().filter_map(ElementRef::wrap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedBrowser, ScriptedResponse};
    use crate::Browse;

    #[test]
    fn text_of_collapses_whitespace() {
        let doc = parse("<h2>  Today's\n   Flavors  </h2>");
        let h2 = doc.select(&selector("h2")).next().unwrap();
        assert_eq!(text_of(h2), "Today's Flavors");
    }

    #[test]
    fn body_text_reads_whole_body() {
        let doc = parse("<html><body><p>Closed</p><p>for winter</p></body></html>");
        assert_eq!(body_text(&doc), "Closed for winter");
    }

    #[test]
    fn next_elements_skips_text_nodes() {
        let doc = parse("<div><h2>A</h2> text <h3>B</h3><p>C</p></div>");
        let h2 = doc.select(&selector("h2")).next().unwrap();
        let tags: Vec<_> = next_elements(h2).map(|e| e.value().name().to_owned()).collect();
        assert_eq!(tags, vec!["h3", "p"]);
    }

    #[tokio::test]
    async fn live_deserializes_script_result() {
        let url = "https://example.com";
        let browser = ScriptedBrowser::new().page(
            url,
            ScriptedResponse::live(serde_json::json!([{"heading": "Today"}])),
        );
        let page = browser.acquire().await.unwrap();
        page.load(url).await.unwrap();

        #[derive(serde::Deserialize)]
        struct Row {
            heading: String,
        }
        let rows: Vec<Row> = live(page.as_ref(), "ignored").await.unwrap();
        assert_eq!(rows[0].heading, "Today");

        let err = live::<Vec<u32>>(page.as_ref(), "ignored").await.unwrap_err();
        assert!(matches!(err, ScraperError::Query(_)));
        page.release().await;
    }
}
