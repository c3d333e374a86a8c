// Static HTML backend for the locator traits

use crate::error::{Result, ScanError};
use crate::locator::{Element, Page, Query};
use scraper::{ElementRef, Html, Selector};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// An already-rendered document, e.g. a page saved from the browser.
///
/// Nothing changes after parsing, so waits resolve on the first attempt.
pub struct HtmlSnapshot {
    document: Html,
}

impl HtmlSnapshot {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading HTML snapshot from {}", path.display());
        let html = fs::read_to_string(path)?;
        Ok(Self::parse(&html))
    }

    fn root(&self) -> SnapshotElement<'_> {
        SnapshotElement(self.document.root_element())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SnapshotElement<'a>(ElementRef<'a>);

impl<'a> SnapshotElement<'a> {
    fn matches(&self, query: Query<'_>) -> Result<Vec<SnapshotElement<'a>>> {
        match query {
            Query::Css(css) => {
                let selector = Selector::parse(css)
                    .map_err(|e| ScanError::InvalidSelector(format!("{}: {}", css, e)))?;
                Ok(self.0.select(&selector).map(SnapshotElement).collect())
            }
            Query::Children(tag) => Ok(self
                .0
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|child| child.value().name().eq_ignore_ascii_case(tag))
                .map(SnapshotElement)
                .collect()),
        }
    }

    fn first(&self, query: Query<'_>, waited: Duration) -> Result<SnapshotElement<'a>> {
        self.matches(query)?
            .into_iter()
            .next()
            .ok_or_else(|| ScanError::not_found(query, waited))
    }
}

impl Element for SnapshotElement<'_> {
    async fn find(&self, query: Query<'_>) -> Result<Self> {
        self.first(query, Duration::ZERO)
    }

    async fn find_all(&self, query: Query<'_>) -> Result<Vec<Self>> {
        self.matches(query)
    }

    async fn wait_for(&self, query: Query<'_>, bound: Duration) -> Result<Self> {
        self.first(query, bound)
    }

    async fn text(&self) -> Result<String> {
        let raw: String = self.0.text().collect();
        Ok(raw.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    async fn attr(&self, name: &str) -> Result<Option<String>> {
        Ok(self.0.value().attr(name).map(str::to_string))
    }
}

impl Page for HtmlSnapshot {
    type Element<'p> = SnapshotElement<'p>;

    async fn wait_for(&self, query: Query<'_>, bound: Duration) -> Result<SnapshotElement<'_>> {
        self.root().first(query, bound)
    }

    async fn find_all(&self, query: Query<'_>) -> Result<Vec<SnapshotElement<'_>>> {
        self.root().matches(query)
    }

    async fn scroll_to(&self, _y: i64) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <div class="panel">
            <div><span>Balance</span><h3>  1.5
                ETH </h3></div>
            <div><span>Txns</span><h3>42</h3><div>nested</div></div>
        </div>
        <a href="/tx/0xabc?chain=eth" title="tip">link</a>
    </body></html>"#;

    #[tokio::test]
    async fn test_text_is_whitespace_normalised() {
        let page = HtmlSnapshot::parse(PAGE);
        let panel = page.wait_for(Query::Css("div.panel"), Duration::ZERO).await.unwrap();
        let value = panel.find(Query::Css("h3")).await.unwrap();
        assert_eq!(value.text().await.unwrap(), "1.5 ETH");
    }

    #[tokio::test]
    async fn test_children_only_returns_direct_children() {
        let page = HtmlSnapshot::parse(PAGE);
        let panel = page.wait_for(Query::Css("div.panel"), Duration::ZERO).await.unwrap();
        let blocks = panel.find_all(Query::Children("div")).await.unwrap();
        assert_eq!(blocks.len(), 2);

        let all_divs = panel.find_all(Query::Css("div")).await.unwrap();
        assert_eq!(all_divs.len(), 3);
    }

    #[tokio::test]
    async fn test_missing_element_reports_query_and_bound() {
        let page = HtmlSnapshot::parse(PAGE);
        let err = page
            .wait_for(Query::Css("table"), Duration::from_secs(10))
            .await
            .unwrap_err();
        match err {
            ScanError::ElementNotFound { query, waited } => {
                assert!(query.contains("table"));
                assert_eq!(waited, Duration::from_secs(10));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_find_optional_and_attr() {
        let page = HtmlSnapshot::parse(PAGE);
        let body = page.wait_for(Query::Css("body"), Duration::ZERO).await.unwrap();
        assert!(body.find_optional(Query::Css("p")).await.unwrap().is_none());

        let link = body.find(Query::Css("a")).await.unwrap();
        assert_eq!(
            link.attr("href").await.unwrap().as_deref(),
            Some("/tx/0xabc?chain=eth")
        );
        assert_eq!(link.attr("rel").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_selector_is_an_error() {
        let page = HtmlSnapshot::parse(PAGE);
        let err = page.find_all(Query::Css("div[")).await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidSelector(_)));
    }
}
