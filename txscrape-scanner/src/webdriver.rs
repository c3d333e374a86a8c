// Live browser backend driven over the WebDriver protocol

use crate::error::{Result, ScanError};
use crate::locator::{Element, Page, Query};
use fantoccini::elements::Element as RemoteElement;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Owned form of a `Query`, since `Locator` only borrows its expression.
struct LocatorSpec {
    expr: String,
    xpath: bool,
}

impl LocatorSpec {
    fn new(query: Query<'_>) -> Self {
        match query {
            Query::Css(css) => Self {
                expr: css.to_string(),
                xpath: false,
            },
            Query::Children(tag) => Self {
                expr: format!("./{}", tag),
                xpath: true,
            },
        }
    }

    fn locator(&self) -> Locator<'_> {
        if self.xpath {
            Locator::XPath(&self.expr)
        } else {
            Locator::Css(&self.expr)
        }
    }
}

/// Retry `attempt` while it reports a missing element, up to `bound`.
async fn poll_for<T, F, Fut>(query: Query<'_>, bound: Duration, mut attempt: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, CmdError>>,
{
    let started = Instant::now();
    loop {
        match attempt().await {
            Ok(found) => return Ok(found),
            Err(e) if e.is_no_such_element() => {
                if started.elapsed() >= bound {
                    return Err(ScanError::not_found(query, bound));
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn miss_to_not_found(e: CmdError, query: Query<'_>) -> ScanError {
    if e.is_no_such_element() {
        ScanError::not_found(query, Duration::ZERO)
    } else {
        e.into()
    }
}

pub struct WebDriverElement(RemoteElement);

impl Element for WebDriverElement {
    async fn find(&self, query: Query<'_>) -> Result<Self> {
        let spec = LocatorSpec::new(query);
        self.0
            .find(spec.locator())
            .await
            .map(WebDriverElement)
            .map_err(|e| miss_to_not_found(e, query))
    }

    async fn find_all(&self, query: Query<'_>) -> Result<Vec<Self>> {
        let spec = LocatorSpec::new(query);
        let found = self.0.find_all(spec.locator()).await?;
        Ok(found.into_iter().map(WebDriverElement).collect())
    }

    async fn wait_for(&self, query: Query<'_>, bound: Duration) -> Result<Self> {
        let spec = LocatorSpec::new(query);
        let (element, spec) = (&self.0, &spec);
        poll_for(query, bound, move || element.find(spec.locator()))
            .await
            .map(WebDriverElement)
    }

    async fn text(&self) -> Result<String> {
        Ok(self.0.text().await?)
    }

    async fn attr(&self, name: &str) -> Result<Option<String>> {
        Ok(self.0.attr(name).await?)
    }
}

/// The current page of a WebDriver session.
pub struct WebDriverPage {
    client: Client,
}

impl Page for WebDriverPage {
    type Element<'p> = WebDriverElement;

    async fn wait_for(&self, query: Query<'_>, bound: Duration) -> Result<WebDriverElement> {
        let spec = LocatorSpec::new(query);
        let (client, spec) = (&self.client, &spec);
        poll_for(query, bound, move || client.find(spec.locator()))
            .await
            .map(WebDriverElement)
    }

    async fn find_all(&self, query: Query<'_>) -> Result<Vec<WebDriverElement>> {
        let spec = LocatorSpec::new(query);
        let found = self.client.find_all(spec.locator()).await?;
        Ok(found.into_iter().map(WebDriverElement).collect())
    }

    async fn scroll_to(&self, y: i64) -> Result<()> {
        self.client
            .execute(&format!("window.scroll(0, {})", y), vec![])
            .await?;
        Ok(())
    }
}

/// A browser session opened on the target page.
///
/// Call `close` on every exit path; a session dropped while still open only
/// gets a warning because ending it needs an async round-trip.
pub struct WebDriverSession {
    page: WebDriverPage,
    closed: bool,
}

impl WebDriverSession {
    /// Connect to a WebDriver server and navigate to `target`.
    pub async fn open(server_url: &Url, target: &Url) -> Result<Self> {
        info!("Connecting to WebDriver at {}", server_url);
        let client = ClientBuilder::native().connect(server_url.as_str()).await?;

        debug!("Navigating to {}", target);
        if let Err(e) = client.goto(target.as_str()).await {
            warn!("Navigation to {} failed, closing session", target);
            if let Err(close_err) = client.close().await {
                warn!("Failed to close WebDriver session: {}", close_err);
            }
            return Err(e.into());
        }

        Ok(Self {
            page: WebDriverPage { client },
            closed: false,
        })
    }

    pub fn page(&self) -> &WebDriverPage {
        &self.page
    }

    /// End the browser session.
    pub async fn close(mut self) -> Result<()> {
        self.closed = true;
        debug!("Closing WebDriver session");
        self.page.client.clone().close().await?;
        Ok(())
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        if !self.closed {
            warn!("WebDriver session dropped without being closed");
        }
    }
}
