// Element lookup abstraction shared by the live browser and static snapshots

use crate::error::Result;
use std::fmt;
use std::time::Duration;

/// A structural query against the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query<'a> {
    /// Any descendant matching a CSS selector
    Css(&'a str),
    /// Direct element children with the given tag name
    Children(&'a str),
}

impl fmt::Display for Query<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Css(css) => write!(f, "css `{}`", css),
            Query::Children(tag) => write!(f, "children `{}`", tag),
        }
    }
}

/// An element handle on a rendered page.
///
/// Every lookup is awaited to completion before the next one starts, so the
/// caller sees the same blocking-wait behaviour a synchronous driver gives.
#[allow(async_fn_in_trait)]
pub trait Element: Sized {
    /// First matching descendant, failing with `ElementNotFound` immediately.
    async fn find(&self, query: Query<'_>) -> Result<Self>;

    /// All matching descendants in document order.
    async fn find_all(&self, query: Query<'_>) -> Result<Vec<Self>>;

    /// Poll for a matching descendant until `bound` elapses.
    async fn wait_for(&self, query: Query<'_>, bound: Duration) -> Result<Self>;

    /// Rendered text of the element.
    async fn text(&self) -> Result<String>;

    /// Attribute value, `None` when the attribute is not set.
    async fn attr(&self, name: &str) -> Result<Option<String>>;

    /// Like `find`, but a missing element is `None` rather than an error.
    async fn find_optional(&self, query: Query<'_>) -> Result<Option<Self>> {
        match self.find(query).await {
            Ok(element) => Ok(Some(element)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// A loaded page that elements can be located on.
#[allow(async_fn_in_trait)]
pub trait Page {
    type Element<'p>: Element
    where
        Self: 'p;

    async fn wait_for(&self, query: Query<'_>, bound: Duration) -> Result<Self::Element<'_>>;

    async fn find_all(&self, query: Query<'_>) -> Result<Vec<Self::Element<'_>>>;

    /// Scroll the viewport so lazily rendered sections are produced.
    async fn scroll_to(&self, y: i64) -> Result<()>;
}
