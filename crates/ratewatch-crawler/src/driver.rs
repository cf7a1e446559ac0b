//! The page-driver capability the crawler depends on.
//!
//! Anything that can render a page and let us poke at it implements
//! [`PageDriver`]: the production [`crate::WebDriverSession`], or an
//! in-memory fake in tests. The crawler never assumes a specific renderer.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::DriverError;

/// Interval between element lookups while waiting for an element.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// How to find an element on the rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    XPath(String),
    TagName(String),
}

impl Locator {
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Locator::XPath(expression.into())
    }

    #[must_use]
    pub fn tag(name: impl Into<String>) -> Self {
        Locator::TagName(name.into())
    }

    /// The W3C WebDriver location strategy name.
    #[must_use]
    pub fn strategy(&self) -> &'static str {
        match self {
            Locator::Css(_) => "css selector",
            Locator::XPath(_) => "xpath",
            Locator::TagName(_) => "tag name",
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Locator::Css(v) | Locator::XPath(v) | Locator::TagName(v) => v,
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

/// Opaque reference to an element on the current page.
///
/// Handles are only valid until the page re-renders or navigates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// A rendered-page session. One session serves one crawl at a time; callers
/// hold it by `&mut`.
// Futures are driven on the caller's task, so no `Send` bound is needed.
#[allow(async_fn_in_trait)]
pub trait PageDriver {
    /// Loads `url` and returns once the renderer reports the navigation done.
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    /// Serialized markup of the current page, as rendered.
    async fn page_source(&mut self) -> Result<String, DriverError>;

    /// First element matching `locator`, or `None` when nothing matches.
    async fn find_element(
        &mut self,
        locator: &Locator,
    ) -> Result<Option<ElementHandle>, DriverError>;

    /// Every element matching `locator`, in document order.
    async fn find_elements(&mut self, locator: &Locator)
        -> Result<Vec<ElementHandle>, DriverError>;

    /// Rendered text of an element.
    async fn element_text(&mut self, element: &ElementHandle) -> Result<String, DriverError>;

    /// Value of an attribute, `None` when the attribute is absent.
    async fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError>;

    async fn click(&mut self, element: &ElementHandle) -> Result<(), DriverError>;

    /// Polls [`Self::find_element`] until it matches or `timeout` elapses.
    ///
    /// Returns `Ok(None)` on timeout; a timeout is never an error.
    async fn wait_for_element(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Option<ElementHandle>, DriverError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(element) = self.find_element(locator).await? {
                return Ok(Some(element));
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL.min(deadline - now)).await;
        }
    }
}
