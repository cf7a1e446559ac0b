//! Event discovery on a rendered player profile page.
//!
//! Every event the player took part in is linked as `/event/YYYYMMDD…`.
//! [`discover_events`] reads those links off the page; [`select_events`] is
//! the pure part that dates, deduplicates, filters and orders them.

use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use chrono::NaiveDate;
use regex::Regex;
use reqwest::Url;

use crate::driver::{Locator, PageDriver};
use crate::error::CrawlError;

/// Selector for event reference links on a profile page.
pub const EVENT_LINK_SELECTOR: &str = "a[href^='/event/']";

static EVENT_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/event/([0-9]{8})").expect("valid event date regex"));

/// One event worth scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Absolute reference URL.
    pub url: String,
    /// Last path segment of the URL.
    pub id: String,
    pub date: NaiveDate,
    /// Whether the event was played online. `None` until the event page has
    /// been opened.
    pub online: Option<bool>,
}

/// Extracts the event date from a reference URL.
///
/// Returns `None` when there is no `/event/` segment followed by eight digits,
/// or when those digits are not a calendar date.
#[must_use]
pub fn event_date(reference: &str) -> Option<NaiveDate> {
    let digits = EVENT_DATE_RE.captures(reference)?.get(1)?.as_str();
    NaiveDate::parse_from_str(digits, "%Y%m%d").ok()
}

/// Turns raw `href` values into the ordered list of events to scan.
///
/// References are resolved against `site`, then:
/// - references without a parseable date are dropped,
/// - duplicates (by resolved URL) are dropped, first occurrence kept,
/// - events dated before `cutoff` are dropped,
/// - the rest are sorted newest first; equal dates keep page order.
#[must_use]
pub fn select_events<I, S>(hrefs: I, site: &Url, cutoff: NaiveDate) -> Vec<Event>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut events: Vec<Event> = hrefs
        .into_iter()
        .filter_map(|href| site.join(href.as_ref().trim()).ok())
        .filter(|url| seen.insert(url.to_string()))
        .filter_map(|url| {
            let date = event_date(url.path())?;
            let id = url
                .path_segments()
                .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
                .unwrap_or_default()
                .to_owned();
            Some(Event {
                url: url.to_string(),
                id,
                date,
                online: None,
            })
        })
        .filter(|event| event.date >= cutoff)
        .collect();

    events.sort_by(|a, b| b.date.cmp(&a.date));
    events
}

/// Reads the event links off the profile page the driver is showing.
///
/// Waits up to `wait` for the first event link to render.
///
/// # Errors
///
/// - [`CrawlError::NotFound`] when no event link appears within `wait`.
/// - [`CrawlError::Driver`] when the driver fails while reading the page.
pub async fn discover_events<D: PageDriver>(
    driver: &mut D,
    profile_url: &str,
    site: &Url,
    cutoff: NaiveDate,
    wait: Duration,
) -> Result<Vec<Event>, CrawlError> {
    let locator = Locator::css(EVENT_LINK_SELECTOR);

    if driver.wait_for_element(&locator, wait).await?.is_none() {
        return Err(CrawlError::NotFound {
            url: profile_url.to_owned(),
            waited_ms: wait.as_millis(),
        });
    }

    let mut hrefs = Vec::new();
    for element in driver.find_elements(&locator).await? {
        if let Some(href) = driver.attribute(&element, "href").await? {
            hrefs.push(href);
        }
    }

    let events = select_events(&hrefs, site, cutoff);
    tracing::info!(
        profile_url,
        links = hrefs.len(),
        events = events.len(),
        %cutoff,
        "discovered recent events"
    );
    Ok(events)
}
