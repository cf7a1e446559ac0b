//! Live-ratings crawl for one person at a time.
//!
//! [`LiveCrawler`] owns a page-driver session and reuses it for every event
//! and every person it is asked to crawl. The crawl never fails: when the
//! profile cannot be read the published snapshot is returned unchanged, and
//! per-event failures only cost that event's data.

use std::time::Duration;

use chrono::NaiveDate;
use ratewatch_core::{AppConfig, LiveMerge, RatingCategory, RatingSnapshot};
use reqwest::Url;

use crate::discovery::{discover_events, Event};
use crate::driver::PageDriver;
use crate::error::CrawlError;
use crate::pagination::{scan_event, EventScan, ScanOptions, SectionState};
use crate::row::RowParseOptions;

/// Settings for a crawl.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Root of the event-results site; profile and event links resolve
    /// against it.
    pub site_url: Url,
    /// Bound on waiting for the first event link on a profile page.
    pub discovery_wait: Duration,
    pub scan: ScanOptions,
}

impl CrawlOptions {
    /// Default timings against `site_url`.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::InvalidSiteUrl`] if `site_url` does not parse.
    pub fn new(site_url: &str) -> Result<Self, CrawlError> {
        Ok(Self {
            site_url: parse_site_url(site_url)?,
            discovery_wait: Duration::from_secs(10),
            scan: ScanOptions::default(),
        })
    }

    /// Builds options from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::InvalidSiteUrl`] if the configured site URL does
    /// not parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, CrawlError> {
        Ok(Self {
            site_url: parse_site_url(&config.site_url)?,
            discovery_wait: Duration::from_secs(config.discovery_wait_secs),
            scan: ScanOptions {
                heading_wait: Duration::from_secs(config.heading_wait_secs),
                section_settle: Duration::from_millis(config.section_settle_ms),
                max_sections: config.max_sections,
                row: RowParseOptions {
                    post_rating_position: config.post_rating_position,
                    ..RowParseOptions::default()
                },
            },
        })
    }
}

fn parse_site_url(raw: &str) -> Result<Url, CrawlError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    let url = Url::parse(&normalised).map_err(|e| CrawlError::InvalidSiteUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(CrawlError::InvalidSiteUrl {
            url: raw.to_owned(),
            reason: "URL cannot carry path segments".to_owned(),
        });
    }
    Ok(url)
}

/// How event discovery went for a crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryStatus {
    /// Event links were read; holds how many qualified.
    Found(usize),
    /// The profile showed no event links in time.
    NoEvents,
    /// The profile could not be opened or read.
    Failed(String),
}

/// One scanned event and what it contributed to the live snapshot.
#[derive(Debug, Clone)]
pub struct EventReport {
    pub event: Event,
    pub scan: EventScan,
    /// Categories this event settled, i.e. values that made it into the
    /// live snapshot.
    pub settled: Vec<RatingCategory>,
}

/// Result of crawling one person.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub person_id: String,
    pub cutoff: NaiveDate,
    pub discovery: DiscoveryStatus,
    pub events: Vec<EventReport>,
    pub live: RatingSnapshot,
}

impl CrawlReport {
    /// `true` when any category was overridden by a live finding.
    #[must_use]
    pub fn has_updates(&self) -> bool {
        self.events.iter().any(|e| !e.settled.is_empty())
    }
}

/// Crawler holding an exclusively-owned page-driver session.
pub struct LiveCrawler<D> {
    driver: D,
    options: CrawlOptions,
}

impl<D: PageDriver> LiveCrawler<D> {
    #[must_use]
    pub fn new(driver: D, options: CrawlOptions) -> Self {
        Self { driver, options }
    }

    #[must_use]
    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }

    /// Gives the driver back, e.g. to close the session.
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// `{site}/player/{person_id}`.
    #[must_use]
    pub fn profile_url(&self, person_id: &str) -> String {
        let mut url = self.options.site_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("player").push(person_id);
        }
        url.to_string()
    }

    /// Reconstructs `person_id`'s live ratings on top of `published`.
    ///
    /// Events dated before `cutoff` are not scanned. Scanning stops early
    /// once every category has been settled.
    pub async fn crawl(
        &mut self,
        person_id: &str,
        published: &RatingSnapshot,
        cutoff: NaiveDate,
    ) -> CrawlReport {
        let mut report = CrawlReport {
            person_id: person_id.to_owned(),
            cutoff,
            discovery: DiscoveryStatus::NoEvents,
            events: Vec::new(),
            live: published.clone(),
        };

        if person_id.trim().is_empty() {
            tracing::warn!("empty person id; returning published ratings");
            report.discovery = DiscoveryStatus::Failed("empty person id".to_owned());
            return report;
        }

        let events = match self.discover(person_id, cutoff).await {
            Ok(events) => events,
            Err(CrawlError::NotFound { url, .. }) => {
                tracing::info!(person_id, %url, "no recent events on profile");
                return report;
            }
            Err(e) => {
                tracing::warn!(
                    person_id,
                    error = %e,
                    "could not read profile; keeping published ratings"
                );
                report.discovery = DiscoveryStatus::Failed(e.to_string());
                return report;
            }
        };
        report.discovery = DiscoveryStatus::Found(events.len());

        let mut merge = LiveMerge::new(published);
        for mut event in events {
            if merge.is_complete() {
                tracing::debug!(person_id, "every category settled; skipping older events");
                break;
            }

            let scan =
                scan_event(&mut self.driver, &mut event, person_id, &self.options.scan).await;
            let settled = match &scan.outcome {
                SectionState::PlayerFound(extraction) => merge.apply(extraction),
                SectionState::DriverError(reason) => {
                    tracing::warn!(
                        person_id,
                        event = %event.id,
                        %reason,
                        "event skipped after driver error"
                    );
                    Vec::new()
                }
                SectionState::Exhausted | SectionState::AtSection(_) => Vec::new(),
            };
            if !settled.is_empty() {
                tracing::info!(
                    person_id,
                    event = %event.id,
                    date = %event.date,
                    categories = ?settled.iter().map(|c| c.code()).collect::<Vec<_>>(),
                    "live ratings found"
                );
            }
            report.events.push(EventReport {
                event,
                scan,
                settled,
            });
        }

        report.live = merge.into_snapshot();
        report
    }

    async fn discover(
        &mut self,
        person_id: &str,
        cutoff: NaiveDate,
    ) -> Result<Vec<Event>, CrawlError> {
        let profile_url = self.profile_url(person_id);
        self.driver.navigate(&profile_url).await?;
        discover_events(
            &mut self.driver,
            &profile_url,
            &self.options.site_url,
            cutoff,
            self.options.discovery_wait,
        )
        .await
    }
}
