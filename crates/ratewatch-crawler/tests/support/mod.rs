//! In-memory page driver for crawler tests.
//!
//! Serves a tiny fake ratings site: profile pages listing event links and
//! event pages made of sections behind a next-section button.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use ratewatch_crawler::discovery::EVENT_LINK_SELECTOR;
use ratewatch_crawler::pagination::{EVENT_HEADING_TAG, NEXT_SECTION_XPATH};
use ratewatch_crawler::{
    CrawlOptions, DriverError, ElementHandle, Locator, NextControl, PageDriver, ScanOptions,
};

pub const SITE: &str = "https://ratings.example.org";
pub const PERSON: &str = "12345678";

#[derive(Debug, Clone)]
pub enum FakePage {
    Profile {
        links: Vec<String>,
    },
    Event {
        heading: Option<String>,
        sections: Vec<String>,
        /// Next-section control shown on the last section.
        last: NextControl,
        /// Keep producing empty sections past the listed ones.
        endless: bool,
    },
}

impl FakePage {
    pub fn profile<I, S>(links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FakePage::Profile {
            links: links.into_iter().map(Into::into).collect(),
        }
    }

    pub fn event(heading: &str, sections: Vec<String>) -> Self {
        FakePage::Event {
            heading: Some(heading.to_owned()),
            sections,
            last: NextControl::Disabled,
            endless: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeDriver {
    pages: HashMap<String, FakePage>,
    current: Option<String>,
    section: usize,
    pub visits: Vec<String>,
    pub clicks: usize,
    pub fail_clicks: bool,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a page at `{SITE}{path}`.
    pub fn with_page(mut self, path: &str, page: FakePage) -> Self {
        self.pages.insert(format!("{SITE}{path}"), page);
        self
    }

    pub fn visited(&self, path: &str) -> bool {
        let url = format!("{SITE}{path}");
        self.visits.iter().any(|v| *v == url)
    }

    fn page(&self) -> Option<&FakePage> {
        self.current.as_ref().and_then(|url| self.pages.get(url))
    }

    /// Next-section control state for the section currently shown.
    fn control(&self) -> NextControl {
        match self.page() {
            Some(FakePage::Event {
                sections,
                last,
                endless,
                ..
            }) => {
                if *endless || self.section + 1 < sections.len() {
                    NextControl::Enabled
                } else {
                    *last
                }
            }
            _ => NextControl::Absent,
        }
    }
}

fn unknown_command(command: &str, message: &str) -> DriverError {
    DriverError::Protocol {
        command: command.to_owned(),
        error: "unknown error".to_owned(),
        message: message.to_owned(),
    }
}

impl PageDriver for FakeDriver {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.visits.push(url.to_owned());
        if !self.pages.contains_key(url) {
            return Err(unknown_command("navigateTo", "net::ERR_NAME_NOT_RESOLVED"));
        }
        self.current = Some(url.to_owned());
        self.section = 0;
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String, DriverError> {
        Ok(match self.page() {
            Some(FakePage::Profile { links }) => links
                .iter()
                .map(|href| format!("<a href=\"{href}\">event</a>"))
                .collect(),
            Some(FakePage::Event { sections, .. }) => sections
                .get(self.section)
                .cloned()
                .unwrap_or_else(|| format!("<p>section {}</p>", self.section + 1)),
            None => String::new(),
        })
    }

    async fn find_element(
        &mut self,
        locator: &Locator,
    ) -> Result<Option<ElementHandle>, DriverError> {
        Ok(self.find_elements(locator).await?.into_iter().next())
    }

    async fn find_elements(
        &mut self,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        let handles = match (locator, self.page()) {
            (Locator::Css(css), Some(FakePage::Profile { links }))
                if css == EVENT_LINK_SELECTOR =>
            {
                (0..links.len())
                    .map(|i| ElementHandle::new(format!("link-{i}")))
                    .collect()
            }
            (Locator::TagName(tag), Some(FakePage::Event { heading: Some(_), .. }))
                if tag == EVENT_HEADING_TAG =>
            {
                vec![ElementHandle::new("heading")]
            }
            (Locator::XPath(xpath), Some(FakePage::Event { .. }))
                if xpath == NEXT_SECTION_XPATH =>
            {
                if self.control() == NextControl::Absent {
                    Vec::new()
                } else {
                    vec![ElementHandle::new("next")]
                }
            }
            _ => Vec::new(),
        };
        Ok(handles)
    }

    async fn element_text(&mut self, element: &ElementHandle) -> Result<String, DriverError> {
        match (element.id(), self.page()) {
            ("heading", Some(FakePage::Event { heading: Some(h), .. })) => Ok(h.clone()),
            _ => Err(unknown_command("getElementText", "stale element reference")),
        }
    }

    async fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        if element.id() == "next" && name == "disabled" {
            return Ok((self.control() == NextControl::Disabled).then(|| "true".to_owned()));
        }
        if let (Some(index), Some(FakePage::Profile { links })) = (
            element.id().strip_prefix("link-").and_then(|i| i.parse::<usize>().ok()),
            self.page(),
        ) {
            if name == "href" {
                // Drivers report the resolved property value.
                return Ok(links.get(index).map(|href| format!("{SITE}{href}")));
            }
        }
        Ok(None)
    }

    async fn click(&mut self, element: &ElementHandle) -> Result<(), DriverError> {
        if self.fail_clicks || element.id() != "next" || self.control() != NextControl::Enabled {
            return Err(unknown_command("elementClick", "element not interactable"));
        }
        self.clicks += 1;
        self.section += 1;
        Ok(())
    }
}

/// Crawl options with every wait set to zero.
pub fn instant_options() -> CrawlOptions {
    let mut options = CrawlOptions::new(SITE).expect("valid site url");
    options.discovery_wait = Duration::ZERO;
    options.scan = instant_scan();
    options
}

pub fn instant_scan() -> ScanOptions {
    ScanOptions {
        heading_wait: Duration::ZERO,
        section_settle: Duration::ZERO,
        ..ScanOptions::default()
    }
}

/// A results section holding one row for `person_id`.
pub fn section_with_row(person_id: &str, cells: &[&str]) -> String {
    let cells: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
    format!(
        "<table><tbody><tr><td>1</td><td><a href=\"/player/{person_id}\">{person_id}</a></td>\
         <td>Doe, Jane</td>{cells}</tr></tbody></table>"
    )
}

/// A results section that does not mention the test person.
pub fn other_section(n: usize) -> String {
    section_with_row(&format!("9000000{n}"), &["R", "1200", "1210"])
}
