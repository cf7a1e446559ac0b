//! Per-event section pagination.
//!
//! An event's results are split into numbered sections, rendered one at a
//! time behind a "next section" button. [`SectionCursor`] is the pure state
//! machine deciding what happens after each section is inspected;
//! [`scan_event`] drives it against a [`PageDriver`], performing the reads
//! and clicks each transition calls for.
//!
//! A player is assumed to appear in at most one section per event, so the
//! scan stops at the first section mentioning their id.

use std::time::Duration;

use ratewatch_core::RowExtraction;

use crate::discovery::Event;
use crate::driver::{ElementHandle, Locator, PageDriver};
use crate::error::DriverError;
use crate::row::{locate_row, parse_row, RowParseOptions};

/// Default ceiling on sections inspected per event.
pub const DEFAULT_MAX_SECTIONS: u32 = 20;

/// Button wrapping the right-chevron icon that advances to the next section.
pub const NEXT_SECTION_XPATH: &str =
    "//button[descendant::*[contains(@class, 'lucide-chevron-right')]]";

/// Heading whose text tells whether the event was played online.
pub const EVENT_HEADING_TAG: &str = "h1";

/// State of one event's section walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionState {
    /// Inspecting section `n` (1-based).
    AtSection(u32),
    /// The player's id appeared in the current section. The extraction may be
    /// empty when no parseable row was found.
    PlayerFound(RowExtraction),
    /// No further sections, the player never appeared.
    Exhausted,
    /// The driver failed; treated like [`SectionState::Exhausted`].
    DriverError(String),
}

impl SectionState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SectionState::AtSection(_))
    }
}

/// State of the next-section control in the current section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextControl {
    Absent,
    Disabled,
    Enabled,
}

/// What inspecting the current section revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionObservation {
    PlayerPresent(RowExtraction),
    PlayerAbsent(NextControl),
}

/// Pure section-walk state machine for one event.
#[derive(Debug, Clone)]
pub struct SectionCursor {
    state: SectionState,
    max_sections: u32,
    sections_checked: u32,
}

impl SectionCursor {
    /// A cursor at section 1. `max_sections` is clamped to at least 1.
    #[must_use]
    pub fn new(max_sections: u32) -> Self {
        Self {
            state: SectionState::AtSection(1),
            max_sections: max_sections.max(1),
            sections_checked: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &SectionState {
        &self.state
    }

    #[must_use]
    pub fn sections_checked(&self) -> u32 {
        self.sections_checked
    }

    /// Applies the observation of the current section.
    ///
    /// When the resulting state is still [`SectionState::AtSection`], the
    /// caller must activate the next-section control before observing again.
    /// Observations in a terminal state are ignored.
    pub fn observe(&mut self, observation: SectionObservation) -> &SectionState {
        let SectionState::AtSection(section) = self.state else {
            return &self.state;
        };
        self.sections_checked += 1;

        self.state = match observation {
            SectionObservation::PlayerPresent(extraction) => SectionState::PlayerFound(extraction),
            SectionObservation::PlayerAbsent(NextControl::Absent | NextControl::Disabled) => {
                SectionState::Exhausted
            }
            SectionObservation::PlayerAbsent(NextControl::Enabled) => {
                if section >= self.max_sections {
                    SectionState::Exhausted
                } else {
                    SectionState::AtSection(section + 1)
                }
            }
        };
        &self.state
    }

    /// Records a driver failure. Ignored in a terminal state.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if !self.state.is_terminal() {
            self.state = SectionState::DriverError(reason.into());
        }
    }

    #[must_use]
    pub fn into_state(self) -> SectionState {
        self.state
    }
}

/// Timing and heuristic settings for scanning one event.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Bound on waiting for the event heading.
    pub heading_wait: Duration,
    /// Pause after clicking to the next section, letting the table re-render.
    pub section_settle: Duration,
    pub max_sections: u32,
    pub row: RowParseOptions,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            heading_wait: Duration::from_secs(5),
            section_settle: Duration::from_secs(1),
            max_sections: DEFAULT_MAX_SECTIONS,
            row: RowParseOptions::default(),
        }
    }
}

/// Result of scanning one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventScan {
    pub online: bool,
    pub sections_checked: u32,
    /// Always a terminal [`SectionState`].
    pub outcome: SectionState,
}

impl EventScan {
    /// The extraction, when the player was found.
    #[must_use]
    pub fn extraction(&self) -> Option<&RowExtraction> {
        match &self.outcome {
            SectionState::PlayerFound(extraction) => Some(extraction),
            _ => None,
        }
    }
}

/// Opens `event` and walks its sections looking for `person_id`.
///
/// Sets `event.online` once the heading has been read. Never fails: driver
/// errors end the walk with [`SectionState::DriverError`].
pub async fn scan_event<D: PageDriver>(
    driver: &mut D,
    event: &mut Event,
    person_id: &str,
    options: &ScanOptions,
) -> EventScan {
    let mut cursor = SectionCursor::new(options.max_sections);

    if let Err(e) = driver.navigate(&event.url).await {
        tracing::warn!(event = %event.id, error = %e, "could not open event page");
        cursor.fail(e.to_string());
        return EventScan {
            online: false,
            sections_checked: 0,
            outcome: cursor.into_state(),
        };
    }

    let online = detect_online(driver, options.heading_wait).await;
    event.online = Some(online);

    while let SectionState::AtSection(section) = *cursor.state() {
        let (observation, next) =
            match observe_section(driver, person_id, online, &options.row).await {
                Ok(observed) => observed,
                Err(e) => {
                    tracing::warn!(
                        event = %event.id,
                        section,
                        error = %e,
                        "section inspection failed"
                    );
                    cursor.fail(e.to_string());
                    break;
                }
            };

        if cursor.observe(observation).is_terminal() {
            break;
        }

        let Some(next) = next else {
            cursor.fail("next-section control vanished before click");
            break;
        };
        if let Err(e) = driver.click(&next).await {
            tracing::warn!(event = %event.id, section, error = %e, "could not advance section");
            cursor.fail(e.to_string());
            break;
        }
        if !options.section_settle.is_zero() {
            tokio::time::sleep(options.section_settle).await;
        }
    }

    let scan = EventScan {
        online,
        sections_checked: cursor.sections_checked(),
        outcome: cursor.into_state(),
    };
    tracing::debug!(
        event = %event.id,
        online,
        sections = scan.sections_checked,
        found = scan.extraction().is_some(),
        "event scan finished"
    );
    scan
}

/// Reads the event heading; "online" anywhere in it, case-insensitively,
/// marks an online event. An unreadable heading means offline.
async fn detect_online<D: PageDriver>(driver: &mut D, wait: Duration) -> bool {
    let heading = match driver
        .wait_for_element(&Locator::tag(EVENT_HEADING_TAG), wait)
        .await
    {
        Ok(Some(heading)) => heading,
        Ok(None) => return false,
        Err(e) => {
            tracing::debug!(error = %e, "event heading unavailable; assuming offline");
            return false;
        }
    };
    match driver.element_text(&heading).await {
        Ok(text) => text.to_lowercase().contains("online"),
        Err(e) => {
            tracing::debug!(error = %e, "event heading unreadable; assuming offline");
            false
        }
    }
}

/// Inspects the current section. Returns the observation and, when the
/// player is absent and the control is enabled, the control to click.
async fn observe_section<D: PageDriver>(
    driver: &mut D,
    person_id: &str,
    online: bool,
    row_options: &RowParseOptions,
) -> Result<(SectionObservation, Option<ElementHandle>), DriverError> {
    let source = driver.page_source().await?;
    if source.contains(person_id) {
        let extraction = locate_row(&source, person_id)
            .map(|row| parse_row(&row, online, row_options))
            .unwrap_or_default();
        return Ok((SectionObservation::PlayerPresent(extraction), None));
    }

    let Some(control) = driver
        .find_element(&Locator::xpath(NEXT_SECTION_XPATH))
        .await?
    else {
        return Ok((SectionObservation::PlayerAbsent(NextControl::Absent), None));
    };

    let disabled = driver
        .attribute(&control, "disabled")
        .await?
        .is_some_and(|v| !v.eq_ignore_ascii_case("false"));
    if disabled {
        Ok((SectionObservation::PlayerAbsent(NextControl::Disabled), None))
    } else {
        Ok((
            SectionObservation::PlayerAbsent(NextControl::Enabled),
            Some(control),
        ))
    }
}
