pub mod crawler;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod pagination;
pub mod row;
pub mod webdriver;

pub use crawler::{CrawlOptions, CrawlReport, DiscoveryStatus, EventReport, LiveCrawler};
pub use discovery::{discover_events, select_events, Event};
pub use driver::{ElementHandle, Locator, PageDriver};
pub use error::{CrawlError, DriverError};
pub use pagination::{
    scan_event, EventScan, NextControl, ScanOptions, SectionCursor, SectionObservation,
    SectionState,
};
pub use row::{locate_row, parse_row, RowParseOptions};
pub use webdriver::{BrowserOptions, WebDriverSession};
