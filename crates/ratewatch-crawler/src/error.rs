use thiserror::Error;

/// Failures raised by a [`crate::PageDriver`] implementation.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Network or TLS failure talking to the WebDriver endpoint.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The WebDriver endpoint answered a command with an error envelope.
    #[error("{command} failed: {error}: {message}")]
    Protocol {
        command: String,
        error: String,
        message: String,
    },

    /// The endpoint answered with something that is not a WebDriver response.
    #[error("unexpected response to {command}: {reason}")]
    UnexpectedResponse { command: String, reason: String },

    #[error("no active browser session")]
    NoSession,
}

/// Failures that stop the crawl of one person before any event is scanned.
///
/// Everything past discovery is contained per event and never surfaces here.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// No event reference appeared on the profile page within the wait bound.
    #[error("no event references appeared on {url} within {waited_ms} ms")]
    NotFound { url: String, waited_ms: u128 },

    #[error("invalid site URL \"{url}\": {reason}")]
    InvalidSiteUrl { url: String, reason: String },

    #[error(transparent)]
    Driver(#[from] DriverError),
}
