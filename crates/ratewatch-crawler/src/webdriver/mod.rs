//! [`PageDriver`] backed by a W3C WebDriver endpoint (chromedriver,
//! geckodriver, a Selenium grid).
//!
//! The session speaks the plain JSON wire protocol over `reqwest`. One
//! session is opened per batch and reused for every page the crawler visits.

mod capabilities;
mod wire;

use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde_json::{json, Value};

use crate::driver::{ElementHandle, Locator, PageDriver};
use crate::error::DriverError;

pub use capabilities::BrowserOptions;

/// A live WebDriver session.
///
/// Call [`WebDriverSession::close`] when done; dropping the value leaves the
/// browser running until the endpoint reaps it.
pub struct WebDriverSession {
    client: Client,
    endpoint: Url,
    session_id: Option<String>,
}

impl WebDriverSession {
    /// Opens a new browser session on the endpoint at `webdriver_url`.
    ///
    /// `command_timeout` bounds every HTTP round trip, navigation included.
    ///
    /// # Errors
    ///
    /// - [`DriverError::UnexpectedResponse`] if `webdriver_url` is not a
    ///   usable base URL or the endpoint returns no session id.
    /// - [`DriverError::Protocol`] if the endpoint refuses the session.
    /// - [`DriverError::Http`] if the endpoint is unreachable.
    pub async fn start(
        webdriver_url: &str,
        options: &BrowserOptions,
        command_timeout: Duration,
    ) -> Result<Self, DriverError> {
        let endpoint = parse_endpoint(webdriver_url)?;
        let client = Client::builder()
            .timeout(command_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let mut session = Self {
            client,
            endpoint,
            session_id: None,
        };
        let body = session
            .send(
                "newSession",
                Method::POST,
                &["session"],
                Some(options.new_session_body()),
            )
            .await?;
        wire::unwrap_value("newSession", body.clone())?;
        let session_id =
            wire::session_id_from_body(&body).ok_or_else(|| DriverError::UnexpectedResponse {
                command: "newSession".to_owned(),
                reason: "response carried no sessionId".to_owned(),
            })?;

        tracing::info!(%session_id, headless = options.headless, "browser session started");
        session.session_id = Some(session_id);
        Ok(session)
    }

    /// Id of the open session, `None` once closed.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Ends the session and closes the browser. Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] if the endpoint fails to delete the session.
    /// The session is considered closed either way.
    pub async fn close(&mut self) -> Result<(), DriverError> {
        let Some(session_id) = self.session_id.take() else {
            return Ok(());
        };
        let body = self
            .send("deleteSession", Method::DELETE, &["session", &session_id], None)
            .await?;
        wire::unwrap_value("deleteSession", body)?;
        tracing::info!(%session_id, "browser session closed");
        Ok(())
    }

    /// Runs a session-scoped command and returns its `value`.
    async fn command(
        &self,
        name: &str,
        method: Method,
        path: &[&str],
        body: Option<Value>,
    ) -> Result<Value, DriverError> {
        let session_id = self.session_id.as_deref().ok_or(DriverError::NoSession)?;
        let mut segments = vec!["session", session_id];
        segments.extend_from_slice(path);
        let response = self.send(name, method, &segments, body).await?;
        wire::unwrap_value(name, response)
    }

    /// Sends one request and decodes the JSON body, whatever the status.
    async fn send(
        &self,
        name: &str,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<Value, DriverError> {
        let mut url = self.endpoint.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        let is_post = method == Method::POST;
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        } else if is_post {
            request = request.json(&json!({}));
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| DriverError::UnexpectedResponse {
            command: name.to_owned(),
            reason: format!("HTTP {status}: body is not JSON ({e})"),
        })
    }

    fn find_body(locator: &Locator) -> Value {
        json!({ "using": locator.strategy(), "value": locator.value() })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, DriverError> {
    let url = Url::parse(raw.trim_end_matches('/')).map_err(|e| DriverError::UnexpectedResponse {
        command: "newSession".to_owned(),
        reason: format!("invalid WebDriver URL \"{raw}\": {e}"),
    })?;
    if url.cannot_be_a_base() {
        return Err(DriverError::UnexpectedResponse {
            command: "newSession".to_owned(),
            reason: format!("invalid WebDriver URL \"{raw}\": cannot carry path segments"),
        });
    }
    Ok(url)
}

impl PageDriver for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        tracing::debug!(url, "navigating");
        self.command("navigateTo", Method::POST, &["url"], Some(json!({ "url": url })))
            .await?;
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String, DriverError> {
        let value = self
            .command("getPageSource", Method::GET, &["source"], None)
            .await?;
        Ok(wire::optional_string("getPageSource", value)?.unwrap_or_default())
    }

    async fn find_element(
        &mut self,
        locator: &Locator,
    ) -> Result<Option<ElementHandle>, DriverError> {
        match self
            .command(
                "findElement",
                Method::POST,
                &["element"],
                Some(Self::find_body(locator)),
            )
            .await
        {
            Ok(value) => wire::element_from_value("findElement", &value).map(Some),
            Err(e) if wire::is_no_such_element(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn find_elements(
        &mut self,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        let value = match self
            .command(
                "findElements",
                Method::POST,
                &["elements"],
                Some(Self::find_body(locator)),
            )
            .await
        {
            Ok(value) => value,
            Err(e) if wire::is_no_such_element(&e) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let Value::Array(items) = value else {
            return Err(DriverError::UnexpectedResponse {
                command: "findElements".to_owned(),
                reason: format!("expected an array, got {value}"),
            });
        };
        items
            .iter()
            .map(|item| wire::element_from_value("findElements", item))
            .collect()
    }

    async fn element_text(&mut self, element: &ElementHandle) -> Result<String, DriverError> {
        let value = self
            .command(
                "getElementText",
                Method::GET,
                &["element", element.id(), "text"],
                None,
            )
            .await?;
        Ok(wire::optional_string("getElementText", value)?.unwrap_or_default())
    }

    async fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        let value = self
            .command(
                "getElementAttribute",
                Method::GET,
                &["element", element.id(), "attribute", name],
                None,
            )
            .await?;
        wire::optional_string("getElementAttribute", value)
    }

    async fn click(&mut self, element: &ElementHandle) -> Result<(), DriverError> {
        self.command(
            "elementClick",
            Method::POST,
            &["element", element.id(), "click"],
            None,
        )
        .await?;
        Ok(())
    }
}
