//! New-session capabilities for a Chrome-compatible WebDriver endpoint.

use serde_json::{json, Value};

/// Browser launch settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserOptions {
    pub headless: bool,
    pub user_agent: String,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: ratewatch_core::config::DEFAULT_USER_AGENT.to_owned(),
            window_width: 1920,
            window_height: 1080,
        }
    }
}

impl BrowserOptions {
    /// Chrome command-line switches for these options.
    #[must_use]
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.headless {
            args.push("--headless=new".to_owned());
        }
        args.extend([
            "--disable-gpu".to_owned(),
            "--no-sandbox".to_owned(),
            "--log-level=3".to_owned(),
            format!("--window-size={},{}", self.window_width, self.window_height),
        ]);
        if !self.user_agent.is_empty() {
            args.push(format!("--user-agent={}", self.user_agent));
        }
        args
    }

    /// Body of the `POST /session` request.
    #[must_use]
    pub fn new_session_body(&self) -> Value {
        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": {
                        "args": self.chrome_args(),
                    },
                },
            },
        })
    }
}
